//! Opaque placeholders for protected spans.
//!
//! Code blocks and code spans are rendered first and swapped out for a
//! token so that later rewrite rules never see their contents. Tokens are
//! built from Unicode noncharacters, which are stripped from the input
//! before any token is issued.

const OPEN: char = '\u{FDD0}';
const CLOSE: char = '\u{FDD1}';

/// Removes the token delimiters from untrusted input.
pub(crate) fn strip_markers(input: &str) -> String {
    input.chars().filter(|&c| c != OPEN && c != CLOSE).collect()
}

/// Rendered fragments indexed by the token that stands in for them.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTable {
    entries: Vec<String>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rendered fragment and returns its token.
    pub fn insert(&mut self, fragment: String) -> String {
        let index = self.entries.len();
        self.entries.push(fragment);
        format!("{OPEN}{index}{CLOSE}")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replaces every token in `text` with its stored fragment.
    pub fn restore(&self, text: &str) -> String {
        if self.entries.is_empty() {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            result.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len_utf8()..];

            let fragment = after.find(CLOSE).and_then(|end| {
                let index: usize = after[..end].parse().ok()?;
                self.entries.get(index).map(|f| (f, end))
            });

            match fragment {
                Some((fragment, end)) => {
                    result.push_str(fragment);
                    rest = &after[end + CLOSE.len_utf8()..];
                }
                None => rest = after,
            }
        }

        result.push_str(rest);
        result
    }
}
