//! Inline tokenizer for Markdown → HTML.
//!
//! Handles emphasis runs, links, images and code spans inside a single
//! block of text. Delimiter runs are matched longest-first: a run of three
//! `*` only closes on another run of three, so `**` is never split by the
//! italic rule. Every closer lookup goes through tables built in one pass
//! over the block, so unclosed markers cost linear time.

use super::placeholder::PlaceholderTable;
use std::collections::HashMap;

/// A `[text](url)` span located in a char buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkSpan {
    text_start: usize,
    text_end: usize,
    url: String,
    /// Index just past the closing `)`
    end: usize,
}

/// Start positions of every maximal run of one marker, keyed by run length.
#[derive(Debug, Default)]
struct RunIndex {
    starts: HashMap<usize, Vec<usize>>,
}

impl RunIndex {
    fn new(chars: &[char], marker: char) -> Self {
        let mut starts: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == marker {
                let len = run_length(chars, i, marker);
                starts.entry(len).or_default().push(i);
                i += len;
            } else {
                i += 1;
            }
        }

        Self { starts }
    }

    /// First run of exactly `run` markers starting after `from` and ending by `end`.
    fn closing(&self, from: usize, run: usize, end: usize) -> Option<usize> {
        let starts = self.starts.get(&run)?;
        let j = *starts.get(starts.partition_point(|&s| s <= from))?;
        (j + run <= end).then_some(j)
    }
}

/// Index of the next `target` at or after each position; `len` when none.
fn next_positions(chars: &[char], target: char) -> Vec<usize> {
    let mut next = vec![chars.len(); chars.len() + 1];
    for i in (0..chars.len()).rev() {
        next[i] = if chars[i] == target { i } else { next[i + 1] };
    }
    next
}

/// Swaps backtick code spans for placeholder tokens.
pub(crate) fn protect_code_spans(text: &str, table: &mut PlaceholderTable) -> String {
    let chars: Vec<char> = text.chars().collect();
    let ticks = RunIndex::new(&chars, '`');
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '`' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let run = run_length(&chars, i, '`');
        match ticks.closing(i, run, chars.len()) {
            Some(close) => {
                let code: String = chars[i + run..close].iter().collect();
                let html = format!("<code>{}</code>", super::markdown_html::escape_html(&code));
                out.push_str(&table.insert(html));
                i = close + run;
            }
            None => {
                out.extend(&chars[i..i + run]);
                i += run;
            }
        }
    }

    out
}

/// Renders emphasis, links and images to HTML.
///
/// Text outside recognized constructs is copied through untouched.
pub(crate) fn render_inline(text: &str) -> String {
    let inline = InlineText::new(text);
    let mut out = String::with_capacity(text.len() + 16);
    inline.render(0, inline.chars.len(), &mut out);
    out
}

/// One block of text plus its lookahead tables.
struct InlineText {
    chars: Vec<char>,
    stars: RunIndex,
    next_bracket: Vec<usize>,
    next_paren: Vec<usize>,
}

impl InlineText {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self {
            stars: RunIndex::new(&chars, '*'),
            next_bracket: next_positions(&chars, ']'),
            next_paren: next_positions(&chars, ')'),
            chars,
        }
    }

    /// Renders `chars[start..end]`.
    fn render(&self, start: usize, end: usize, out: &mut String) {
        let chars = &self.chars;
        let mut i = start;

        while i < end {
            match chars[i] {
                '!' if i + 1 < end && chars[i + 1] == '[' => {
                    if let Some(link) = self.parse_link(i + 1, end) {
                        let alt: String = chars[link.text_start..link.text_end].iter().collect();
                        out.push_str(&format!(
                            "<img src=\"{}\" alt=\"{}\">",
                            escape_attr(&link.url),
                            escape_attr(&alt)
                        ));
                        i = link.end;
                        continue;
                    }
                }
                '[' => {
                    if let Some(link) = self.parse_link(i, end) {
                        out.push_str(&format!("<a href=\"{}\">", escape_attr(&link.url)));
                        self.render(link.text_start, link.text_end, out);
                        out.push_str("</a>");
                        i = link.end;
                        continue;
                    }
                }
                '*' => {
                    let run = run_length(&chars[..end], i, '*');
                    if run <= 3 {
                        if let Some(close) = self.stars.closing(i, run, end) {
                            let (open_tag, close_tag) = match run {
                                1 => ("<em>", "</em>"),
                                2 => ("<strong>", "</strong>"),
                                _ => ("<strong><em>", "</em></strong>"),
                            };
                            out.push_str(open_tag);
                            self.render(i + run, close, out);
                            out.push_str(close_tag);
                            i = close + run;
                            continue;
                        }
                    }
                    out.extend(&chars[i..i + run]);
                    i += run;
                    continue;
                }
                _ => {}
            }

            out.push(chars[i]);
            i += 1;
        }
    }

    /// Parses `[text](url)` with the `[` at `open`, within `end`. Both
    /// parts must be non-empty.
    fn parse_link(&self, open: usize, end: usize) -> Option<LinkSpan> {
        let text_start = open + 1;
        let text_end = self.next_bracket[text_start];
        if text_end >= end || text_end == text_start {
            return None;
        }

        if text_end + 1 >= end || self.chars[text_end + 1] != '(' {
            return None;
        }
        let url_start = text_end + 2;
        let url_end = self.next_paren[url_start];
        if url_end >= end || url_end == url_start {
            return None;
        }

        Some(LinkSpan {
            text_start,
            text_end,
            url: self.chars[url_start..url_end].iter().collect(),
            end: url_end + 1,
        })
    }
}

/// Length of the run of `marker` starting at `start`.
fn run_length(chars: &[char], start: usize, marker: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == marker).count()
}

fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_levels() {
        assert_eq!(render_inline("*a*"), "<em>a</em>");
        assert_eq!(render_inline("**a**"), "<strong>a</strong>");
        assert_eq!(render_inline("***a***"), "<strong><em>a</em></strong>");
    }

    #[test]
    fn test_bold_not_split_by_italic() {
        assert_eq!(
            render_inline("**bold** and *it*"),
            "<strong>bold</strong> and <em>it</em>"
        );
        assert_eq!(
            render_inline("*outer **inner** outer*"),
            "<em>outer <strong>inner</strong> outer</em>"
        );
    }

    #[test]
    fn test_unmatched_markers_literal() {
        assert_eq!(render_inline("2 * 3"), "2 * 3");
        assert_eq!(render_inline("**open"), "**open");
        assert_eq!(render_inline("****"), "****");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("see [the *docs*](https://example.com)"),
            "see <a href=\"https://example.com\">the <em>docs</em></a>"
        );
        assert_eq!(render_inline("[](x)"), "[](x)");
        assert_eq!(render_inline("[text]()"), "[text]()");
        assert_eq!(render_inline("[text] (x)"), "[text] (x)");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            render_inline("![logo](img/logo.png)"),
            "<img src=\"img/logo.png\" alt=\"logo\">"
        );
    }

    #[test]
    fn test_code_spans_protected() {
        let mut table = PlaceholderTable::new();
        let protected = protect_code_spans("use `**not bold**` here", &mut table);
        let rendered = render_inline(&protected);
        assert_eq!(
            table.restore(&rendered),
            "use <code>**not bold**</code> here"
        );
    }

    #[test]
    fn test_code_span_escaped() {
        let mut table = PlaceholderTable::new();
        let protected = protect_code_spans("`<div>`", &mut table);
        assert_eq!(table.restore(&protected), "<code>&lt;div&gt;</code>");
    }

    #[test]
    fn test_code_span_run_lengths() {
        let mut table = PlaceholderTable::new();
        let protected = protect_code_spans("``a`b`` and `c`", &mut table);
        assert_eq!(
            table.restore(&protected),
            "<code>a`b</code> and <code>c</code>"
        );
    }

    #[test]
    fn test_run_index_closing() {
        let chars: Vec<char> = "*a**b*c".chars().collect();
        let index = RunIndex::new(&chars, '*');
        assert_eq!(index.closing(0, 1, chars.len()), Some(5));
        assert_eq!(index.closing(0, 1, 5), None);
        assert_eq!(index.closing(0, 2, chars.len()), Some(2));
        assert_eq!(index.closing(2, 2, chars.len()), None);
        assert_eq!(index.closing(0, 3, chars.len()), None);
    }

    #[test]
    fn test_unclosed_markers_linear() {
        let start = std::time::Instant::now();

        for text in [
            "[".repeat(200_000),
            "[a](".repeat(50_000),
            "[[[]".repeat(50_000),
            "![".repeat(100_000),
        ] {
            assert_eq!(render_inline(&text), text);
        }

        let stars = format!("*{}", "a**".repeat(50_000));
        assert!(render_inline(&stars).starts_with("*a<strong>a</strong>"));

        let mut table = PlaceholderTable::new();
        let ticks: String = (1..400).map(|n| "`".repeat(n) + "x").collect();
        assert_eq!(protect_code_spans(&ticks, &mut table), ticks);

        assert!(
            start.elapsed() < std::time::Duration::from_secs(10),
            "Unclosed markers took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn test_unclosed_backtick_literal() {
        let mut table = PlaceholderTable::new();
        assert_eq!(protect_code_spans("a ` b", &mut table), "a ` b");
        assert_eq!(table.len(), 0);
    }
}
