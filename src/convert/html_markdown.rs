//! HTML → Markdown conversion.
//!
//! A best-effort rewrite pipeline for the tag set the forward converter
//! produces. Code is lifted into placeholders first so later rules cannot
//! touch it; tags outside the supported set pass through as text.

use super::placeholder::{strip_markers, PlaceholderTable};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Regex patterns (compiled once using LazyLock)
static RE_PRE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre(?:\s[^>]*)?>\s*<code([^>]*)>(.*?)</code>\s*</pre>").unwrap()
});

static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code(?:\s[^>]*)?>(.*?)</code>").unwrap());

static RE_CODE_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)class\s*=\s*"[^"]*?language-([\w+-]+)"#).unwrap());

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h[1-6]>").unwrap());

static RE_STRONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)>").unwrap()
});

static RE_EM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)>").unwrap());

static RE_IMG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\s[^>]*>").unwrap());

static RE_ATTR_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\ssrc\s*=\s*"([^"]*)""#).unwrap());

static RE_ATTR_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\salt\s*=\s*"([^"]*)""#).unwrap());

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>").unwrap());

static RE_LIST_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:ul|ol)(?:\s[^>]*)?>").unwrap());

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").unwrap());

static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts HTML to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let mut table = PlaceholderTable::new();
    let mut text = strip_markers(&html.replace("\r\n", "\n"));

    // Code first, so no later rule sees its contents
    text = RE_PRE_CODE
        .replace_all(&text, |caps: &Captures| {
            let language = RE_CODE_LANGUAGE
                .captures(&caps[1])
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            let code = unescape_html(&caps[2]);
            let block = format!("```{}\n{}\n```", language, code.trim_end_matches('\n'));
            format!("{}\n\n", table.insert(block))
        })
        .into_owned();

    text = RE_CODE
        .replace_all(&text, |caps: &Captures| {
            table.insert(format!("`{}`", unescape_html(&caps[1])))
        })
        .into_owned();

    text = RE_HEADING
        .replace_all(&text, |caps: &Captures| {
            let level: usize = caps[1].parse().unwrap_or(1);
            format!("{} {}\n\n", "#".repeat(level), caps[2].trim())
        })
        .into_owned();

    text = RE_STRONG.replace_all(&text, "**$1**").into_owned();
    text = RE_EM.replace_all(&text, "*$1*").into_owned();

    text = RE_IMG
        .replace_all(&text, |caps: &Captures| {
            let tag = &caps[0];
            let src = RE_ATTR_SRC.captures(tag).map(|c| c[1].to_string());
            let alt = RE_ATTR_ALT.captures(tag).map(|c| c[1].to_string());
            match src {
                Some(src) => format!("![{}]({})", alt.unwrap_or_default(), src),
                None => tag.to_string(),
            }
        })
        .into_owned();

    text = RE_LINK.replace_all(&text, "[$2]($1)").into_owned();
    text = RE_LIST_ITEM.replace_all(&text, "* $1").into_owned();
    text = RE_LIST_WRAPPER.replace_all(&text, "\n").into_owned();
    text = RE_LINE_BREAK.replace_all(&text, "\n").into_owned();
    text = RE_PARAGRAPH.replace_all(&text, "$1\n\n").into_owned();
    text = RE_BLANK_RUN.replace_all(&text, "\n\n").into_owned();

    table.restore(&text).trim().to_string()
}

/// Reverses the escaping applied to code on the way out.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(html_to_markdown("<h1>Title</h1>"), "# Title");
        assert_eq!(html_to_markdown("<h3 id=\"x\">Third</h3>"), "### Third");
        assert_eq!(html_to_markdown("<h6>Six</h6>"), "###### Six");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(html_to_markdown("<strong>bold</strong>"), "**bold**");
        assert_eq!(html_to_markdown("<em>it</em>"), "*it*");
        assert_eq!(html_to_markdown("<b>b</b> <i>i</i>"), "**b** *i*");
        assert_eq!(
            html_to_markdown("<strong><em>both</em></strong>"),
            "***both***"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            html_to_markdown("<a class=\"x\" href=\"https://example.com\">site</a>"),
            "[site](https://example.com)"
        );
        assert_eq!(
            html_to_markdown("<img src=\"a.png\" alt=\"pic\">"),
            "![pic](a.png)"
        );
    }

    #[test]
    fn test_list() {
        let md = html_to_markdown("<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
        assert_eq!(md, "* a\n* b");
    }

    #[test]
    fn test_paragraphs_collapse_newlines() {
        let md = html_to_markdown("<p>one</p>\n\n\n\n<p>two</p>");
        assert_eq!(md, "one\n\ntwo");
    }

    #[test]
    fn test_code_block_with_language() {
        let md = html_to_markdown(
            "<pre><code class=\"language-rust\">let a = &amp;b;\n</code></pre>",
        );
        assert_eq!(md, "```rust\nlet a = &b;\n```");
    }

    #[test]
    fn test_code_contents_not_rewritten() {
        let md = html_to_markdown("<pre><code>&lt;strong&gt;x&lt;/strong&gt;</code></pre>");
        assert_eq!(md, "```\n<strong>x</strong>\n```");

        let md = html_to_markdown("<p>use <code>&lt;em&gt;</code> tags</p>");
        assert_eq!(md, "use `<em>` tags");
    }

    #[test]
    fn test_unsupported_tags_pass_through() {
        assert_eq!(html_to_markdown("<div>kept</div>"), "<div>kept</div>");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(html_to_markdown("<p>a<br>b</p>"), "a\nb");
    }
}
