//! Inline formatting engine
//!
//! A line of text (already stripped of block markup) is tokenized into an
//! [`Inline`] tree by an ordered table of small matchers. At each position the
//! matchers are tried in [`MATCHERS`] order and the first hit wins; text between
//! hits becomes plain text. Emphasis-like spans are tokenized recursively so
//! marks compose, while code spans, links and images are terminal.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::adf::{LinkAttrs, Mark, Node};

/// A typed inline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strike(Vec<Inline>),
    Code(String),
    Link {
        text: String,
        href: String,
        title: Option<String>,
    },
    Image {
        alt: String,
        src: String,
        title: Option<String>,
    },
    LineBreak,
}

/// A matcher inspects the text at the scan position and returns the
/// recognized run plus the number of bytes it consumed.
type Matcher = fn(&mut Scan<'_>) -> Option<(Inline, usize)>;

/// Precedence order of the inline constructs
const MATCHERS: &[(&str, Matcher)] = &[
    ("escape", escape),
    ("image", image),
    ("link", link),
    ("strong_emphasis", strong_emphasis),
    ("strikethrough", strikethrough),
    ("strong", strong),
    ("emphasis", emphasis),
    ("code_span", code_span),
];

/// Characters that can start a construct; anything else is plain text
const TRIGGERS: &[char] = &['\\', '!', '[', '*', '_', '~', '`'];

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*([^\s)]+)(?:\s+"([^"]*)")?\s*\)"#).expect("valid image regex")
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[([^\]]*)\]\(\s*([^\s)]*)(?:\s+"([^"]*)")?\s*\)"#).expect("valid link regex")
});

/// Closing runs a failed search can rule out for the rest of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Closer {
    Delim(&'static str),
    Ticks(usize),
}

/// Position of one `tokenize` pass over a piece of text
///
/// Whether a closing run is valid depends only on where it sits, so once a
/// search from offset `s` finds nothing, every later search for the same
/// closer fails too. Remembering those offsets keeps a line linear.
#[derive(Debug)]
struct Scan<'t> {
    text: &'t str,
    pos: usize,
    exhausted: HashMap<Closer, usize>,
    /// Links and images opening before these offsets share a failing tail
    link_dead_until: usize,
    image_dead_until: usize,
}

impl<'t> Scan<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            pos: 0,
            exhausted: HashMap::new(),
            link_dead_until: 0,
            image_dead_until: 0,
        }
    }

    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn prev(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    fn is_exhausted(&self, closer: Closer, from: usize) -> bool {
        self.exhausted.get(&closer).is_some_and(|&dead| from >= dead)
    }

    fn exhaust(&mut self, closer: Closer, from: usize) {
        self.exhausted.entry(closer).or_insert(from);
    }

    /// Where the tail of a failed link or image opening at `from` ends
    ///
    /// Every opening before that offset reaches the same `]` or the same
    /// URL run, and so fails the same way.
    fn failed_tail_end(&self, from: usize) -> usize {
        let len = self.text.len();
        let close = self.text[from..].find(']').map_or(len, |i| from + i);
        let Some(target) = self.text[close..].strip_prefix("](") else {
            return close;
        };
        let url = target.trim_start();
        let url_start = len - url.len();
        url.find(|c: char| c.is_whitespace() || c == ')')
            .map_or(len, |i| url_start + i)
    }
}

/// Parse one line of text into inline runs
///
/// A trailing double space is removed and turned into a trailing
/// [`Inline::LineBreak`].
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let (body, hard_break) = match line.strip_suffix("  ") {
        Some(body) if !body.trim().is_empty() => (body.trim_end(), true),
        _ => (line, false),
    };

    let mut inlines = tokenize(body);
    if hard_break {
        inlines.push(Inline::LineBreak);
    }
    inlines
}

fn tokenize(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut scan = Scan::new(text);

    while let Some(ch) = scan.rest().chars().next() {
        let hit = if TRIGGERS.contains(&ch) {
            MATCHERS.iter().find_map(|(_, matcher)| matcher(&mut scan))
        } else {
            None
        };

        match hit {
            Some((Inline::Text(literal), consumed)) => {
                plain.push_str(&literal);
                scan.pos += consumed;
            }
            Some((inline, consumed)) => {
                if !plain.is_empty() {
                    out.push(Inline::Text(std::mem::take(&mut plain)));
                }
                out.push(inline);
                scan.pos += consumed;
            }
            None => {
                plain.push(ch);
                scan.pos += ch.len_utf8();
            }
        }
    }

    if !plain.is_empty() {
        out.push(Inline::Text(plain));
    }
    out
}

fn escape(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    let escaped = scan.rest().strip_prefix('\\')?.chars().next()?;
    escaped
        .is_ascii_punctuation()
        .then(|| (Inline::Text(escaped.to_string()), 1 + escaped.len_utf8()))
}

fn image(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    let rest = scan.rest();
    if !rest.starts_with("![") || scan.pos < scan.image_dead_until {
        return None;
    }
    let Some(caps) = IMAGE.captures(rest) else {
        scan.image_dead_until = scan.failed_tail_end(scan.pos);
        return None;
    };
    let whole = caps.get(0)?;
    Some((
        Inline::Image {
            alt: caps[1].to_string(),
            src: caps[2].to_string(),
            title: caps.get(3).map(|t| t.as_str().to_string()),
        },
        whole.end(),
    ))
}

fn link(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    let rest = scan.rest();
    if !rest.starts_with('[') || scan.pos < scan.link_dead_until {
        return None;
    }
    let Some(caps) = LINK.captures(rest) else {
        scan.link_dead_until = scan.failed_tail_end(scan.pos);
        return None;
    };
    let whole = caps.get(0)?;
    Some((
        Inline::Link {
            text: caps[1].to_string(),
            href: caps[2].to_string(),
            title: caps.get(3).map(|t| t.as_str().to_string()),
        },
        whole.end(),
    ))
}

fn strong_emphasis(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    for delim in ["***", "___"] {
        if let Some((inner, consumed)) = delimited(scan, delim) {
            let run = Inline::Strong(vec![Inline::Emphasis(tokenize(inner))]);
            return Some((run, consumed));
        }
    }
    None
}

fn strikethrough(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    let (inner, consumed) = delimited(scan, "~~")?;
    Some((Inline::Strike(tokenize(inner)), consumed))
}

fn strong(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    for delim in ["**", "__"] {
        if let Some((inner, consumed)) = delimited(scan, delim) {
            return Some((Inline::Strong(tokenize(inner)), consumed));
        }
    }
    None
}

fn emphasis(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    for delim in ["*", "_"] {
        if let Some((inner, consumed)) = delimited(scan, delim) {
            return Some((Inline::Emphasis(tokenize(inner)), consumed));
        }
    }
    None
}

fn code_span(scan: &mut Scan<'_>) -> Option<(Inline, usize)> {
    let rest = scan.rest();
    let ticks = rest.len() - rest.trim_start_matches('`').len();
    if ticks == 0 || scan.is_exhausted(Closer::Ticks(ticks), scan.pos + ticks) {
        return None;
    }
    let fence = &rest[..ticks];
    let after = &rest[ticks..];

    let mut search = 0;
    while let Some(offset) = after[search..].find(fence) {
        let end = search + offset;
        let run = after[end..].len() - after[end..].trim_start_matches('`').len();
        if run == ticks && end > 0 {
            return Some((Inline::Code(after[..end].to_string()), ticks * 2 + end));
        }
        search = end + run;
    }

    scan.exhaust(Closer::Ticks(ticks), scan.pos + ticks);
    None
}

/// Find a span wrapped in `delim` at the scan position
///
/// Returns the inner text and the bytes consumed including both delimiters.
/// The inner text must be non-empty and must not start or end with
/// whitespace. Single-character delimiters must not touch another copy of
/// themselves, and underscores must not sit inside a word.
fn delimited<'t>(scan: &mut Scan<'t>, delim: &'static str) -> Option<(&'t str, usize)> {
    let after = scan.rest().strip_prefix(delim)?;
    let marker = delim.chars().next()?;
    let underscore = marker == '_';

    if after.is_empty() || after.starts_with(char::is_whitespace) || after.starts_with(marker) {
        return None;
    }
    if underscore && scan.prev().is_some_and(char::is_alphanumeric) {
        return None;
    }

    let from = scan.pos + delim.len();
    if scan.is_exhausted(Closer::Delim(delim), from) {
        return None;
    }

    let mut search = 0;
    while let Some(offset) = after[search..].find(delim) {
        let end = search + offset;
        let inner = &after[..end];
        let tail = &after[end + delim.len()..];

        let closes = !inner.is_empty()
            && !inner.ends_with(char::is_whitespace)
            && !inner.ends_with(marker)
            && !tail.starts_with(marker)
            && !(underscore && tail.starts_with(char::is_alphanumeric));

        if closes {
            return Some((inner, end + delim.len() * 2));
        }
        search = end + 1;
    }

    scan.exhaust(Closer::Delim(delim), from);
    None
}

/// Render inline runs as Jira wiki markup
pub fn render_wiki(inlines: &[Inline]) -> String {
    let mut out = String::new();
    write_wiki(inlines, &mut out);
    out
}

fn write_wiki(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => wrap_wiki(children, "*", out),
            Inline::Emphasis(children) => wrap_wiki(children, "_", out),
            Inline::Strike(children) => wrap_wiki(children, "-", out),
            Inline::Code(code) => {
                out.push_str("{{");
                out.push_str(code);
                out.push_str("}}");
            }
            Inline::Link { text, href, .. } => {
                if text.is_empty() {
                    out.push_str(&format!("[{href}]"));
                } else {
                    out.push_str(&format!("[{text}|{href}]"));
                }
            }
            Inline::Image { src, .. } => out.push_str(&format!("!{src}!")),
            Inline::LineBreak => out.push_str("\\\\"),
        }
    }
}

fn wrap_wiki(children: &[Inline], marker: &str, out: &mut String) {
    out.push_str(marker);
    write_wiki(children, out);
    out.push_str(marker);
}

/// Flatten inline runs into ADF text nodes carrying composed marks
pub fn to_adf_nodes(inlines: &[Inline]) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut marks = Vec::new();
    flatten(inlines, &mut marks, &mut nodes);
    nodes
}

fn flatten(inlines: &[Inline], marks: &mut Vec<Mark>, out: &mut Vec<Node>) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => push_text(out, text, marks.clone()),
            Inline::Strong(children) => with_mark(children, Mark::Strong, marks, out),
            Inline::Emphasis(children) => with_mark(children, Mark::Em, marks, out),
            Inline::Strike(children) => with_mark(children, Mark::Strike, marks, out),
            Inline::Code(code) => {
                let mut code_marks = marks.clone();
                code_marks.push(Mark::Code);
                push_text(out, code, code_marks);
            }
            Inline::Link { text, href, title } => {
                let label = if text.is_empty() { href } else { text };
                push_text(out, label, link_marks(marks, href, title.clone()));
            }
            Inline::Image { alt, src, title } => {
                let label = if alt.is_empty() { src } else { alt };
                push_text(out, label, link_marks(marks, src, title.clone()));
            }
            Inline::LineBreak => out.push(Node::HardBreak),
        }
    }
}

fn with_mark(children: &[Inline], mark: Mark, marks: &mut Vec<Mark>, out: &mut Vec<Node>) {
    marks.push(mark);
    flatten(children, marks, out);
    marks.pop();
}

fn link_marks(marks: &[Mark], href: &str, title: Option<String>) -> Vec<Mark> {
    let mut marks = marks.to_vec();
    marks.push(Mark::Link {
        attrs: LinkAttrs {
            href: href.to_string(),
            title,
        },
    });
    marks
}

/// Append a text node, merging with the previous one when marks match
fn push_text(out: &mut Vec<Node>, text: &str, marks: Vec<Mark>) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text {
        text: prev_text,
        marks: prev_marks,
    }) = out.last_mut()
    {
        if *prev_marks == marks {
            prev_text.push_str(text);
            return;
        }
    }
    out.push(Node::Text {
        text: text.to_string(),
        marks,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_matcher_precedence_order() {
        let names: Vec<&str> = MATCHERS.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "escape",
                "image",
                "link",
                "strong_emphasis",
                "strikethrough",
                "strong",
                "emphasis",
                "code_span"
            ]
        );
    }

    #[test]
    fn test_plain_text_is_single_run() {
        assert_eq!(parse_inline("just words"), vec![text("just words")]);
    }

    #[test]
    fn test_strong_emphasis_is_one_composed_run() {
        // Act
        let inlines = parse_inline("***x***");
        let nodes = to_adf_nodes(&inlines);

        // Assert
        assert_eq!(
            inlines,
            vec![Inline::Strong(vec![Inline::Emphasis(vec![text("x")])])]
        );
        assert_eq!(
            nodes,
            vec![Node::Text {
                text: "x".to_string(),
                marks: vec![Mark::Strong, Mark::Em],
            }]
        );
        assert_eq!(render_wiki(&inlines), "*_x_*");
    }

    #[test]
    fn test_code_span_protects_contents() {
        // Act
        let inlines = parse_inline("`**x**`");

        // Assert
        assert_eq!(inlines, vec![Inline::Code("**x**".to_string())]);
        assert_eq!(render_wiki(&inlines), "{{**x**}}");
        assert_eq!(
            to_adf_nodes(&inlines),
            vec![Node::Text {
                text: "**x**".to_string(),
                marks: vec![Mark::Code],
            }]
        );
    }

    #[test]
    fn test_double_backtick_code_span() {
        assert_eq!(
            parse_inline("``a ` b``"),
            vec![Inline::Code("a ` b".to_string())]
        );
    }

    #[test]
    fn test_unclosed_backtick_is_literal() {
        assert_eq!(parse_inline("a `b"), vec![text("a `b")]);
    }

    #[test]
    fn test_link_wiki_and_adf() {
        // Act
        let inlines = parse_inline("[t](u)");

        // Assert
        assert_eq!(render_wiki(&inlines), "[t|u]");
        assert_eq!(
            to_adf_nodes(&inlines),
            vec![Node::Text {
                text: "t".to_string(),
                marks: vec![Mark::Link {
                    attrs: LinkAttrs {
                        href: "u".to_string(),
                        title: None,
                    },
                }],
            }]
        );
    }

    #[test]
    fn test_link_with_title() {
        // Act
        let inlines = parse_inline(r#"[docs](https://example.com "Docs")"#);

        // Assert
        assert_eq!(
            inlines,
            vec![Inline::Link {
                text: "docs".to_string(),
                href: "https://example.com".to_string(),
                title: Some("Docs".to_string()),
            }]
        );
    }

    #[test]
    fn test_image_before_link() {
        // Act
        let inlines = parse_inline("see ![Alt text](https://example.com/image.png)");

        // Assert
        assert_eq!(render_wiki(&inlines), "see !https://example.com/image.png!");
    }

    #[test]
    fn test_wiki_basic_formatting() {
        assert_eq!(render_wiki(&parse_inline("**Bold text**")), "*Bold text*");
        assert_eq!(render_wiki(&parse_inline("__Bold text__")), "*Bold text*");
        assert_eq!(render_wiki(&parse_inline("*Italic text*")), "_Italic text_");
        assert_eq!(render_wiki(&parse_inline("_Italic text_")), "_Italic text_");
        assert_eq!(
            render_wiki(&parse_inline("***Bold and italic***")),
            "*_Bold and italic_*"
        );
        assert_eq!(render_wiki(&parse_inline("~~Strikethrough~~")), "-Strikethrough-");
        assert_eq!(render_wiki(&parse_inline("`code`")), "{{code}}");
    }

    #[test]
    fn test_nested_marks_compose() {
        // Act
        let nodes = to_adf_nodes(&parse_inline("**bold *both* bold**"));

        // Assert
        assert_eq!(
            nodes,
            vec![
                Node::Text {
                    text: "bold ".to_string(),
                    marks: vec![Mark::Strong],
                },
                Node::Text {
                    text: "both".to_string(),
                    marks: vec![Mark::Strong, Mark::Em],
                },
                Node::Text {
                    text: " bold".to_string(),
                    marks: vec![Mark::Strong],
                },
            ]
        );
    }

    #[test]
    fn test_escape_produces_literal() {
        // Act
        let inlines = parse_inline(r"\*not italic\*");

        // Assert
        assert_eq!(inlines, vec![text("*not italic*")]);
    }

    #[test]
    fn test_intraword_underscore_is_literal() {
        assert_eq!(parse_inline("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn test_spaced_asterisk_is_literal() {
        assert_eq!(parse_inline("2 * 3 * 4"), vec![text("2 * 3 * 4")]);
    }

    #[test]
    fn test_trailing_double_space_breaks_line() {
        // Act
        let inlines = parse_inline("first line  ");

        // Assert
        assert_eq!(inlines, vec![text("first line"), Inline::LineBreak]);
        assert_eq!(render_wiki(&inlines), "first line\\\\");
        assert_eq!(
            to_adf_nodes(&inlines),
            vec![Node::text("first line"), Node::HardBreak]
        );
    }

    #[test]
    fn test_whitespace_only_line_has_no_break() {
        assert_eq!(parse_inline("   "), vec![text("   ")]);
    }

    #[test]
    fn test_mixed_sentence() {
        // Act
        let wiki = render_wiki(&parse_inline(
            "This is **bold**, _italic_ and a [link](https://x.io).",
        ));

        // Assert
        assert_eq!(wiki, "This is *bold*, _italic_ and a [link|https://x.io].");
    }

    #[test]
    fn test_strike_mark_in_adf() {
        // Act
        let nodes = to_adf_nodes(&parse_inline("~~x~~"));

        // Assert
        assert_eq!(
            nodes,
            vec![Node::Text {
                text: "x".to_string(),
                marks: vec![Mark::Strike],
            }]
        );
    }

    #[test]
    fn test_inline_image_becomes_linked_text_in_adf() {
        // Arrange
        let link = |href: &str| Mark::Link {
            attrs: LinkAttrs {
                href: href.to_string(),
                title: None,
            },
        };

        // Act
        let with_alt = to_adf_nodes(&parse_inline("a ![alt](u)"));
        let without_alt = to_adf_nodes(&parse_inline("a ![](u)"));

        // Assert
        assert_eq!(
            with_alt,
            vec![
                Node::text("a "),
                Node::Text {
                    text: "alt".to_string(),
                    marks: vec![link("u")],
                },
            ]
        );
        assert_eq!(
            without_alt[1],
            Node::Text {
                text: "u".to_string(),
                marks: vec![link("u")],
            }
        );
    }

    #[test]
    fn test_empty_link_text_falls_back_to_href() {
        // Act
        let inlines = parse_inline("[](u)");

        // Assert
        assert_eq!(render_wiki(&inlines), "[u]");
        assert_eq!(
            to_adf_nodes(&inlines),
            vec![Node::Text {
                text: "u".to_string(),
                marks: vec![Mark::Link {
                    attrs: LinkAttrs {
                        href: "u".to_string(),
                        title: None,
                    },
                }],
            }]
        );
    }

    #[test]
    fn test_span_after_unclosed_delimiters_still_matches() {
        // Act
        let inlines = parse_inline("~~a ~~b and *c *d* then [x] [y](z)");

        // Assert
        assert_eq!(render_wiki(&inlines), "~~a ~~b and _c *d_ then [x] [y|z]");
    }

    #[test]
    fn test_unclosed_delimiters_scale_linearly() {
        // Arrange
        let inputs = [
            "~~a ".repeat(25_000),
            "*a ".repeat(33_000),
            "_a ".repeat(33_000),
            "`a ".repeat(33_000),
            "[a ".repeat(33_000),
            "![a](".repeat(20_000) + " x)",
            "[a](".repeat(25_000) + " x)",
        ];

        for input in &inputs {
            // Act
            let started = std::time::Instant::now();
            let inlines = parse_inline(input);
            let nodes = to_adf_nodes(&inlines);

            // Assert
            assert!(!nodes.is_empty());
            assert!(
                started.elapsed() < std::time::Duration::from_secs(5),
                "{} bytes took {:?}",
                input.len(),
                started.elapsed()
            );
        }
    }
}
