//! Line classifier and block-state machine
//!
//! Walks Markdown line by line and turns it into a flat stream of
//! [`LineEvent`]s. Multi-line constructs (code, quotes, tables, lists) are
//! bracketed by explicit start/end events, so emitters never need to look
//! back at raw text or duplicate recognition rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The multi-line construct currently being accumulated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum BlockMode {
    #[default]
    None,
    FencedCode,
    IndentedCode,
    Blockquote,
    Table,
}

/// Checkbox prefix of a task-list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Task<'a> {
    pub checked: bool,
    /// Item text after the checkbox
    pub body: &'a str,
}

/// A classified line, or a synthetic event closing a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LineEvent<'a> {
    Blank,
    Paragraph {
        text: &'a str,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Rule,
    ListItem {
        /// 1-based nesting depth
        depth: usize,
        ordered: bool,
        /// Full item text, including any checkbox
        text: &'a str,
        task: Option<Task<'a>>,
    },
    ListEnd,
    Image {
        alt: &'a str,
        src: &'a str,
        title: Option<&'a str>,
    },
    CodeStart {
        language: Option<String>,
    },
    CodeLine {
        text: &'a str,
    },
    CodeEnd,
    QuoteStart,
    QuoteLine {
        text: &'a str,
    },
    QuoteEnd,
    TableStart,
    TableRow {
        cells: Vec<&'a str>,
        header: bool,
    },
    TableEnd,
}

impl LineEvent<'_> {
    /// Short name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            LineEvent::Blank => "blank",
            LineEvent::Paragraph { .. } => "paragraph",
            LineEvent::Heading { .. } => "heading",
            LineEvent::Rule => "rule",
            LineEvent::ListItem { .. } => "list_item",
            LineEvent::ListEnd => "list_end",
            LineEvent::Image { .. } => "image",
            LineEvent::CodeStart { .. } => "code_start",
            LineEvent::CodeLine { .. } => "code_line",
            LineEvent::CodeEnd => "code_end",
            LineEvent::QuoteStart => "quote_start",
            LineEvent::QuoteLine { .. } => "quote_line",
            LineEvent::QuoteEnd => "quote_end",
            LineEvent::TableStart => "table_start",
            LineEvent::TableRow { .. } => "table_row",
            LineEvent::TableEnd => "table_end",
        }
    }
}

/// An event together with the 1-based source line that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified<'a> {
    pub line: usize,
    #[serde(flatten)]
    pub event: LineEvent<'a>,
}

/// Short fence tags mapped to the language names Jira understands
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("yml", "yaml"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("md", "markdown"),
    ("golang", "go"),
    ("cs", "csharp"),
    ("kt", "kotlin"),
];

/// Spaces per list nesting level
const LIST_INDENT: usize = 2;

/// Deepest list nesting; more deeply indented items stay at this depth
pub const MAX_LIST_DEPTH: usize = 32;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*`{3,}\s*([^\s`]*)[^`]*$").expect("valid fence regex"));

static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*`{3,}\s*$").expect("valid fence regex"));

static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?(.*)$").expect("valid quote regex"));

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").expect("valid heading regex")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.*)$").expect("valid list regex"));

static TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\]\s+(.*)$").expect("valid task regex"));

static IMAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*!\[([^\]]*)\]\(\s*([^\s)]+)(?:\s+"([^"]*)")?\s*\)\s*$"#)
        .expect("valid image regex")
});

/// Map a fence tag through the alias table
///
/// Lookup is case-insensitive; unknown tags are returned unchanged.
pub fn canonical_language(tag: &str) -> String {
    let lower = tag.to_ascii_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| tag.to_string())
}

/// Classify a whole Markdown document
///
/// Never fails: every open construct is closed at end of input, and empty
/// input yields no events.
pub fn classify(markdown: &str) -> Vec<Classified<'_>> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut classifier = Classifier::default();

    for (index, line) in lines.iter().enumerate() {
        classifier.feed(index + 1, line, lines.get(index + 1).copied());
    }

    classifier.finish()
}

#[derive(Debug, Default)]
struct Classifier<'a> {
    mode: BlockMode,
    list_depth: usize,
    line: usize,
    events: Vec<Classified<'a>>,
}

impl<'a> Classifier<'a> {
    fn feed(&mut self, number: usize, line: &'a str, next: Option<&'a str>) {
        self.line = number;

        if self.mode == BlockMode::FencedCode {
            if FENCE_CLOSE.is_match(line) {
                self.close_mode();
            } else {
                self.push(LineEvent::CodeLine { text: line });
            }
            return;
        }

        if let Some(caps) = FENCE_OPEN.captures(line) {
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| !tag.is_empty())
                .map(canonical_language);
            self.close_mode();
            self.push(LineEvent::CodeStart { language });
            self.mode = BlockMode::FencedCode;
            return;
        }

        if let Some(code) = indented_code(line) {
            let nested_list_item = self.list_depth > 0 && LIST_ITEM.is_match(line);
            if !nested_list_item {
                if self.mode != BlockMode::IndentedCode {
                    self.close_mode();
                    self.push(LineEvent::CodeStart { language: None });
                    self.mode = BlockMode::IndentedCode;
                }
                self.push(LineEvent::CodeLine { text: code });
                return;
            }
        }
        if self.mode == BlockMode::IndentedCode {
            self.close_mode();
        }

        if let Some(caps) = QUOTE.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            if self.mode != BlockMode::Blockquote {
                self.close_mode();
                self.push(LineEvent::QuoteStart);
                self.mode = BlockMode::Blockquote;
            }
            self.push(LineEvent::QuoteLine { text });
            return;
        }
        if self.mode == BlockMode::Blockquote {
            self.close_mode();
        }

        if is_table_row(line, self.mode == BlockMode::Table) {
            if !is_table_separator(line) {
                if self.mode != BlockMode::Table {
                    self.close_mode();
                    self.push(LineEvent::TableStart);
                    self.mode = BlockMode::Table;
                }
                self.push(LineEvent::TableRow {
                    cells: split_cells(line),
                    header: next.is_some_and(is_table_separator),
                });
            }
            return;
        }
        if self.mode == BlockMode::Table {
            self.close_mode();
        }

        self.classify_leaf(line);
    }

    /// Single-line constructs, tried once no block mode claimed the line
    fn classify_leaf(&mut self, line: &'a str) {
        if line.trim().is_empty() {
            self.push(LineEvent::Blank);
            return;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            self.push(LineEvent::Heading { level, text });
            return;
        }

        if is_rule(line) {
            self.push(LineEvent::Rule);
            return;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            let indent = caps.get(1).map_or(0, |m| indent_width(m.as_str()));
            let ordered = caps.get(2).is_some_and(|m| m.as_str().ends_with('.'));
            let text = caps.get(3).map_or("", |m| m.as_str());
            let depth = (indent / LIST_INDENT + 1)
                .min(self.list_depth + 1)
                .min(MAX_LIST_DEPTH);
            let task = if ordered { None } else { parse_task(text) };
            self.push(LineEvent::ListItem {
                depth,
                ordered,
                text,
                task,
            });
            return;
        }

        if let Some(caps) = IMAGE_LINE.captures(line) {
            self.push(LineEvent::Image {
                alt: caps.get(1).map_or("", |m| m.as_str()),
                src: caps.get(2).map_or("", |m| m.as_str()),
                title: caps.get(3).map(|m| m.as_str()),
            });
            return;
        }

        self.push(LineEvent::Paragraph {
            text: line.trim_start(),
        });
    }

    fn push(&mut self, event: LineEvent<'a>) {
        let keeps_list = matches!(
            event,
            LineEvent::ListItem { .. } | LineEvent::Blank | LineEvent::ListEnd
        );
        if self.list_depth > 0 && !keeps_list {
            self.list_depth = 0;
            self.events.push(Classified {
                line: self.line,
                event: LineEvent::ListEnd,
            });
        }
        if let LineEvent::ListItem { depth, .. } = &event {
            self.list_depth = *depth;
        }
        self.events.push(Classified {
            line: self.line,
            event,
        });
    }

    fn close_mode(&mut self) {
        match std::mem::take(&mut self.mode) {
            BlockMode::FencedCode | BlockMode::IndentedCode => self.push(LineEvent::CodeEnd),
            BlockMode::Blockquote => self.push(LineEvent::QuoteEnd),
            BlockMode::Table => self.push(LineEvent::TableEnd),
            BlockMode::None => {}
        }
    }

    fn finish(mut self) -> Vec<Classified<'a>> {
        self.close_mode();
        if self.list_depth > 0 {
            self.push(LineEvent::ListEnd);
            self.list_depth = 0;
        }
        self.events
    }
}

fn indented_code(line: &str) -> Option<&str> {
    if line.trim().is_empty() {
        return None;
    }
    line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn parse_task(text: &str) -> Option<Task<'_>> {
    let caps = TASK.captures(text)?;
    Some(Task {
        checked: caps.get(1).is_some_and(|m| m.as_str() != " "),
        body: caps.get(2).map_or("", |m| m.as_str()),
    })
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(first) = compact.chars().next() else {
        return false;
    };
    matches!(first, '*' | '-' | '_') && compact.len() >= 3 && compact.chars().all(|c| c == first)
}

fn is_table_row(line: &str, table_open: bool) -> bool {
    if !line.contains('|') {
        return false;
    }
    let trimmed = line.trim();
    table_open || (trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|'))
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}
