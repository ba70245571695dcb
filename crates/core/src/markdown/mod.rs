//! Markdown to Jira markup conversion
//!
//! Both targets share one [`classify`] pass over the source lines and the
//! [`inline`] engine for text inside blocks:
//!
//! - [`to_wiki_markup`]: the line-based wiki dialect accepted by REST API v2
//! - [`to_structured_document`]: an ADF tree for REST API v3
//!
//! Conversion is total. Malformed Markdown is interpreted on a best-effort
//! basis and unterminated blocks are closed at end of input.

mod adf;
pub mod classify;
pub mod inline;
mod wiki;

pub use classify::{classify, Classified, LineEvent};

use crate::adf::DocumentNode;

/// Convert Markdown to Jira wiki markup
///
/// # Arguments
/// * `markdown` - Markdown source; may be empty
///
/// # Returns
/// * `String` - Wiki-markup lines joined with `\n`
pub fn to_wiki_markup(markdown: &str) -> String {
    wiki::emit(&classify(markdown)).join("\n")
}

/// Convert Markdown to an ADF document
///
/// # Arguments
/// * `markdown` - Markdown source; may be empty
///
/// # Returns
/// * `DocumentNode` - Version 1 `doc` node, with empty content for empty input
pub fn to_structured_document(markdown: &str) -> DocumentNode {
    adf::build(&classify(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_is_total_on_odd_input() {
        // Arrange: fragments that open constructs without closing them
        let inputs = [
            "```",
            "> ",
            "|",
            "| a |\n|---|",
            "- ",
            "1.",
            "* * *",
            "![](",
            "[",
            "`",
            "**",
            "\\",
            "\t",
            "#",
            "\u{1F600} *é* _ü_",
            "\r\n\r\n",
        ];

        for input in inputs {
            // Act
            let wiki = to_wiki_markup(input);
            let doc = to_structured_document(input);

            // Assert
            if !input.trim().is_empty() {
                assert!(!wiki.is_empty(), "{input:?}");
            }
            assert!(doc.to_value().is_object(), "{input:?}");
        }
    }

    #[test]
    fn test_both_targets_agree_on_block_count() {
        // Arrange
        let markdown = "# Title\n\nSome text\n\n- one\n- two\n\n---";

        // Act
        let wiki = to_wiki_markup(markdown);
        let doc = to_structured_document(markdown);

        // Assert
        assert_eq!(wiki, "h1. Title\n\nSome text\n\n* one\n* two\n\n----");
        assert_eq!(
            doc.content.iter().map(|n| n.type_name()).collect::<Vec<_>>(),
            vec!["heading", "paragraph", "bulletList", "rule"]
        );
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(to_wiki_markup("# A\r\nb\r\n"), "h1. A\nb");
    }

    #[test]
    fn test_deeply_nested_list_serializes() {
        // Arrange
        let markdown: String = (0..1500)
            .map(|level| format!("{}- x\n", "\t".repeat(level)))
            .collect();

        // Act
        let wiki = to_wiki_markup(&markdown);
        let value = to_structured_document(&markdown).to_value();

        // Assert
        assert!(value.is_object());
        let deepest = "*".repeat(classify::MAX_LIST_DEPTH + 1);
        assert!(!wiki.contains(&deepest));
    }
}
