//! Atlassian Document Format (ADF) model
//!
//! Typed nodes for the JSON rich-text format used by the Jira REST API v3.
//! Every node serializes with a `type` tag, so a [`DocumentNode`] maps directly
//! onto the wire shape `{"version": 1, "type": "doc", "content": [...]}`.

mod render;

pub use render::{extract_description, render_adf};

use serde::{Deserialize, Serialize};

/// Schema version carried by every ADF document
pub const ADF_VERSION: u32 = 1;

/// Root of an ADF document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: Vec<Node>,
}

/// The only root type ADF knows about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Doc,
}

impl DocumentNode {
    /// Create a version 1 document from block nodes
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            version: ADF_VERSION,
            kind: DocumentKind::Doc,
            content,
        }
    }

    /// Serialize to the JSON wire shape
    pub fn to_value(&self) -> serde_json::Value {
        // Serializing these types cannot fail: no maps with non-string keys.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for DocumentNode {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Block and inline nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Paragraph {
        content: Vec<Node>,
    },
    Heading {
        attrs: HeadingAttrs,
        content: Vec<Node>,
    },
    BulletList {
        content: Vec<Node>,
    },
    OrderedList {
        content: Vec<Node>,
    },
    ListItem {
        content: Vec<Node>,
    },
    Blockquote {
        content: Vec<Node>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<CodeBlockAttrs>,
        content: Vec<Node>,
    },
    Table {
        content: Vec<Node>,
    },
    TableRow {
        content: Vec<Node>,
    },
    TableCell {
        content: Vec<Node>,
    },
    Rule,
    MediaSingle {
        content: Vec<Node>,
    },
    Media {
        attrs: MediaAttrs,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

/// Attributes of an external media node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttrs {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    External,
}

/// Inline formatting annotation attached to a text node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Em,
    Strike,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Node {
    /// Plain text node without marks
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Paragraph holding the given inline nodes, or a single empty text node
    /// when there are none (ADF rejects empty paragraph content)
    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph {
            content: non_empty(content),
        }
    }

    /// The `type` tag this node serializes with
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::BulletList { .. } => "bulletList",
            Node::OrderedList { .. } => "orderedList",
            Node::ListItem { .. } => "listItem",
            Node::Blockquote { .. } => "blockquote",
            Node::CodeBlock { .. } => "codeBlock",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "tableRow",
            Node::TableCell { .. } => "tableCell",
            Node::Rule => "rule",
            Node::MediaSingle { .. } => "mediaSingle",
            Node::Media { .. } => "media",
            Node::Text { .. } => "text",
            Node::HardBreak => "hardBreak",
        }
    }

    /// Mutable child nodes, if this node type has any
    pub fn content_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Paragraph { content }
            | Node::Heading { content, .. }
            | Node::BulletList { content }
            | Node::OrderedList { content }
            | Node::ListItem { content }
            | Node::Blockquote { content }
            | Node::CodeBlock { content, .. }
            | Node::Table { content }
            | Node::TableRow { content }
            | Node::TableCell { content }
            | Node::MediaSingle { content } => Some(content),
            Node::Rule | Node::Media { .. } | Node::Text { .. } | Node::HardBreak => None,
        }
    }
}

/// Replace an empty inline sequence with a single empty text node
pub(crate) fn non_empty(content: Vec<Node>) -> Vec<Node> {
    if content.is_empty() {
        vec![Node::text("")]
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_wire_shape() {
        // Arrange
        let doc = DocumentNode::default();

        // Act
        let value = doc.to_value();

        // Assert
        assert_eq!(value, json!({"version": 1, "type": "doc", "content": []}));
    }

    #[test]
    fn test_node_tags_are_camel_case() {
        // Arrange
        let doc = DocumentNode::new(vec![
            Node::BulletList {
                content: vec![Node::ListItem {
                    content: vec![Node::paragraph(vec![Node::text("a")])],
                }],
            },
            Node::Rule,
            Node::CodeBlock {
                attrs: None,
                content: vec![Node::text("x")],
            },
        ]);

        // Act
        let value = doc.to_value();

        // Assert
        assert_eq!(value["content"][0]["type"], "bulletList");
        assert_eq!(value["content"][0]["content"][0]["type"], "listItem");
        assert_eq!(value["content"][1], json!({"type": "rule"}));
        assert_eq!(value["content"][2]["type"], "codeBlock");
        assert!(value["content"][2].get("attrs").is_none());
    }

    #[test]
    fn test_text_marks_serialize() {
        // Arrange
        let node = Node::Text {
            text: "t".to_string(),
            marks: vec![
                Mark::Strong,
                Mark::Link {
                    attrs: LinkAttrs {
                        href: "u".to_string(),
                        title: None,
                    },
                },
            ],
        };

        // Act
        let value = serde_json::to_value(&node).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "type": "text",
                "text": "t",
                "marks": [{"type": "strong"}, {"type": "link", "attrs": {"href": "u"}}]
            })
        );
    }

    #[test]
    fn test_plain_text_omits_marks() {
        // Act
        let value = serde_json::to_value(Node::text("plain")).unwrap();

        // Assert
        assert_eq!(value, json!({"type": "text", "text": "plain"}));
    }

    #[test]
    fn test_media_attrs_serialize() {
        // Arrange
        let node = Node::Media {
            attrs: MediaAttrs {
                kind: MediaKind::External,
                url: "https://example.com/a.png".to_string(),
                alt: Some("Alt".to_string()),
                title: None,
            },
        };

        // Act
        let value = serde_json::to_value(&node).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "type": "media",
                "attrs": {"type": "external", "url": "https://example.com/a.png", "alt": "Alt"}
            })
        );
    }

    #[test]
    fn test_document_deserializes_from_wire_shape() {
        // Arrange
        let value = json!({
            "version": 1,
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "H"}]}
            ]
        });

        // Act
        let doc: DocumentNode = serde_json::from_value(value).unwrap();

        // Assert
        assert_eq!(doc.version, 1);
        assert_eq!(
            doc.content,
            vec![Node::Heading {
                attrs: HeadingAttrs { level: 2 },
                content: vec![Node::text("H")],
            }]
        );
    }

    #[test]
    fn test_paragraph_never_empty() {
        // Act
        let node = Node::paragraph(Vec::new());

        // Assert
        assert_eq!(
            node,
            Node::Paragraph {
                content: vec![Node::text("")]
            }
        );
    }
}
