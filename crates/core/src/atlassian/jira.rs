//! Request-body helpers for the Jira REST API
//!
//! Jira's v2 API takes descriptions and comments as wiki markup, while v3
//! requires ADF documents. These functions pick the right conversion for an
//! API version and shape the JSON fragments the HTTP client sends.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::adf::{DocumentNode, Node};
use crate::markdown::{to_structured_document, to_wiki_markup};

/// Error type for payload formatting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unsupported API version: {0}. Use 2 or 3.")]
    UnsupportedApiVersion(String),
}

/// Jira REST API version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// Wiki markup bodies
    V2,
    /// ADF bodies
    #[default]
    V3,
}

impl FromStr for ApiVersion {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "2" => Ok(ApiVersion::V2),
            "3" => Ok(ApiVersion::V3),
            _ => Err(FormatError::UnsupportedApiVersion(s.to_string())),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V2 => write!(f, "2"),
            ApiVersion::V3 => write!(f, "3"),
        }
    }
}

/// Convert a Markdown description for the given API version
///
/// # Arguments
/// * `version` - Target API version
/// * `markdown` - Description written in Markdown
///
/// # Returns
/// * `Value` - A JSON string of wiki markup (v2) or an ADF document (v3)
pub fn format_description(version: ApiVersion, markdown: &str) -> Value {
    match version {
        ApiVersion::V2 => Value::String(to_wiki_markup(markdown)),
        ApiVersion::V3 => to_structured_document(markdown).to_value(),
    }
}

/// Embed plain text for the given API version without reading it as Markdown
///
/// v2 takes the text as-is; v3 wraps it with [`adf_from_plain_text`].
pub fn format_plain_text(version: ApiVersion, text: &str) -> Value {
    match version {
        ApiVersion::V2 => Value::String(text.to_string()),
        ApiVersion::V3 => adf_from_plain_text(text).to_value(),
    }
}

/// Build a comment request body (`{"body": ...}`) from Markdown
pub fn format_comment(version: ApiVersion, markdown: &str) -> Value {
    json!({ "body": format_description(version, markdown) })
}

/// Check whether a JSON value already looks like an ADF document
///
/// Requires a non-null `version`, `type == "doc"` and an array `content`.
pub fn is_adf_document(value: &Value) -> bool {
    value.get("version").is_some_and(|v| !v.is_null())
        && value.get("type").and_then(|t| t.as_str()) == Some("doc")
        && value.get("content").is_some_and(Value::is_array)
}

/// Wrap plain text in an ADF document without interpreting any Markdown
///
/// Paragraphs are separated by blank lines; each non-empty line of a
/// paragraph becomes its own text node.
pub fn adf_from_plain_text(text: &str) -> DocumentNode {
    let content = text
        .split("\n\n")
        .filter_map(|paragraph| {
            let lines: Vec<Node> = paragraph
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(Node::text)
                .collect();
            (!lines.is_empty()).then(|| Node::Paragraph { content: lines })
        })
        .collect();
    DocumentNode::new(content)
}

/// Fields for a create-issue request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub project: String,
    pub issue_type: String,
    pub summary: String,
    /// Markdown description
    pub description: Option<String>,
}

/// Build the `fields` object of a create-issue request body
///
/// # Arguments
/// * `version` - Target API version, decides how the description is encoded
/// * `draft` - Issue fields with a Markdown description
///
/// # Returns
/// * `Value` - `{"fields": {...}}` ready to POST to `/rest/api/{version}/issue`
pub fn build_issue_payload(version: ApiVersion, draft: &IssueDraft) -> Value {
    let mut fields = json!({
        "project": { "key": draft.project },
        "issuetype": { "name": draft.issue_type },
        "summary": draft.summary,
    });

    if let Some(description) = &draft.description {
        fields["description"] = format_description(version, description);
    }

    json!({ "fields": fields })
}
