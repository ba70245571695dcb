//! Readable text view of ADF documents
//!
//! Jira returns descriptions and comment bodies either as plain strings (API v2)
//! or as ADF JSON (API v3). These functions walk the raw JSON so that unknown
//! node types from newer schema versions still degrade to their text.

use serde_json::Value;

/// Extract readable text from a Jira description or comment body
///
/// # Arguments
/// * `value` - The field value from the Jira API, a string or an ADF document
///
/// # Returns
/// * `Option<String>` - Rendered text, or None if empty or not a document
pub fn extract_description(value: Option<Value>) -> Option<String> {
    value.and_then(|v| match &v {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => {
            if v.get("type").and_then(|t| t.as_str()) == Some("doc") {
                render_adf(&v)
            } else {
                None
            }
        }
        _ => None,
    })
}

/// Render an ADF document to Markdown-flavoured text
///
/// # Arguments
/// * `value` - The ADF document as JSON
///
/// # Returns
/// * `Option<String>` - Rendered text, or None if the document has no text
pub fn render_adf(value: &Value) -> Option<String> {
    let mut output = String::new();

    for node in children(value) {
        if let Some(rendered) = render_node(node, 0) {
            output.push_str(&rendered);
            if !rendered.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    let output = output.trim();
    if output.is_empty() {
        None
    } else {
        Some(output.to_string())
    }
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(|c| c.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn render_children(node: &Value, depth: usize) -> String {
    children(node)
        .iter()
        .filter_map(|child| render_node(child, depth))
        .collect()
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.get("attrs").and_then(|a| a.get(name))
}

/// Render list items; `depth` is the nesting level of the list itself
fn render_list(node: &Value, depth: usize, ordered: bool) -> String {
    let indent = "  ".repeat(depth);
    let mut text = String::new();

    for (index, item) in children(node).iter().enumerate() {
        let marker = if ordered {
            format!("{}.", index + 1)
        } else {
            "•".to_string()
        };

        let mut first = true;
        for child in children(item) {
            match child.get("type").and_then(|t| t.as_str()) {
                Some("bulletList") => text.push_str(&render_list(child, depth + 1, false)),
                Some("orderedList") => text.push_str(&render_list(child, depth + 1, true)),
                _ => {
                    let body = render_node(child, depth).unwrap_or_default();
                    if first {
                        text.push_str(&format!("{indent}{marker} {}\n", body.trim()));
                        first = false;
                    } else {
                        text.push_str(&format!("{indent}  {}\n", body.trim()));
                    }
                }
            }
        }

        if first {
            text.push_str(&format!("{indent}{marker}\n"));
        }
    }

    text
}

/// Render a single ADF node recursively
fn render_node(node: &Value, depth: usize) -> Option<String> {
    let node_type = node.get("type")?.as_str()?;

    match node_type {
        "paragraph" => {
            let text = render_children(node, depth);
            Some(format!("{text}\n"))
        }
        "heading" => {
            let level = attr(node, "level").and_then(|l| l.as_u64()).unwrap_or(1) as usize;
            let marker = "#".repeat(level.clamp(1, 6));
            let text = render_children(node, 0);
            Some(format!("{} {}\n", marker, text.trim()))
        }
        "bulletList" => Some(render_list(node, depth, false)),
        "orderedList" => Some(render_list(node, depth, true)),
        "listItem" => Some(render_children(node, depth)),
        "codeBlock" => {
            let language = attr(node, "language").and_then(|l| l.as_str()).unwrap_or("");
            let text = render_children(node, 0);
            Some(format!("```{}\n{}\n```\n", language, text.trim_end()))
        }
        "blockquote" => {
            let text = render_children(node, depth);
            let quoted: Vec<String> = text
                .trim_end()
                .lines()
                .map(|line| format!("> {line}").trim_end().to_string())
                .collect();
            Some(format!("{}\n", quoted.join("\n")))
        }
        "table" => {
            let rows: Vec<String> = children(node)
                .iter()
                .map(|row| {
                    let cells: Vec<String> = children(row)
                        .iter()
                        .map(|cell| render_children(cell, 0).trim().replace('\n', " "))
                        .collect();
                    format!("| {} |", cells.join(" | "))
                })
                .collect();
            Some(format!("{}\n", rows.join("\n")))
        }
        "rule" => Some("---\n".to_string()),
        "mediaSingle" | "mediaGroup" => Some(render_children(node, depth)),
        "media" => {
            let url = attr(node, "url").and_then(|u| u.as_str())?;
            let alt = attr(node, "alt").and_then(|a| a.as_str()).unwrap_or("");
            Some(format!("![{alt}]({url})\n"))
        }
        "text" => node
            .get("text")
            .and_then(|t| t.as_str())
            .map(|text| text.to_string()),
        "hardBreak" => Some("\n".to_string()),
        "mention" => attr(node, "text")
            .and_then(|t| t.as_str())
            .map(|text| text.to_string()),
        _ => {
            let text = render_children(node, depth);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
    }
}
