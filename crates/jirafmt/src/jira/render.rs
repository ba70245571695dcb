//! Readable text from ADF documents and request bodies

use std::path::PathBuf;

use jirafmt_core::adf::extract_description;
use jirafmt_core::atlassian::jira::is_adf_document;
use serde_json::Value;

use crate::input::read_input;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct RenderOptions {
    /// JSON file: an ADF document, a comment body or an issue body (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,
}

/// Find the document inside a JSON value
///
/// Accepts a bare ADF document or string, `{"body": ...}` comment bodies, and
/// `{"fields": {"description": ...}}` issue bodies.
fn locate_document(value: Value) -> Option<Value> {
    if is_adf_document(&value) || value.is_string() {
        return Some(value);
    }

    let mut value = value;
    if let Some(body) = value.get_mut("body") {
        return Some(body.take());
    }
    value
        .get_mut("fields")
        .and_then(|fields| fields.get_mut("description"))
        .map(Value::take)
}

/// Render JSON input to readable text
///
/// # Arguments
/// * `input` - Raw JSON text
///
/// # Returns
/// * `Result<String>` - The rendered text, empty when the document has no text
pub fn render_data(input: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| Error::InvalidJson(e.to_string()))?;
    let document = locate_document(value).ok_or(Error::NoDocument)?;
    log::debug!("Rendering {} document", document_kind(&document));

    Ok(extract_description(Some(document)).unwrap_or_default())
}

fn document_kind(value: &Value) -> &'static str {
    if value.is_string() {
        "string"
    } else {
        "ADF"
    }
}

pub fn handler(options: RenderOptions) -> Result<()> {
    let input = read_input(options.file.as_deref())?;
    println!("{}", render_data(&input)?);

    Ok(())
}
