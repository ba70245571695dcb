//! Convert Markdown to one of Jira's markup flavours

use std::path::PathBuf;

use jirafmt_core::adf::Node;
use jirafmt_core::markdown::{to_structured_document, to_wiki_markup};

use crate::input::read_input;
use crate::prelude::{println, *};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    /// Jira wiki markup (REST API v2)
    #[default]
    Wiki,
    /// Atlassian Document Format JSON (REST API v3)
    Adf,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// Markdown file to convert (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, short, env = "JIRAFMT_TARGET", default_value = "wiki")]
    pub to: Target,

    /// Indent ADF output
    #[arg(long)]
    pub pretty: bool,
}

/// Convert a Markdown document to the requested target
///
/// # Arguments
/// * `markdown` - Source document
/// * `target` - Output format
/// * `pretty` - Indent the JSON when the target is ADF
///
/// # Returns
/// * `Result<String>` - Wiki markup, or the ADF document as JSON
pub fn convert_data(markdown: &str, target: Target, pretty: bool) -> Result<String> {
    match target {
        Target::Wiki => Ok(to_wiki_markup(markdown)),
        Target::Adf => {
            let document = to_structured_document(markdown);
            log::debug!(
                "Top-level ADF nodes: {}",
                document
                    .content
                    .iter()
                    .map(Node::type_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            to_json(&document, pretty)
        }
    }
}

pub fn handler(options: ConvertOptions) -> Result<()> {
    let markdown = read_input(options.file.as_deref())?;
    log::debug!(
        "Converting {} bytes of Markdown to {:?}",
        markdown.len(),
        options.to
    );

    let output = convert_data(&markdown, options.to, options.pretty)?;
    println!("{output}");

    Ok(())
}
