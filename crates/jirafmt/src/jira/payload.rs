//! Request bodies for the Jira REST API

use std::path::PathBuf;

use clap::Args;
use jirafmt_core::atlassian::jira::{
    build_issue_payload, format_comment, format_description, format_plain_text, ApiVersion,
    IssueDraft,
};
use serde_json::{json, Value};

use crate::input::read_input;
use crate::prelude::{println, *};

#[derive(Debug, clap::Subcommand)]
pub enum PayloadCommands {
    /// Issue description value (`fields.description`)
    #[clap(name = "description")]
    Description(BodyOptions),

    /// Comment request body (`{"body": ...}`)
    #[clap(name = "comment")]
    Comment(BodyOptions),

    /// Create-issue request body (`{"fields": ...}`)
    #[clap(name = "issue")]
    Issue(IssueOptions),
}

#[derive(Args, Debug, Clone)]
pub struct BodyOptions {
    /// Markdown file (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Jira REST API version: 2 emits wiki markup, 3 emits ADF
    #[arg(long, env = "JIRA_API_VERSION", default_value = "3")]
    pub api_version: ApiVersion,

    /// Embed the input as plain text instead of converting Markdown
    #[arg(long)]
    pub plain: bool,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IssueOptions {
    /// Summary/title of the ticket
    #[arg(long)]
    pub summary: String,

    /// Project key
    #[arg(long, env = "JIRA_PROJECT")]
    pub project: String,

    /// Issue type (defaults to Task)
    #[arg(long, default_value = "Task")]
    pub issue_type: String,

    /// Markdown file holding the description (`-` reads stdin)
    #[arg(long)]
    pub description: Option<PathBuf>,

    /// Jira REST API version: 2 emits wiki markup, 3 emits ADF
    #[arg(long, env = "JIRA_API_VERSION", default_value = "3")]
    pub api_version: ApiVersion,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Description,
    Comment,
}

/// Build a description value or comment body from the input text
pub fn body_data(kind: BodyKind, options: &BodyOptions, text: &str) -> Value {
    let version = options.api_version;
    match (kind, options.plain) {
        (BodyKind::Description, false) => format_description(version, text),
        (BodyKind::Description, true) => format_plain_text(version, text),
        (BodyKind::Comment, false) => format_comment(version, text),
        (BodyKind::Comment, true) => json!({ "body": format_plain_text(version, text) }),
    }
}

/// Build the issue body from already-read options and description
pub fn issue_data(options: &IssueOptions, description: Option<String>) -> Value {
    let draft = IssueDraft {
        project: options.project.clone(),
        issue_type: options.issue_type.clone(),
        summary: options.summary.clone(),
        description,
    };

    build_issue_payload(options.api_version, &draft)
}

pub fn handler(cmd: PayloadCommands) -> Result<()> {
    let (value, pretty) = match cmd {
        PayloadCommands::Description(options) => body(BodyKind::Description, &options)?,
        PayloadCommands::Comment(options) => body(BodyKind::Comment, &options)?,
        PayloadCommands::Issue(options) => {
            let description = options
                .description
                .as_deref()
                .map(|path| read_input(Some(path)))
                .transpose()?;
            log::debug!(
                "Building {} issue in {} for API v{}",
                options.issue_type,
                options.project,
                options.api_version
            );
            (issue_data(&options, description), options.pretty)
        }
    };

    println!("{}", to_json(&value, pretty)?);

    Ok(())
}

fn body(kind: BodyKind, options: &BodyOptions) -> Result<(Value, bool)> {
    let text = read_input(options.file.as_deref())?;
    log::debug!(
        "Formatting {:?} for API v{} (plain: {})",
        kind,
        options.api_version,
        options.plain
    );

    Ok((body_data(kind, options, &text), options.pretty))
}
