use crate::prelude::*;
use clap::Parser;

mod error;
mod input;
mod jira;
mod md;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert Markdown to Jira wiki markup and Atlassian Document Format"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "JIRAFMT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert and inspect Markdown documents
    MD(crate::md::App),

    /// Build Jira REST request bodies and read ADF documents
    Jira(crate::jira::App),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::MD(sub_app) => crate::md::run(sub_app, app.global),
        SubCommands::Jira(sub_app) => crate::jira::run(sub_app, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
