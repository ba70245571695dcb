pub mod payload;
pub mod render;

use crate::prelude::{eprintln, *};

/// Jira module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "jira")]
#[command(about = "Build Jira REST request bodies and read ADF documents")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

/// Jira commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print a request body with the description converted for an API version
    #[command(subcommand)]
    Payload(payload::PayloadCommands),

    /// Render an ADF document as readable text
    #[clap(name = "render")]
    Render(render::RenderOptions),
}

/// Run Jira commands
pub fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Running Jira command...");
    }

    match app.command {
        Commands::Payload(cmd) => payload::handler(cmd),
        Commands::Render(options) => render::handler(options),
    }
}
