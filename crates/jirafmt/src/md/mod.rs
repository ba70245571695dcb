pub mod convert;
pub mod inspect;

use crate::prelude::{eprintln, *};

#[derive(Debug, clap::Parser)]
#[command(name = "md")]
#[command(about = "Convert and inspect Markdown documents")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Convert Markdown to Jira wiki markup or an ADF document
    #[clap(name = "convert")]
    Convert(convert::ConvertOptions),

    /// Show how each Markdown line is classified
    #[clap(name = "inspect")]
    Inspect(inspect::InspectOptions),
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Running md command...");
    }

    match app.command {
        Commands::Convert(options) => convert::handler(options),
        Commands::Inspect(options) => inspect::handler(options),
    }
}
