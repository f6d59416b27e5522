//! togglenote server — HTTP relay from quick notes to Notion toggle lists.
//!
//! Accepts `POST /add-to-toggle`, acknowledges immediately, and appends the
//! note's sentences to the named toggle in the background.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
