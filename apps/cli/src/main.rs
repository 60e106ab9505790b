//! ctdocs CLI — tables of contents and reading metadata for documentation
//! articles.
//!
//! Reads article HTML from disk, generates anchored headings and sidebar
//! navigation, and caches results per article id.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
