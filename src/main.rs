//! mdimg - build-time image resolution for markdown trees.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use mdimg::cli::{self, Cli};
use mdimg::{log, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    if let Err(err) = runtime.block_on(cli::run(&cli)) {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
