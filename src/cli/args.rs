//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve, measure and rewrite the images of a markdown tree
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "mdimg.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite the images of an mdast JSON tree and print the result
    #[command(visible_alias = "t")]
    Transform {
        #[command(flatten)]
        doc: DocArgs,

        /// Output file (default: stdout, `-` also means stdout)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Verify every image of an mdast JSON tree without writing anything
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        doc: DocArgs,
    },
}

/// Arguments describing one document and where its images live.
#[derive(clap::Args, Debug, Clone)]
pub struct DocArgs {
    /// mdast tree as JSON. Use `-` to read from stdin.
    #[arg(value_name = "TREE", value_hint = clap::ValueHint::FilePath)]
    pub tree: PathBuf,

    /// Markdown file the tree was parsed from (relative images resolve next to it)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Project root, overrides `site_dir` from the config file
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub site_dir: Option<PathBuf>,

    /// Static asset directory (repeatable, checked in order), overrides `static_dirs`
    #[arg(long = "static-dir", value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub static_dirs: Vec<PathBuf>,

    /// Do not warn about images whose dimensions cannot be read
    #[arg(long)]
    pub no_probe_warnings: bool,
}

impl Cli {
    /// Document arguments of the active subcommand.
    pub fn doc_args(&self) -> &DocArgs {
        match &self.command {
            Commands::Transform { doc, .. } | Commands::Check { doc } => doc,
        }
    }
}
