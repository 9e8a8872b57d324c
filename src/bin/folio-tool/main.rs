use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand, ValueEnum};

use folio::content::OutputFormat;
use folio::logger::build_logger;

use crate::commands::{inspect_cmd, process_cmd, slug_cmd};
use crate::config::open_config;

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file. If empty, folio.toml is searched next to the
    /// executable, in the current directory and in the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Processes editor HTML and prints the result
    Process(ProcessArgs),
    /// Prints metadata, statistics and table of contents as JSON
    Inspect(InspectArgs),
    /// Prints the slugs generated for a text
    Slug(SlugArgs),
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Content file. If empty, content is read from stdin
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value_t = Format::Html)]
    format: Format,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Content file. If empty, content is read from stdin
    input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SlugArgs {
    /// Heading or post title
    #[arg(required = true)]
    text: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Frontend ready HTML
    Html,
    /// Markdown with heading anchors
    Markdown,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Html => write!(f, "html"),
            Format::Markdown => write!(f, "markdown"),
        }
    }
}

impl From<Format> for OutputFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Html => OutputFormat::Html,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = open_config(cli.config)?;
    let logger = build_logger(config.log.as_ref())
        .map_err(|e| anyhow!("Could not create logger: {}", e))?;

    match cli.command {
        Command::Process(args) => process_cmd(args, &config, logger),
        Command::Inspect(args) => inspect_cmd(args, &config, logger),
        Command::Slug(args) => {
            slug_cmd(args);
            Ok(())
        }
    }
}
