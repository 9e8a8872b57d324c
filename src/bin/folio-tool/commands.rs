use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::{fs, io};

use anyhow::{Context, Result};
use serde::Serialize;
use spdlog::{debug, Logger};

use folio::config::Config;
use folio::content::{clean_filename, content_statistics, extract_metadata, generate_slug, slugify};
use folio::content::{ContentMetadata, ContentProcessor, ContentStatistics, TocEntry};

use crate::{InspectArgs, ProcessArgs, SlugArgs};

#[derive(Serialize, Debug)]
struct Inspection {
    metadata: ContentMetadata,
    statistics: ContentStatistics,
    table_of_contents: Vec<TocEntry>,
}

fn read_input(input: &Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Could not read content from {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content).context("Could not read content from stdin")?;
            Ok(content)
        }
    }
}

fn inspect(content: &str, processor: &ContentProcessor) -> Inspection {
    Inspection {
        metadata: extract_metadata(content),
        statistics: content_statistics(content),
        table_of_contents: processor.table_of_contents(content),
    }
}

pub fn process_cmd(args: ProcessArgs, config: &Config, logger: Arc<Logger>) -> Result<()> {
    let content = read_input(&args.input)?;
    debug!(logger: logger, "Rendering {} bytes as {}", content.len(), args.format);

    let processor = ContentProcessor::new(&config.content, logger);
    println!("{}", processor.render(Some(&content), args.format.into()));
    Ok(())
}

pub fn inspect_cmd(args: InspectArgs, config: &Config, logger: Arc<Logger>) -> Result<()> {
    let content = read_input(&args.input)?;
    let processor = ContentProcessor::new(&config.content, logger);

    let report = inspect(&content, &processor);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn slug_cmd(args: SlugArgs) {
    let text = args.text.join(" ");
    println!("heading: {}", generate_slug(&text));
    println!("post:    {}", slugify(&text));
    println!("file:    {}", clean_filename(&text));
}
