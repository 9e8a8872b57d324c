use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use spdlog::{debug, error, Logger};

use crate::config::ContentSettings;
use crate::content::markdown::markdown_stages;
use crate::content::stage::Stage;
use crate::content::toc::{generate_toc, TocEntry};
use crate::content::transforms::default_stages;
use crate::content::OutputFormat;

/// Turns editor HTML into the markup served to the frontend.
///
/// Every stage runs guarded: when one fails or panics the failure is logged
/// and the content it was given goes on to the next stage unchanged, so
/// callers always get a result.
pub struct ContentProcessor {
    stages: Vec<Box<dyn Stage>>,
    markdown_stages: Vec<Box<dyn Stage>>,
    logger: Arc<Logger>,
}

impl ContentProcessor {
    pub fn new(settings: &ContentSettings, logger: Arc<Logger>) -> Self {
        Self::with_stages(default_stages(settings), logger)
    }

    pub fn with_stages(stages: Vec<Box<dyn Stage>>, logger: Arc<Logger>) -> Self {
        Self {
            stages,
            markdown_stages: markdown_stages(),
            logger,
        }
    }

    pub fn process(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }
        self.run(&self.stages, content)
    }

    pub fn to_markdown(&self, content: &str) -> String {
        let html = self.process(content);
        if html.is_empty() {
            return html;
        }
        self.run(&self.markdown_stages, &html).trim().to_string()
    }

    pub fn render(&self, content: Option<&str>, format: OutputFormat) -> String {
        let content = content.unwrap_or_default();
        match format {
            OutputFormat::Html => self.process(content),
            OutputFormat::Markdown => self.to_markdown(content),
        }
    }

    /// Table of contents of raw editor content.
    pub fn table_of_contents(&self, content: &str) -> Vec<TocEntry> {
        generate_toc(&self.process(content))
    }

    fn run(&self, stages: &[Box<dyn Stage>], content: &str) -> String {
        let mut current = content.to_string();
        for stage in stages {
            match catch_unwind(AssertUnwindSafe(|| stage.apply(&current))) {
                Ok(Ok(next)) => current = next,
                Ok(Err(e)) => {
                    error!(logger: self.logger, "Error in content stage {}: {:#}", stage.name(), e);
                }
                Err(panic) => {
                    error!(logger: self.logger, "Content stage {} panicked: {}", stage.name(), panic_message(&*panic));
                }
            }
        }
        debug!(logger: self.logger, "Processed {} bytes of content into {} bytes", content.len(), current.len());
        current
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
