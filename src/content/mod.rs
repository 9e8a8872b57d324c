use serde::{Deserialize, Serialize};

pub mod link_policy;
pub mod markdown;
pub mod metadata;
pub mod parsing_utils;
pub mod processor;
pub mod slug;
pub mod stage;
pub mod toc;
pub mod transforms;

pub use metadata::{content_statistics, extract_metadata, ContentMetadata, ContentStatistics};
pub use processor::ContentProcessor;
pub use slug::{clean_filename, generate_slug, slugify};
pub use toc::{generate_toc, TocEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
}

/// Anything but `markdown` is served as HTML.
impl From<&str> for OutputFormat {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("markdown") {
            OutputFormat::Markdown
        } else {
            OutputFormat::Html
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from("markdown"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from("Markdown"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from("html"), OutputFormat::Html);
        assert_eq!(OutputFormat::from("pdf"), OutputFormat::Html);
        assert_eq!(OutputFormat::from(""), OutputFormat::Html);
        assert_eq!(OutputFormat::default(), OutputFormat::Html);
    }
}
