use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::parsing_utils::strip_tags;

lazy_static! {
    static ref TOC_HEADING_REGEX: Regex = Regex::new(r#"(?s)<h([1-6])[^>]*?\sid="([^"]*)"[^>]*>(.*?)</h[1-6]>"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub title: String,
}

/// Outline of a processed document. Headings need the `id` added by the
/// heading stage, so raw editor content gives an empty list.
pub fn generate_toc(processed: &str) -> Vec<TocEntry> {
    TOC_HEADING_REGEX.captures_iter(processed)
        .filter_map(|cap| {
            let level = cap[1].parse::<u8>().ok()?;
            let title = strip_tags(&cap[3]).trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(TocEntry {
                level,
                id: cap[2].to_string(),
                title,
            })
        })
        .collect()
}
