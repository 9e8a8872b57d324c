use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::content::parsing_utils::{strip_tags, strip_tags_spaced};

pub const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    // Tag matching, not parsing: nested or broken markup can be miscounted
    static ref IMG_TAG_REGEX: Regex = Regex::new(r"<img(?:[\s/][^>]*)?>").unwrap();
    static ref LINK_TAG_REGEX: Regex = Regex::new(r"<a(?:\s[^>]*)?>").unwrap();
    static ref HEADING_TAG_REGEX: Regex = Regex::new(r"<h[1-6](?:\s[^>]*)?>").unwrap();
    static ref PARAGRAPH_TAG_REGEX: Regex = Regex::new(r"<p(?:\s[^>]*)?>").unwrap();
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentMetadata {
    pub word_count: usize,
    /// Minutes
    pub reading_time: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub heading_count: usize,
}

/// Numbers shown next to the editor while a post is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentStatistics {
    pub word_count: usize,
    pub character_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub image_count: usize,
    pub link_count: usize,
}

/// Words of the visible text. Tags count as separators.
pub fn word_count(content: &str) -> usize {
    strip_tags_spaced(content).split_whitespace().count()
}

pub fn extract_metadata(content: &str) -> ContentMetadata {
    if content.is_empty() {
        return ContentMetadata::default();
    }

    let word_count = word_count(content);

    ContentMetadata {
        word_count,
        reading_time: (word_count / WORDS_PER_MINUTE).max(1),
        image_count: IMG_TAG_REGEX.find_iter(content).count(),
        link_count: LINK_TAG_REGEX.find_iter(content).count(),
        heading_count: HEADING_TAG_REGEX.find_iter(content).count(),
    }
}

pub fn content_statistics(content: &str) -> ContentStatistics {
    if content.is_empty() {
        return ContentStatistics::default();
    }

    ContentStatistics {
        word_count: word_count(content),
        character_count: strip_tags(content).chars().count(),
        paragraph_count: PARAGRAPH_TAG_REGEX.find_iter(content).count(),
        heading_count: HEADING_TAG_REGEX.find_iter(content).count(),
        image_count: IMG_TAG_REGEX.find_iter(content).count(),
        link_count: LINK_TAG_REGEX.find_iter(content).count(),
    }
}
