use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::metadata::{extract_metadata, word_count, ContentMetadata, WORDS_PER_MINUTE};
use crate::content::slug::slugify;
use crate::content::toc::{generate_toc, TocEntry};
use crate::content::{ContentProcessor, OutputFormat};
use crate::drafts::{AutoSave, DraftVersion};

pub const META_DESCRIPTION_MAX: usize = 160;
pub const DEFAULT_READ_TIME: usize = 5;
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

const MIN_TITLE_LEN: usize = 5;
const MIN_DESCRIPTION_LEN: usize = 50;
const MIN_CONTENT_LEN: usize = 100;
const MIN_WORDS: usize = 50;

lazy_static! {
    static ref MARKDOWN_PUNCTUATION_REGEX: Regex = Regex::new(r"[#*`\[\]()]").unwrap();
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        PostId(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Raw editor HTML
    pub content: String,
    pub meta_description: String,
    pub author_name: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Minutes
    pub read_time: usize,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for BlogPost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, published={}\ntitle={}",
               self.id,
               self.slug,
               self.is_published,
               self.title
        )
    }
}

fn truncate_chars(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

impl BlogPost {
    pub fn new(title: &str, description: &str, content: &str, now: DateTime<Utc>) -> Self {
        BlogPost {
            id: PostId::new(),
            title: title.to_string(),
            slug: String::new(),
            description: description.to_string(),
            content: content.to_string(),
            meta_description: String::new(),
            author_name: String::new(),
            is_published: false,
            published_at: None,
            read_time: DEFAULT_READ_TIME,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fields derived every time the post is stored.
    pub fn prepare_for_save(&mut self, now: DateTime<Utc>) {
        if self.slug.is_empty() {
            self.slug = slugify(&self.title);
        }

        if self.meta_description.is_empty() && !self.description.is_empty() {
            self.meta_description = self.description.chars().take(META_DESCRIPTION_MAX).collect();
        }

        if !self.is_published {
            self.published_at = None;
        } else if self.published_at.is_none() {
            self.published_at = Some(now);
        }

        if !self.content.is_empty() {
            self.read_time = word_count(&self.content).div_ceil(WORDS_PER_MINUTE).max(1);
        }

        self.updated_at = now;
    }

    /// Checks run before a post goes live. `slug_taken` tells whether another
    /// post already uses a slug. Every failed check is reported.
    pub fn validate_for_publishing<F>(&self, slug_taken: F) -> Result<(), Vec<String>>
        where F: FnOnce(&str) -> bool
    {
        let mut errors = vec![];

        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            errors.push(format!("Title must be at least {} characters long", MIN_TITLE_LEN));
        }

        if self.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            errors.push(format!("Description must be at least {} characters long", MIN_DESCRIPTION_LEN));
        }

        if self.content.trim().chars().count() < MIN_CONTENT_LEN {
            errors.push(format!("Content must be at least {} characters long", MIN_CONTENT_LEN));
        }

        if self.meta_description.chars().count() > META_DESCRIPTION_MAX {
            errors.push(format!("Meta description should not exceed {} characters", META_DESCRIPTION_MAX));
        }

        if !self.content.is_empty() && word_count(&self.content) < MIN_WORDS {
            errors.push(format!("Content should have at least {} words", MIN_WORDS));
        }

        if !self.slug.is_empty() && slug_taken(&self.slug) {
            errors.push(format!("Slug '{}' is already in use", self.slug));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn excerpt(&self, length: usize) -> String {
        if !self.description.is_empty() {
            return truncate_chars(&self.description, length);
        }
        let clean = MARKDOWN_PUNCTUATION_REGEX.replace_all(&self.content, "");
        truncate_chars(&clean, length)
    }

    /// Copies the draft text back into the post. Nothing is saved.
    pub fn restore_from_draft(&mut self, draft: &DraftVersion) {
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.content = draft.content.clone();
    }

    pub fn has_unsaved_changes(&self, autosave: Option<&AutoSave>) -> bool {
        match autosave {
            None => false,
            Some(save) => save.content != self.content
                || save.title != self.title
                || save.description != self.description,
        }
    }
}

/// Post as served by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    pub excerpt: String,
    pub processed_content: String,
    pub table_of_contents: Vec<TocEntry>,
    pub content_metadata: ContentMetadata,
    pub content_format: OutputFormat,
}

impl PostDetail {
    pub fn build(post: &BlogPost, processor: &ContentProcessor, format: OutputFormat) -> Self {
        let html = processor.process(&post.content);
        let processed_content = match format {
            OutputFormat::Html => html.clone(),
            OutputFormat::Markdown => processor.to_markdown(&post.content),
        };

        PostDetail {
            post: post.clone(),
            excerpt: post.excerpt(DEFAULT_EXCERPT_LENGTH),
            processed_content,
            table_of_contents: generate_toc(&html),
            content_metadata: extract_metadata(&post.content),
            content_format: format,
        }
    }
}
