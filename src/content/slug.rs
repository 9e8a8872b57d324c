use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::content::parsing_utils::{strip_tags, unescape_html};

lazy_static! {
    static ref NON_SLUG_REGEX: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATOR_REGEX: Regex = Regex::new(r"[-\s]+").unwrap();
    static ref UNSAFE_FILENAME_REGEX: Regex = Regex::new(r"[^\w\-.]").unwrap();
    static ref UNDERSCORES_REGEX: Regex = Regex::new(r"_+").unwrap();
}

/// Anchor id for a heading. Unicode letters are kept as they are.
/// Character references are decoded first, so escaped and unescaped
/// text give the same id.
pub fn generate_slug(text: &str) -> String {
    let text = unescape_html(&strip_tags(text)).to_lowercase();
    let slug = NON_SLUG_REGEX.replace_all(&text, "");
    let slug = SEPARATOR_REGEX.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Post slug from a title: ASCII only, so it can live in a URL path.
pub fn slugify(title: &str) -> String {
    let ascii = unidecode::unidecode(title).to_lowercase();
    let slug = NON_SLUG_REGEX.replace_all(&ascii, "");
    let slug = SEPARATOR_REGEX.replace_all(slug.trim(), "-");
    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

/// Safe storage name for an uploaded file.
pub fn clean_filename(file_name: &str) -> String {
    let (name, ext) = split_extension(file_name);

    let clean_name = UNSAFE_FILENAME_REGEX.replace_all(name, "_");
    let clean_name = UNDERSCORES_REGEX.replace_all(&clean_name, "_");
    let clean_name = clean_name.trim_matches('_');

    let clean_name = if clean_name.is_empty() {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    } else {
        clean_name.to_string()
    };

    format!("{}{}", clean_name, ext.to_lowercase())
}
