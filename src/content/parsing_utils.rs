use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref ENTITY_REGEX: Regex = Regex::new(r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap();
    // Only double quoted attributes are understood, the editor never emits anything else
    static ref ATTR_REGEX: Regex = Regex::new(r#"\s*([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).unwrap();
    static ref PRE_BLOCK_REGEX: Regex = Regex::new(r"(?s)<pre(?:\s[^>]*)?>.*?</pre>").unwrap();
}

/// Removes every tag, gluing the surrounding text together.
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").to_string()
}

/// Replaces every tag with a space so text from adjacent elements does not merge.
pub fn strip_tags_spaced(html: &str) -> String {
    TAG_REGEX.replace_all(html, " ").to_string()
}

/// Escapes `& < > " '`. Character references already in the text are left
/// alone, so escaping twice gives the same result as escaping once.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (idx, c) in text.char_indices() {
        match c {
            '&' if ENTITY_REGEX.is_match(&text[idx..]) => escaped.push('&'),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Value of a double quoted attribute inside the attribute section of a tag.
pub fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_REGEX.captures_iter(attrs)
        .find(|cap| cap[1].eq_ignore_ascii_case(name))
        .and_then(|cap| cap.get(2))
        .map(|m| m.as_str())
}

pub fn remove_attrs(attrs: &str, names: &[&str]) -> String {
    ATTR_REGEX.replace_all(attrs, |cap: &Captures| {
        if names.iter().any(|name| cap[1].eq_ignore_ascii_case(name)) {
            "".to_string()
        } else {
            cap[0].to_string()
        }
    }).to_string()
}

/// Adds `classes` to the class attribute, keeping the classes already there
/// and never repeating one. Classes listed in `drop` are removed first.
/// The class attribute always ends up last.
pub fn merge_class_attr(attrs: &str, classes: &[&str], drop: &[&str]) -> String {
    let rest = remove_attrs(attrs, &["class"]);
    format!(r#"{} class="{}""#, rest.trim_end(), merged_classes(attrs, classes, drop))
}

/// The class list `merge_class_attr` would write, without the attribute around it.
pub fn merged_classes(attrs: &str, classes: &[&str], drop: &[&str]) -> String {
    let mut merged: Vec<&str> = vec![];
    let existing = attr_value(attrs, "class").unwrap_or("");
    for class in existing.split_whitespace().chain(classes.iter().copied()) {
        if !drop.contains(&class) && !merged.contains(&class) {
            merged.push(class);
        }
    }
    merged.join(" ")
}

/// Applies `f` to every part of `html` outside `<pre>` blocks, copying the
/// blocks themselves untouched.
pub fn replace_outside_pre<F>(html: &str, mut f: F) -> String
    where F: FnMut(&str) -> String
{
    let mut res = String::with_capacity(html.len());
    let mut last = 0;
    for block in PRE_BLOCK_REGEX.find_iter(html) {
        res.push_str(&f(&html[last..block.start()]));
        res.push_str(block.as_str());
        last = block.end();
    }
    res.push_str(&f(&html[last..]));
    res
}
