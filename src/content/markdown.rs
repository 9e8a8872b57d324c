use anyhow::Result;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::content::parsing_utils::{attr_value, unescape_html};
use crate::content::stage::Stage;

lazy_static! {
    static ref HEADING_REGEX: Regex = Regex::new(r"(?s)<h([1-6])((?:\s[^>]*)?)>(.*?)</h[1-6]>").unwrap();
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(r#"(?s)<pre><code class="language-([^"]*)">(.*?)</code></pre>"#).unwrap();
    static ref INLINE_CODE_REGEX: Regex = Regex::new(r"<code(?:\s[^>]*)?>(.*?)</code>").unwrap();
    static ref STRONG_REGEX: Regex = Regex::new(r"(?s)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)>").unwrap();
    static ref EM_REGEX: Regex = Regex::new(r"(?s)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)>").unwrap();
    static ref LINK_REGEX: Regex = Regex::new(r"(?s)<a((?:\s[^>]*)?)>(.*?)</a>").unwrap();
    static ref IMG_REGEX: Regex = Regex::new(r"<img((?:\s[^>]*)?)>").unwrap();
    static ref LIST_REGEX: Regex = Regex::new(r"(?s)<(ul|ol)(?:\s[^>]*)?>(.*?)</(?:ul|ol)>").unwrap();
    static ref LIST_ITEM_REGEX: Regex = Regex::new(r"(?s)<li(?:\s[^>]*)?>(.*?)</li>").unwrap();
    static ref BLOCKQUOTE_REGEX: Regex = Regex::new(r"(?s)<blockquote(?:\s[^>]*)?>(.*?)</blockquote>").unwrap();
    static ref PARAGRAPH_REGEX: Regex = Regex::new(r"(?s)<p(?:\s[^>]*)?>(.*?)</p>").unwrap();
    static ref PARAGRAPH_TAG_REGEX: Regex = Regex::new(r"</?p(?:\s[^>]*)?>").unwrap();
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"<br(?:\s[^>]*)?/?>").unwrap();
    static ref CODE_SPAN_REGEX: Regex = Regex::new(r"(?s)```[^\n]*\n.*?\n```|`[^`\n]+`").unwrap();
    static ref BLANK_LINES_REGEX: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Rewrites applied to already processed HTML, in order. Code is turned into
/// fences first so the tag rewrites never see its content.
pub fn markdown_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(Headings),
        Box::new(Code),
        Box::new(Emphasis),
        Box::new(Links),
        Box::new(Images),
        Box::new(Lists),
        Box::new(Blockquotes),
        Box::new(Paragraphs),
        Box::new(Finish),
    ]
}

fn block(text: &str) -> String {
    format!("\n\n{}\n\n", text)
}

pub struct Headings;

impl Stage for Headings {
    fn name(&self) -> &str {
        "md_headings"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = HEADING_REGEX.replace_all(content, |cap: &Captures| {
            let level: usize = cap[1].parse().unwrap_or(1);
            let text = cap[3].trim();
            let heading = match attr_value(&cap[2], "id").filter(|id| !id.is_empty()) {
                Some(id) => format!("{} {} {{#{}}}", "#".repeat(level), text, id),
                None => format!("{} {}", "#".repeat(level), text),
            };
            block(&heading)
        });
        Ok(res.to_string())
    }
}

/// Fenced blocks and inline spans. Bodies stay escaped until `Finish`.
pub struct Code;

impl Stage for Code {
    fn name(&self) -> &str {
        "md_code"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = CODE_BLOCK_REGEX.replace_all(content, |cap: &Captures| {
            block(&format!("```{}\n{}\n```", &cap[1], cap[2].trim_matches('\n')))
        });
        let res = INLINE_CODE_REGEX.replace_all(&res, "`${1}`");
        Ok(res.to_string())
    }
}

pub struct Emphasis;

impl Stage for Emphasis {
    fn name(&self) -> &str {
        "md_emphasis"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = STRONG_REGEX.replace_all(content, "**${1}**");
        let res = EM_REGEX.replace_all(&res, "*${1}*");
        Ok(res.to_string())
    }
}

pub struct Links;

impl Stage for Links {
    fn name(&self) -> &str {
        "md_links"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = LINK_REGEX.replace_all(content, |cap: &Captures| {
            match attr_value(&cap[1], "href") {
                Some(href) => format!("[{}]({})", &cap[2], href),
                None => cap[2].to_string(),
            }
        });
        Ok(res.to_string())
    }
}

pub struct Images;

impl Stage for Images {
    fn name(&self) -> &str {
        "md_images"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = IMG_REGEX.replace_all(content, |cap: &Captures| {
            let attrs = &cap[1];
            let src = attr_value(attrs, "src").unwrap_or("");
            let alt = attr_value(attrs, "alt").unwrap_or("");
            format!("![{}]({})", alt, src)
        });
        Ok(res.to_string())
    }
}

/// Nested lists are flattened into their parent item.
pub struct Lists;

impl Stage for Lists {
    fn name(&self) -> &str {
        "md_lists"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = LIST_REGEX.replace_all(content, |cap: &Captures| {
            let ordered = &cap[1] == "ol";
            let items: Vec<String> = LIST_ITEM_REGEX.captures_iter(&cap[2])
                .enumerate()
                .map(|(idx, item)| {
                    let text = PARAGRAPH_TAG_REGEX.replace_all(&item[1], " ");
                    let text = text.trim();
                    if ordered {
                        format!("{}. {}", idx + 1, text)
                    } else {
                        format!("- {}", text)
                    }
                })
                .collect();
            block(&items.join("\n"))
        });
        Ok(res.to_string())
    }
}

pub struct Blockquotes;

impl Stage for Blockquotes {
    fn name(&self) -> &str {
        "md_blockquotes"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = BLOCKQUOTE_REGEX.replace_all(content, |cap: &Captures| {
            let inner = PARAGRAPH_REGEX.replace_all(&cap[1], "${1}\n");
            let lines: Vec<String> = inner.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("> {}", line))
                .collect();
            block(&lines.join("\n"))
        });
        Ok(res.to_string())
    }
}

pub struct Paragraphs;

impl Stage for Paragraphs {
    fn name(&self) -> &str {
        "md_paragraphs"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = PARAGRAPH_REGEX.replace_all(content, "\n\n${1}\n\n");
        let res = LINE_BREAK_REGEX.replace_all(&res, "\n");
        Ok(res.to_string())
    }
}

/// Decodes code bodies and collapses blank line runs outside fenced blocks.
pub struct Finish;

impl Stage for Finish {
    fn name(&self) -> &str {
        "md_finish"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let mut res = String::with_capacity(content.len());
        let mut last = 0;
        for code in CODE_SPAN_REGEX.find_iter(content) {
            res.push_str(&BLANK_LINES_REGEX.replace_all(&content[last..code.start()], "\n\n"));
            res.push_str(&unescape_html(code.as_str()));
            last = code.end();
        }
        res.push_str(&BLANK_LINES_REGEX.replace_all(&content[last..], "\n\n"));
        Ok(res)
    }
}
