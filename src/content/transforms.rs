use std::collections::HashSet;

use anyhow::Result;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::ContentSettings;
use crate::content::link_policy::LinkPolicy;
use crate::content::parsing_utils::{attr_value, escape_html, merge_class_attr, merged_classes, remove_attrs, replace_outside_pre};
use crate::content::slug::generate_slug;
use crate::content::stage::Stage;

lazy_static! {
    static ref HEADING_REGEX: Regex = Regex::new(r"(?s)<h([1-6])((?:\s[^>]*)?)>(.*?)</h[1-6]>").unwrap();
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(r"(?s)<pre(?:\s[^>]*)?>\s*<code((?:\s[^>]*)?)>(.*?)</code>\s*</pre>").unwrap();
    static ref LANGUAGE_REGEX: Regex = Regex::new(r"(?:^|\s)language-(\S+)").unwrap();
    static ref INLINE_CODE_REGEX: Regex = Regex::new(r"<code(?:\s[^>]*)?>(.*?)</code>").unwrap();
    static ref IMG_REGEX: Regex = Regex::new(r"<img((?:\s[^>]*)?)>").unwrap();
    static ref LINK_REGEX: Regex = Regex::new(r"(?s)<a(\s[^>]*)>(.*?)</a>").unwrap();
    static ref TABLE_REGEX: Regex = Regex::new(r#"(?s)(<div class="table-responsive">)?<table((?:\s[^>]*)?)>(.*?)</table>(</div>)?"#).unwrap();
    static ref UL_REGEX: Regex = Regex::new(r"<ul((?:\s[^>]*)?)>").unwrap();
    static ref OL_REGEX: Regex = Regex::new(r"<ol((?:\s[^>]*)?)>").unwrap();
    static ref BLOCKQUOTE_REGEX: Regex = Regex::new(r"<blockquote((?:\s[^>]*)?)>").unwrap();
    static ref COMMENT_REGEX: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref EMPTY_PARAGRAPH_REGEX: Regex = Regex::new(r"<p(?:\s[^>]*)?>\s*</p>").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
    static ref INTER_TAG_REGEX: Regex = Regex::new(r">\s+<").unwrap();
    static ref PRE_EDGE_REGEX: Regex = Regex::new(r"(>)\s+(<pre[\s>])|(</pre>)\s+(<)").unwrap();
}

pub const IMAGE_CLASSES: &str = "blog-image responsive-image";
pub const EXTERNAL_LINK_CLASS: &str = "external-link";
pub const INTERNAL_LINK_CLASS: &str = "internal-link";

/// The HTML stages in the order they must run. Later stages rely on the
/// shape produced by earlier ones (code is escaped before images and links
/// are rewritten, cleanup runs last).
pub fn default_stages(settings: &ContentSettings) -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(HeadingIds { dedupe: settings.dedupe_heading_ids }),
        Box::new(CodeBlocks),
        Box::new(Images),
        Box::new(Links { policy: LinkPolicy::new(&settings.own_domains) }),
        Box::new(Tables),
        Box::new(Lists),
        Box::new(Blockquotes),
        Box::new(Cleanup),
    ]
}

pub struct HeadingIds {
    pub dedupe: bool,
}

fn unique_id(slug: String, seen: &mut HashSet<String>) -> String {
    if slug.is_empty() || seen.insert(slug.clone()) {
        return slug;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", slug, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

impl Stage for HeadingIds {
    fn name(&self) -> &str {
        "headings"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let mut seen = HashSet::new();
        let res = HEADING_REGEX.replace_all(content, |cap: &Captures| {
            let level = &cap[1];
            let attrs = remove_attrs(&cap[2], &["id"]);
            let text = cap[3].trim();

            let id = generate_slug(text);
            let id = if self.dedupe { unique_id(id, &mut seen) } else { id };

            format!(r#"<h{}{} id="{}">{}</h{}>"#, level, attrs.trim_end(), id, text, level)
        });
        Ok(res.to_string())
    }
}

pub struct CodeBlocks;

impl Stage for CodeBlocks {
    fn name(&self) -> &str {
        "code_blocks"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let blocks = CODE_BLOCK_REGEX.replace_all(content, |cap: &Captures| {
            let language = attr_value(&cap[1], "class")
                .and_then(|class| LANGUAGE_REGEX.captures(class))
                .and_then(|lang| lang.get(1))
                .map_or("text", |m| m.as_str());

            format!(r#"<pre><code class="language-{}">{}</code></pre>"#, language, escape_html(&cap[2]))
        });

        let res = replace_outside_pre(&blocks, |part| {
            INLINE_CODE_REGEX.replace_all(part, |cap: &Captures| {
                format!(r#"<code class="inline-code">{}</code>"#, escape_html(&cap[1]))
            }).to_string()
        });

        Ok(res)
    }
}

pub struct Images;

impl Stage for Images {
    fn name(&self) -> &str {
        "images"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = IMG_REGEX.replace_all(content, |cap: &Captures| {
            let attrs = &cap[1];
            let Some(src) = attr_value(attrs, "src") else {
                return cap[0].to_string();
            };
            let alt = attr_value(attrs, "alt").unwrap_or("");

            let mut img = format!(r#"<img src="{}" alt="{}" class="{}" loading="lazy""#, src, alt, IMAGE_CLASSES);
            if let Some(title) = attr_value(attrs, "title").filter(|t| !t.is_empty()) {
                img.push_str(&format!(r#" title="{}""#, title));
            }
            img.push_str(" />");
            img
        });
        Ok(res.to_string())
    }
}

pub struct Links {
    pub policy: LinkPolicy,
}

impl Stage for Links {
    fn name(&self) -> &str {
        "links"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = LINK_REGEX.replace_all(content, |cap: &Captures| {
            let attrs = &cap[1];
            let Some(href) = attr_value(attrs, "href") else {
                return cap[0].to_string();
            };

            let external = self.policy.is_external(href);
            let (class, opposite) = if external {
                (EXTERNAL_LINK_CLASS, INTERNAL_LINK_CLASS)
            } else {
                (INTERNAL_LINK_CLASS, EXTERNAL_LINK_CLASS)
            };
            let classes = merged_classes(attrs, &[class], &[opposite]);
            let others = remove_attrs(attrs, &["href", "target", "rel", "class"]);

            let mut link = format!(r#"<a href="{}"{}"#, href, others.trim_end());
            if external {
                link.push_str(r#" target="_blank" rel="noopener noreferrer""#);
            }
            format!(r#"{} class="{}">{}</a>"#, link, classes, &cap[2])
        });
        Ok(res.to_string())
    }
}

pub struct Tables;

impl Stage for Tables {
    fn name(&self) -> &str {
        "tables"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = TABLE_REGEX.replace_all(content, |cap: &Captures| {
            let attrs = merge_class_attr(&cap[2], &["blog-table"], &[]);
            let table = format!("<table{}>{}</table>", attrs, &cap[3]);

            match (cap.get(1), cap.get(4)) {
                // Already wrapped by an earlier run
                (Some(_), Some(_)) => format!(r#"<div class="table-responsive">{}</div>"#, table),
                (open, close) => format!(r#"{}<div class="table-responsive">{}</div>{}"#,
                                         open.map_or("", |m| m.as_str()),
                                         table,
                                         close.map_or("", |m| m.as_str())),
            }
        });
        Ok(res.to_string())
    }
}

pub struct Lists;

impl Stage for Lists {
    fn name(&self) -> &str {
        "lists"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = UL_REGEX.replace_all(content, |cap: &Captures| {
            format!("<ul{}>", merge_class_attr(&cap[1], &["blog-list"], &[]))
        });
        let res = OL_REGEX.replace_all(&res, |cap: &Captures| {
            format!("<ol{}>", merge_class_attr(&cap[1], &["blog-list", "numbered"], &[]))
        });
        Ok(res.to_string())
    }
}

pub struct Blockquotes;

impl Stage for Blockquotes {
    fn name(&self) -> &str {
        "blockquotes"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let res = BLOCKQUOTE_REGEX.replace_all(content, |cap: &Captures| {
            format!("<blockquote{}>", merge_class_attr(&cap[1], &["blog-blockquote"], &[]))
        });
        Ok(res.to_string())
    }
}

/// Whitespace inside `<pre>` is left alone, everything else is compacted.
pub struct Cleanup;

impl Stage for Cleanup {
    fn name(&self) -> &str {
        "cleanup"
    }

    fn apply(&self, content: &str) -> Result<String> {
        let content = COMMENT_REGEX.replace_all(content, "");

        let content = replace_outside_pre(&content, |part| {
            let part = EMPTY_PARAGRAPH_REGEX.replace_all(part, "");
            let part = WHITESPACE_REGEX.replace_all(&part, " ");
            INTER_TAG_REGEX.replace_all(&part, "><").to_string()
        });

        let content = PRE_EDGE_REGEX.replace_all(&content, "${1}${2}${3}${4}");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(stage: &dyn Stage, content: &str) -> String {
        stage.apply(content).unwrap()
    }

    fn links() -> Links {
        Links { policy: LinkPolicy::new(&["myblog.dev".to_string(), "localhost".to_string()]) }
    }

    #[test]
    fn test_heading_ids() {
        let stage = HeadingIds { dedupe: false };
        assert_eq!(apply(&stage, "<h1>Hello, World!</h1>"), r#"<h1 id="hello-world">Hello, World!</h1>"#);
        assert_eq!(apply(&stage, r#"<h2 class="big" id="old">  Getting <em>Started</em> </h2>"#),
                   r#"<h2 class="big" id="getting-started">Getting <em>Started</em></h2>"#);
    }

    #[test]
    fn test_heading_ids_keep_duplicates() {
        let stage = HeadingIds { dedupe: false };
        assert_eq!(apply(&stage, "<h2>Intro</h2><h3>Intro</h3>"),
                   r#"<h2 id="intro">Intro</h2><h3 id="intro">Intro</h3>"#);
    }

    #[test]
    fn test_heading_ids_dedupe() {
        let stage = HeadingIds { dedupe: true };
        assert_eq!(apply(&stage, "<h2>Intro</h2><h3>Intro</h3><h3>Intro 2</h3>"),
                   r#"<h2 id="intro">Intro</h2><h3 id="intro-2">Intro</h3><h3 id="intro-2-2">Intro 2</h3>"#);
    }

    #[test]
    fn test_heading_across_lines() {
        let stage = HeadingIds { dedupe: false };
        assert_eq!(apply(&stage, "<h2>\n  Getting Started\n</h2>"), r#"<h2 id="getting-started">Getting Started</h2>"#);
        assert_eq!(apply(&stage, "<h3>Getting\nStarted</h3>"), "<h3 id=\"getting-started\">Getting\nStarted</h3>");
    }

    #[test]
    fn test_heading_ignores_header_tag() {
        let stage = HeadingIds { dedupe: false };
        assert_eq!(apply(&stage, "<header>x</header>"), "<header>x</header>");
    }

    #[test]
    fn test_code_block_with_language() {
        let res = apply(&CodeBlocks, r#"<pre><code class="language-python">print('<x>')</code></pre>"#);
        assert_eq!(res, r#"<pre><code class="language-python">print(&#x27;&lt;x&gt;&#x27;)</code></pre>"#);
    }

    #[test]
    fn test_code_block_defaults_to_text() {
        let res = apply(&CodeBlocks, "<pre class=\"x\">\n<code>a < b</code>\n</pre>");
        assert_eq!(res, r#"<pre><code class="language-text">a &lt; b</code></pre>"#);
    }

    #[test]
    fn test_code_block_keeps_editor_entities() {
        let res = apply(&CodeBlocks, r#"<pre><code class="hljs language-rust">Vec&lt;u8&gt;</code></pre>"#);
        assert_eq!(res, r#"<pre><code class="language-rust">Vec&lt;u8&gt;</code></pre>"#);
    }

    #[test]
    fn test_inline_code() {
        let res = apply(&CodeBlocks, "<p>Run <code>a<b</code> or <code class=\"x\">c</code></p>");
        assert_eq!(res, r#"<p>Run <code class="inline-code">a&lt;b</code> or <code class="inline-code">c</code></p>"#);
    }

    #[test]
    fn test_images() {
        let res = apply(&Images, r#"<img src="a.jpg">"#);
        assert_eq!(res, r#"<img src="a.jpg" alt="" class="blog-image responsive-image" loading="lazy" />"#);

        let res = apply(&Images, r#"<img title="T" alt="A" src="/media/b.png" class="old" />"#);
        assert_eq!(res, r#"<img src="/media/b.png" alt="A" class="blog-image responsive-image" loading="lazy" title="T" />"#);
    }

    #[test]
    fn test_images_without_src_unchanged() {
        assert_eq!(apply(&Images, "<img>"), "<img>");
        assert_eq!(apply(&Images, r#"<img alt="x" data-src="lazy.jpg">"#), r#"<img alt="x" data-src="lazy.jpg">"#);
    }

    #[test]
    fn test_external_link() {
        let res = apply(&links(), r#"<a href="https://example.com">x</a>"#);
        assert_eq!(res, r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer" class="external-link">x</a>"#);
    }

    #[test]
    fn test_internal_link() {
        let res = apply(&links(), r#"<a href="/internal">x</a>"#);
        assert_eq!(res, r#"<a href="/internal" class="internal-link">x</a>"#);
        assert!(!res.contains("target"));

        let res = apply(&links(), r#"<a href="https://www.myblog.dev/about" target="_blank">about</a>"#);
        assert_eq!(res, r#"<a href="https://www.myblog.dev/about" class="internal-link">about</a>"#);
    }

    #[test]
    fn test_link_across_lines() {
        let res = apply(&links(), "<a href=\"https://evil.example\">click\nhere</a>");
        assert_eq!(res, "<a href=\"https://evil.example\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"external-link\">click\nhere</a>");
    }

    #[test]
    fn test_link_classes_merged() {
        let res = apply(&links(), r#"<a class="btn primary" href="https://rust-lang.org" title="Rust">Rust</a>"#);
        assert_eq!(res, r#"<a href="https://rust-lang.org" title="Rust" target="_blank" rel="noopener noreferrer" class="btn primary external-link">Rust</a>"#);
    }

    #[test]
    fn test_anchor_without_href_unchanged() {
        assert_eq!(apply(&links(), r#"<a name="top">top</a>"#), r#"<a name="top">top</a>"#);
    }

    #[test]
    fn test_tables() {
        let res = apply(&Tables, "<table><tr><td>1</td></tr></table>");
        assert_eq!(res, r#"<div class="table-responsive"><table class="blog-table"><tr><td>1</td></tr></table></div>"#);
        assert_eq!(apply(&Tables, &res), res);
    }

    #[test]
    fn test_table_inside_div() {
        let res = apply(&Tables, r#"<div><table border="1"><tr><td>1</td></tr></table></div>"#);
        assert_eq!(res, r#"<div><div class="table-responsive"><table border="1" class="blog-table"><tr><td>1</td></tr></table></div></div>"#);
        assert_eq!(apply(&Tables, &res), res);
    }

    #[test]
    fn test_lists() {
        let res = apply(&Lists, r#"<ul><li>a</li></ul><ol start="3"><li>b</li></ol>"#);
        assert_eq!(res, r#"<ul class="blog-list"><li>a</li></ul><ol start="3" class="blog-list numbered"><li>b</li></ol>"#);
        assert_eq!(apply(&Lists, &res), res);
    }

    #[test]
    fn test_blockquotes() {
        let res = apply(&Blockquotes, r#"<blockquote cite="x"><p>q</p></blockquote>"#);
        assert_eq!(res, r#"<blockquote cite="x" class="blog-blockquote"><p>q</p></blockquote>"#);
        assert_eq!(apply(&Blockquotes, &res), res);
    }

    #[test]
    fn test_cleanup() {
        let res = apply(&Cleanup, "\n  <p>one   two</p>\n<p> </p>\n<!-- note -->\n<p>three</p>  ");
        assert_eq!(res, "<p>one two</p><p>three</p>");
    }

    #[test]
    fn test_cleanup_preserves_pre() {
        let content = "<p>code:</p>\n<pre><code class=\"language-python\">def f():\n    return 1\n</code></pre>\n<p>after</p>";
        let res = apply(&Cleanup, content);
        assert_eq!(res, "<p>code:</p><pre><code class=\"language-python\">def f():\n    return 1\n</code></pre><p>after</p>");
    }

    #[test]
    fn test_cleanup_comment_inside_paragraph() {
        assert_eq!(apply(&Cleanup, "<p><!-- x --></p><p>a <!-- b --> c</p>"), "<p>a c</p>");
    }

    #[test]
    fn test_default_stage_order() {
        let names: Vec<String> = default_stages(&ContentSettings::default())
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["headings", "code_blocks", "images", "links", "tables", "lists", "blockquotes", "cleanup"]);
    }
}
