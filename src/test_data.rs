#[cfg(test)]
pub const SAMPLE_POST_HTML: &str = r#"
<h1>Welcome to My Blog</h1>
<p>This is a <strong>sample blog post</strong> with <em>rich content</em> to test our content processing system.</p>

<h2>Code Examples</h2>
<p>Here's some Python code:</p>
<pre><code class="language-python">
def hello_world():
    print("Hello, World!")
    return "success"
</code></pre>

<p>And some inline code: <code>console.log('Hello')</code></p>

<h2>Lists and Links</h2>
<ul>
    <li>First item with <a href="https://example.com">external link</a></li>
    <li>Second item with <a href="/internal">internal link</a></li>
    <li>Third item</li>
</ul>

<h3>Blockquote</h3>
<blockquote>
    <p>This is a blockquote with some important information.</p>
</blockquote>

<h3>Table</h3>
<table>
    <thead>
        <tr>
            <th>Feature</th>
            <th>Status</th>
        </tr>
    </thead>
    <tbody>
        <tr>
            <td>Rich Text Editor</td>
            <td>Complete</td>
        </tr>
    </tbody>
</table>

<h2>Images</h2>
<p>Here would be an image:</p>
<img src="/media/sample-image.jpg" alt="Sample Image" title="This is a sample image" />

<p></p>
<!-- editor leftovers -->
<p>That's all for this sample post!</p>
"#;

#[cfg(test)]
pub const SAMPLE_POST_PROCESSED: &str = concat!(
    r#"<h1 id="welcome-to-my-blog">Welcome to My Blog</h1>"#,
    r#"<p>This is a <strong>sample blog post</strong> with <em>rich content</em> to test our content processing system.</p>"#,
    r#"<h2 id="code-examples">Code Examples</h2>"#,
    r#"<p>Here's some Python code:</p>"#,
    "<pre><code class=\"language-python\">\ndef hello_world():\n    print(&quot;Hello, World!&quot;)\n    return &quot;success&quot;\n</code></pre>",
    r#"<p>And some inline code: <code class="inline-code">console.log(&#x27;Hello&#x27;)</code></p>"#,
    r#"<h2 id="lists-and-links">Lists and Links</h2>"#,
    r#"<ul class="blog-list">"#,
    r#"<li>First item with <a href="https://example.com" target="_blank" rel="noopener noreferrer" class="external-link">external link</a></li>"#,
    r#"<li>Second item with <a href="/internal" class="internal-link">internal link</a></li>"#,
    r#"<li>Third item</li>"#,
    r#"</ul>"#,
    r#"<h3 id="blockquote">Blockquote</h3>"#,
    r#"<blockquote class="blog-blockquote"><p>This is a blockquote with some important information.</p></blockquote>"#,
    r#"<h3 id="table">Table</h3>"#,
    r#"<div class="table-responsive"><table class="blog-table"><thead><tr><th>Feature</th><th>Status</th></tr></thead>"#,
    r#"<tbody><tr><td>Rich Text Editor</td><td>Complete</td></tr></tbody></table></div>"#,
    r#"<h2 id="images">Images</h2>"#,
    r#"<p>Here would be an image:</p>"#,
    r#"<img src="/media/sample-image.jpg" alt="Sample Image" class="blog-image responsive-image" loading="lazy" title="This is a sample image" />"#,
    r#"<p>That's all for this sample post!</p>"#,
);
