//! HTML renderer for parsed documents
//!
//! Articles render as a single page with a table of contents and numbered
//! headings. Slides render one `<article>` per top-level section, preceded
//! by a title slide. Prose is passed through [`style`]; code and trusted
//! HTML elements are emitted as produced by the parser.

use crate::model::{Author, Code, Doc, Elem, Section, Text};
use crate::render_config::{RenderConfig, RenderMode};
use crate::style::{escape_html, style};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing rendered output
#[derive(Error, Debug)]
pub enum HtmlRenderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Render a document and write it to `output_path`
///
/// # Parameters
/// * `doc` - The parsed document
/// * `mode` - Article or slides layout
/// * `config` - Rendering options
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
/// * `Ok(())` - Successfully written
/// * `Err(HtmlRenderError)` - Error creating or writing the file
pub fn to_html(
    doc: &Doc,
    mode: RenderMode,
    config: &RenderConfig,
    output_path: &Path,
) -> Result<(), HtmlRenderError> {
    let output = render_doc(doc, mode, config);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(output.as_bytes())?;

    log::debug!("wrote {} ({} bytes)", output_path.display(), output.len());
    Ok(())
}

/// Render a complete HTML page for `doc`
pub fn render_doc(doc: &Doc, mode: RenderMode, config: &RenderConfig) -> String {
    let mut output = String::new();
    write_html_header(&mut output, &doc.title, config);
    output.push_str("<body>\n");
    match mode {
        RenderMode::Article => write_article(&mut output, doc, config),
        RenderMode::Slides => write_slides(&mut output, doc, config),
    }
    output.push_str("</body>\n");
    output.push_str("</html>\n");
    output
}

fn write_html_header(output: &mut String, title: &str, config: &RenderConfig) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    match &config.stylesheet {
        Some(href) => output.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(href)
        )),
        None => {
            output.push_str("<style>\n");
            output.push_str(CSS_STYLES);
            output.push_str("</style>\n");
        }
    }
    output.push_str("</head>\n");
}

fn write_article(output: &mut String, doc: &Doc, config: &RenderConfig) {
    output.push_str("<div class=\"container\">\n");
    output.push_str(&format!(
        "<h1 class=\"document-title\">{}</h1>\n",
        escape_html(&doc.title)
    ));
    write_title_block(output, doc, config);

    if !doc.sections.is_empty() {
        output.push_str("<nav class=\"toc\">\n");
        write_toc(output, doc.sections.iter());
        output.push_str("</nav>\n");
    }

    for section in &doc.sections {
        write_section(output, section, RenderMode::Article, config);
    }
    output.push_str("</div>\n");
}

fn write_slides(output: &mut String, doc: &Doc, config: &RenderConfig) {
    output.push_str("<section class=\"slides\">\n");

    output.push_str("<article class=\"title-slide\">\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(&doc.title)));
    write_title_block(output, doc, config);
    output.push_str("</article>\n");

    for section in &doc.sections {
        write_section(output, section, RenderMode::Slides, config);
    }
    output.push_str("</section>\n");
}

/// Subtitle, date, authors and title notes
fn write_title_block(output: &mut String, doc: &Doc, config: &RenderConfig) {
    if !doc.subtitle.is_empty() {
        output.push_str(&format!(
            "<p class=\"subtitle\">{}</p>\n",
            escape_html(&doc.subtitle)
        ));
    }
    let time = doc.formatted_time();
    if !time.is_empty() {
        output.push_str(&format!("<p class=\"time\">{}</p>\n", time));
    }
    for author in &doc.authors {
        write_author(output, author, config);
    }
    write_notes(output, &doc.title_notes, config);
}

fn write_author(output: &mut String, author: &Author, config: &RenderConfig) {
    output.push_str("<div class=\"author\">\n");
    for elem in &author.elems {
        write_elem(output, elem, RenderMode::Article, config);
    }
    output.push_str("</div>\n");
}

/// Nested table of contents linking to the article headings
fn write_toc<'a>(output: &mut String, sections: impl Iterator<Item = &'a Section>) {
    output.push_str("<ul>\n");
    for section in sections {
        output.push_str(&format!(
            "<li><a href=\"#{}\">{} {}</a>",
            heading_id(section),
            section.formatted_number(),
            escape_html(&section.title)
        ));
        if section.sections().next().is_some() {
            output.push('\n');
            write_toc(output, section.sections());
        }
        output.push_str("</li>\n");
    }
    output.push_str("</ul>\n");
}

fn heading_id(section: &Section) -> String {
    format!("TOC_{}", section.formatted_number())
}

fn write_section(output: &mut String, section: &Section, mode: RenderMode, config: &RenderConfig) {
    let attrs = section.html_attributes();
    let attrs = if attrs.is_empty() {
        attrs
    } else {
        format!(" {}", attrs)
    };
    let level = section.level().min(6);

    match mode {
        RenderMode::Article => {
            output.push_str(&format!("<section{}>\n", attrs));
            output.push_str(&format!(
                "<h{} id=\"{}\">{} {}</h{}>\n",
                level,
                heading_id(section),
                section.formatted_number(),
                escape_html(&section.title),
                level
            ));
        }
        RenderMode::Slides if section.number.depth() == 1 => {
            output.push_str(&format!("<article{}>\n", attrs));
            // A slide with nothing on it is a section divider.
            let heading = if section.elems.is_empty() { 2 } else { 3 };
            output.push_str(&format!(
                "<h{}>{}</h{}>\n",
                heading,
                escape_html(&section.title),
                heading
            ));
        }
        RenderMode::Slides => {
            output.push_str(&format!("<section{}>\n", attrs));
            if !section.title.is_empty() {
                output.push_str(&format!(
                    "<h{}>{}</h{}>\n",
                    level,
                    escape_html(&section.title),
                    level
                ));
            }
        }
    }

    for elem in &section.elems {
        write_elem(output, elem, mode, config);
    }
    write_notes(output, &section.notes, config);

    if mode == RenderMode::Slides && section.number.depth() == 1 {
        output.push_str("</article>\n");
    } else {
        output.push_str("</section>\n");
    }
}

fn write_notes(output: &mut String, notes: &[String], config: &RenderConfig) {
    if !config.notes_enabled || notes.is_empty() {
        return;
    }
    output.push_str("<aside class=\"notes\">\n");
    for note in notes {
        output.push_str(&format!("<p>{}</p>\n", style(note)));
    }
    output.push_str("</aside>\n");
}

fn write_elem(output: &mut String, elem: &Elem, mode: RenderMode, config: &RenderConfig) {
    match elem {
        Elem::Section(section) => write_section(output, section, mode, config),
        Elem::Text(text) => write_text(output, text),
        Elem::List(list) => {
            output.push_str("<ul>\n");
            for bullet in &list.bullets {
                output.push_str(&format!("<li>{}</li>\n", style(bullet)));
            }
            output.push_str("</ul>\n");
        }
        Elem::Code(code) => write_code(output, code, config),
        Elem::Image(image) => {
            output.push_str(&format!(
                "<div class=\"image\"><img src=\"{}\"{}></div>\n",
                escape_html(&image.url),
                dimensions(image.height, image.width)
            ));
        }
        Elem::Video(video) => {
            output.push_str(&format!(
                "<div class=\"video\"><video{} controls><source src=\"{}\" type=\"{}\"></video></div>\n",
                dimensions(video.height, video.width),
                escape_html(&video.url),
                escape_html(&video.source_type)
            ));
        }
        Elem::Iframe(iframe) => {
            output.push_str(&format!(
                "<iframe src=\"{}\"{}></iframe>\n",
                escape_html(&iframe.url),
                dimensions(iframe.height, iframe.width)
            ));
        }
        Elem::Link(link) => {
            output.push_str(&format!(
                "<p class=\"link\"><a href=\"{}\" target=\"_blank\">{}</a></p>\n",
                escape_html(&link.url),
                style(&link.label)
            ));
        }
        Elem::Caption(caption) => {
            output.push_str(&format!("<figcaption>{}</figcaption>\n", style(&caption.text)));
        }
        Elem::Html(html) => {
            output.push_str(&html.html);
            output.push('\n');
        }
        Elem::Custom(custom) => {
            output.push_str(&custom.html);
            output.push('\n');
        }
    }
}

fn write_text(output: &mut String, text: &Text) {
    if text.pre {
        output.push_str("<div class=\"code\"><pre>");
        output.push_str(&escape_html(&text.lines.join("\n")));
        output.push_str("</pre></div>\n");
    } else {
        let lines: Vec<String> = text.lines.iter().map(|line| style(line)).collect();
        output.push_str(&format!("<p>{}</p>\n", lines.join("\n")));
    }
}

fn write_code(output: &mut String, code: &Code, config: &RenderConfig) {
    let class = if code.play && config.play_enabled {
        "code playground"
    } else {
        "code"
    };
    output.push_str(&format!("<div class=\"{}\">{}</div>\n", class, code.text));
}

fn dimensions(height: Option<u32>, width: Option<u32>) -> String {
    let mut attrs = String::new();
    if let Some(height) = height {
        attrs.push_str(&format!(" height=\"{}\"", height));
    }
    if let Some(width) = width {
        attrs.push_str(&format!(" width=\"{}\"", width));
    }
    attrs
}

/// Built-in styles used when no stylesheet is configured
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto',
                 'Helvetica Neue', sans-serif;
    line-height: 1.6;
    color: #333;
    background-color: #f5f5f5;
    padding: 20px;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    background: white;
    padding: 60px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}

.document-title {
    font-size: 2.5em;
    margin-bottom: 20px;
    border-bottom: 3px solid #0066cc;
}

.subtitle, .time {
    color: #666;
}

.author {
    margin: 16px 0;
}

.toc ul {
    list-style: none;
    padding-left: 20px;
}

h2, h3, h4, h5, h6 {
    margin: 24px 0 12px;
}

p, ul, .code, .image {
    margin-bottom: 12px;
}

ul {
    padding-left: 24px;
}

.code pre {
    font-family: 'Menlo', 'Consolas', monospace;
    background-color: #f4f4f4;
    padding: 12px;
    overflow-x: auto;
}

.numbers span::before {
    content: attr(num);
    display: inline-block;
    width: 3em;
    color: #999;
}

.notes {
    border-left: 4px solid #e0a000;
    padding-left: 12px;
    color: #555;
}

.slides article {
    background: white;
    width: 900px;
    min-height: 700px;
    margin: 20px auto;
    padding: 40px 60px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}

.slides article.background {
    background-size: cover;
}
"#;
