//! Content elements
//!
//! Every piece of content inside a section is an [`Elem`]. The set of
//! variants is closed; commands registered at runtime produce one of these
//! variants, using [`Elem::Custom`] when none of the built-in shapes fit.

use super::Section;
use serde::{Deserialize, Serialize};

/// A typed content unit nestable inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elem {
    /// A nested section
    Section(Section),

    /// A paragraph or preformatted block
    Text(Text),

    /// A bulleted list
    List(List),

    /// A code snippet read from a file (`.code` / `.play`)
    Code(Code),

    /// An image (`.image`)
    Image(Image),

    /// A video (`.video`)
    Video(Video),

    /// An embedded frame (`.iframe`)
    Iframe(Iframe),

    /// A hyperlink, either from `.link` or an author contact line
    Link(Link),

    /// A figure caption (`.caption`)
    Caption(Caption),

    /// Trusted HTML read from a file (`.html`)
    Html(Html),

    /// Output of a user-registered command
    Custom(Custom),
}

impl Elem {
    /// Name of the template used to render this element
    ///
    /// The parser never looks at this; it exists for the output layer.
    pub fn template_name(&self) -> &str {
        match self {
            Elem::Section(_) => "section",
            Elem::Text(_) => "text",
            Elem::List(_) => "list",
            Elem::Code(_) => "code",
            Elem::Image(_) => "image",
            Elem::Video(_) => "video",
            Elem::Iframe(_) => "iframe",
            Elem::Link(_) => "link",
            Elem::Caption(_) => "caption",
            Elem::Html(_) => "html",
            Elem::Custom(custom) => &custom.template,
        }
    }

    /// Build a plain (non-preformatted) text element from lines
    pub fn text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Elem::Text(Text {
            lines: lines.into_iter().map(Into::into).collect(),
            pre: false,
        })
    }
}

/// An optionally preformatted paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub lines: Vec<String>,
    /// Preformatted blocks keep their whitespace and are not styled
    pub pre: bool,
}

/// A bulleted list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub bullets: Vec<String>,
}

/// A code snippet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Escaped, line-numbered HTML ready for output
    pub text: String,
    /// Runnable snippet (`.play`)
    pub play: bool,
    /// Editable snippet (`-edit`)
    pub edit: bool,
    /// Show line numbers (`-numbers`)
    pub numbers: bool,
    /// Path of the source file, as resolved against the document
    pub file_name: String,
    /// Extension of the source file including the dot, e.g. `".go"`
    pub ext: String,
    /// Selected source lines, unescaped, newline terminated
    pub raw: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    /// MIME type of the source, e.g. `video/webm`
    pub source_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iframe {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A hyperlink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
}

/// Trusted HTML fragment, emitted verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Html {
    pub html: String,
}

/// Element produced by a command registered outside this crate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Custom {
    /// Template name reported by [`Elem::template_name`]
    pub template: String,
    /// Arguments of the command line, excluding the command name
    pub args: Vec<String>,
    /// Trusted HTML produced by the command
    pub html: String,
}
