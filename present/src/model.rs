//! Document model produced by the parser
//!
//! A [`Doc`] owns its authors and top-level [`Section`]s; sections own their
//! content as an ordered list of [`Elem`]s, where a nested section is just
//! another element. The tree is built in one pass and not mutated after
//! parsing returns.

use crate::style::escape_html;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Submodules
mod elem;
pub mod encoding;
mod section_number;

// Re-export public types
pub use elem::{Caption, Code, Custom, Elem, Html, Iframe, Image, Link, List, Text, Video};
pub use encoding::EncodingError;
pub use section_number::SectionNumber;

/// `strftime` pattern used to display [`Doc::time`], e.g. "2 January 2006"
pub const TIME_FORMAT: &str = "%-d %B %Y";

/// A complete parsed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub title: String,
    pub subtitle: String,
    pub time: Option<DateTime<Utc>>,
    pub authors: Vec<Author>,
    /// Speaker notes attached to the title slide
    pub title_notes: Vec<String>,
    pub sections: Vec<Section>,
    /// Tags in declaration order; duplicates are kept
    pub tags: Vec<String>,
}

impl Doc {
    /// Total number of sections at every depth
    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::section_count).sum()
    }

    /// Date line shown under the title, empty when no time was given
    pub fn formatted_time(&self) -> String {
        self.time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// The person who wrote and/or presents the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Name line followed by contact lines, as Text and Link elements
    pub elems: Vec<Elem>,
}

impl Author {
    /// Leading text elements of the author block
    ///
    /// This is the name, job title and company without the contact details.
    pub fn text_elems(&self) -> Vec<&Elem> {
        self.elems
            .iter()
            .take_while(|e| matches!(e, Elem::Text(_)))
            .collect()
    }
}

/// A numbered section of a document (a slide, or an article heading)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub number: SectionNumber,
    pub title: String,
    /// Content and nested sections in document order
    pub elems: Vec<Elem>,
    /// Speaker notes
    pub notes: Vec<String>,
    /// CSS classes applied to the section
    pub classes: Vec<String>,
    /// Inline style declarations applied to the section
    pub styles: Vec<String>,
}

impl Section {
    /// Heading level of the section
    ///
    /// The document title is level 1, top-level sections level 2, etc.
    pub fn level(&self) -> usize {
        self.number.depth() + 1
    }

    /// Number with a trailing dot per component, e.g. `"2.1."`
    pub fn formatted_number(&self) -> String {
        self.number.formatted()
    }

    /// Sections nested directly within this one
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.elems.iter().filter_map(|e| match e {
            Elem::Section(s) => Some(s),
            _ => None,
        })
    }

    /// This section plus every section nested below it
    pub fn section_count(&self) -> usize {
        1 + self.sections().map(Section::section_count).sum::<usize>()
    }

    /// `class` and `style` attributes for the section's HTML element
    ///
    /// Returns an empty string when the section has neither.
    pub fn html_attributes(&self) -> String {
        let mut attrs = Vec::new();
        if !self.classes.is_empty() {
            attrs.push(format!("class=\"{}\"", escape_html(&self.classes.join(" "))));
        }
        if !self.styles.is_empty() {
            attrs.push(format!("style=\"{}\"", escape_html(&self.styles.join(" "))));
        }
        attrs.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(parts: Vec<u32>, elems: Vec<Elem>) -> Section {
        Section {
            number: SectionNumber::new(parts),
            title: "t".to_string(),
            elems,
            ..Section::default()
        }
    }

    #[test]
    fn test_level_tracks_number_depth() {
        assert_eq!(section(vec![1], vec![]).level(), 2);
        assert_eq!(section(vec![1, 3], vec![]).level(), 3);
    }

    #[test]
    fn test_sections_filters_nested() {
        let nested = section(vec![1, 1], vec![]);
        let parent = section(
            vec![1],
            vec![Elem::text(["hello"]), Elem::Section(nested.clone())],
        );
        let found: Vec<&Section> = parent.sections().collect();
        assert_eq!(found, vec![&nested]);
    }

    #[test]
    fn test_html_attributes() {
        let mut s = section(vec![1], vec![]);
        assert_eq!(s.html_attributes(), "");
        s.classes.push("background".to_string());
        s.styles
            .push("background-image: url('bg.png')".to_string());
        assert_eq!(
            s.html_attributes(),
            "class=\"background\" style=\"background-image: url(&#39;bg.png&#39;)\""
        );
    }

    #[test]
    fn test_author_text_elems_stop_at_first_link() {
        let author = Author {
            elems: vec![
                Elem::text(["Jane Doe"]),
                Elem::text(["Example Corp"]),
                Elem::Link(Link {
                    url: "mailto:jane@example.com".to_string(),
                    label: "jane@example.com".to_string(),
                }),
                Elem::text(["trailing"]),
            ],
        };
        assert_eq!(author.text_elems().len(), 2);
    }

    #[test]
    fn test_section_count_includes_nested() {
        let doc = Doc {
            sections: vec![
                section(vec![1], vec![Elem::Section(section(vec![1, 1], vec![]))]),
                section(vec![2], vec![]),
            ],
            ..Doc::default()
        };
        assert_eq!(doc.section_count(), 3);
    }
}
