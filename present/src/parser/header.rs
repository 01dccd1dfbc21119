//! Title block and author parsing
//!
//! Everything before the first section heading: the title, header metadata
//! (subtitle, time, tags) up to the first blank line, then blank-separated
//! author blocks.

use super::error::{ParseError, ParseStage};
use super::lines::Lines;
use super::is_speaker_note;
use crate::model::{Author, Doc, Elem, Link};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const TAG_PREFIX: &str = "Tags:";

/// Speaker notes found before the first line starting with `*`
pub(crate) fn title_notes(raw: &[String]) -> Vec<String> {
    raw.iter()
        .take_while(|line| !line.starts_with('*'))
        .filter(|line| is_speaker_note(line))
        .map(|line| line[2..].to_string())
        .collect()
}

/// Parse the title and header metadata into `doc`
pub(crate) fn parse_header(doc: &mut Doc, lines: &mut Lines) -> Result<(), ParseError> {
    // First non-empty line starts header.
    doc.title = lines.next_non_empty().ok_or(ParseError::MissingTitle)?;
    loop {
        let text = lines
            .next()
            .ok_or(ParseError::UnexpectedEof(ParseStage::Header))?;
        if text.is_empty() {
            break;
        }
        if is_speaker_note(&text) {
            continue;
        }
        if let Some(tags) = text.strip_prefix(TAG_PREFIX) {
            doc.tags.extend(tags.split(',').map(|t| t.trim().to_string()));
        } else if let Some(time) = parse_time(&text) {
            doc.time = Some(time);
        } else if doc.subtitle.is_empty() {
            doc.subtitle = text;
        } else {
            return Err(ParseError::UnexpectedHeaderLine(text));
        }
    }
    Ok(())
}

/// Parse blank-separated author blocks up to the first top-level heading
pub(crate) fn parse_authors(lines: &mut Lines) -> Result<Vec<Author>, ParseError> {
    if lines.next_non_empty().is_none() {
        return Err(ParseError::UnexpectedEof(ParseStage::Authors));
    }
    lines.back();

    let mut authors = Vec::new();
    let mut current: Option<Author> = None;
    loop {
        let text = lines
            .next()
            .ok_or(ParseError::UnexpectedEof(ParseStage::Authors))?;

        // A section heading ends the author list.
        if text.starts_with("* ") {
            lines.back();
            break;
        }
        if is_speaker_note(&text) {
            continue;
        }
        if text.is_empty() {
            if let Some(author) = current.take() {
                authors.push(author);
            }
            continue;
        }
        current
            .get_or_insert_with(Author::default)
            .elems
            .push(author_elem(&text));
    }
    authors.extend(current);
    Ok(authors)
}

/// Classify one line of an author block
///
/// Lines that
/// - begin with `@` are twitter handles,
/// - contain a colon are links,
/// - contain an `@` are email addresses.
///
/// Everything else, and any link that fails to parse, is plain text.
fn author_elem(text: &str) -> Elem {
    let url = if let Some(handle) = text.strip_prefix('@') {
        Some(format!("http://twitter.com/{}", handle))
    } else if text.contains(':') {
        Some(text.to_string())
    } else if text.contains('@') {
        Some(format!("mailto:{}", text))
    } else {
        None
    };
    match url {
        Some(url) if is_absolute_url(&url) => Elem::Link(Link {
            url,
            label: text.to_string(),
        }),
        _ => Elem::text([text]),
    }
}

fn is_absolute_url(text: &str) -> bool {
    match url::Url::parse(text) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Parse({:?}): {}", text, e);
            false
        }
    }
}

/// Parse a header time line
///
/// Accepts `"15:04 2 Jan 2006"` and `"2 Jan 2006"`. A bare date is placed at
/// 11:00 UTC, which falls on the same calendar date in every time zone.
pub(crate) fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    // `%b` also accepts full month names; only the short form is a time.
    let month = text.split_whitespace().rev().nth(1)?;
    if month.len() != 3 {
        return None;
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%H:%M %d %b %Y") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(text, "%d %b %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(11, 0, 0))
        .map(|t| t.and_utc())
}
