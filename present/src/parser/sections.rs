//! Recursive-descent section parser
//!
//! A level-N heading is exactly N asterisks followed by a space. Each call
//! to [`parse_sections`] reads the run of sibling sections one level below
//! `number` and recurses for deeper headings found in a section body.

use super::error::ParseError;
use super::lines::Lines;
use super::{is_speaker_note, Context};
use crate::model::{Elem, List, Section, SectionNumber, Text};
use regex::Regex;
use std::sync::OnceLock;

/// Matches any section heading and captures its asterisk run
fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^(\*+) ").expect("heading pattern is valid"))
}

/// Deepest heading recognised; longer asterisk runs are plain text
pub(crate) const MAX_DEPTH: usize = 6;

/// Number of asterisks of a heading line, `None` for any other line
pub(crate) fn heading_depth(text: &str) -> Option<usize> {
    heading_regex()
        .captures(text)
        .map(|caps| caps[1].len())
        .filter(|&depth| depth <= MAX_DEPTH)
}

/// Parse the sibling sections one level below `number`
///
/// # Parameters
/// * `ctx` - Context used to resolve dot-commands
/// * `name` - Name of the document, for error messages and asset lookup
/// * `lines` - Cursor positioned before the first heading of the run
/// * `number` - Number of the enclosing section (empty for the document)
///
/// # Returns
/// * `Ok(Vec<Section>)` - Sections numbered `number.1`, `number.2`, ...
/// * `Err(ParseError)` - Unknown command, bad command arguments or an
///   unreadable asset
pub(crate) fn parse_sections(
    ctx: &Context,
    name: &str,
    lines: &mut Lines,
    number: &SectionNumber,
) -> Result<Vec<Section>, ParseError> {
    let stars = number.depth() + 1;
    let mut sections = Vec::new();
    let mut index = 1;
    while let Some(text) = lines.next_non_empty() {
        let title = match heading_depth(&text) {
            Some(depth) if depth == stars => text[stars + 1..].to_string(),
            Some(depth) if depth > stars => {
                // Skipped level: open an untitled section and let its body
                // recurse down to the heading.
                lines.back();
                String::new()
            }
            _ => {
                lines.back();
                break;
            }
        };
        let mut section = Section {
            number: number.child(index),
            title,
            ..Section::default()
        };
        parse_body(ctx, name, lines, &mut section)?;
        log::debug!(
            "{}: parsed section {} {:?} ({} elements)",
            name,
            section.number,
            section.title,
            section.elems.len()
        );
        sections.push(section);
        index += 1;
    }
    Ok(sections)
}

/// Consume the body of `section` up to the next heading of its level or
/// shallower
fn parse_body(
    ctx: &Context,
    name: &str,
    lines: &mut Lines,
    section: &mut Section,
) -> Result<(), ParseError> {
    let stars = section.number.depth();
    while let Some(text) = lines.next_non_empty() {
        let depth = heading_depth(&text);
        if depth.is_some_and(|d| d <= stars) {
            lines.back();
            break;
        }

        let elem = if text.starts_with(char::is_whitespace) {
            parse_indented(lines, &text)
        } else if text.starts_with("- ") {
            Some(parse_list(lines, text))
        } else if is_speaker_note(&text) {
            section.notes.push(text[2..].to_string());
            None
        } else if depth.is_some() {
            lines.back();
            let subsections = parse_sections(ctx, name, lines, &section.number)?;
            section
                .elems
                .extend(subsections.into_iter().map(Elem::Section));
            None
        } else if text.starts_with('.') {
            parse_command(ctx, name, lines, section, &text)?
        } else {
            parse_text(lines, text)
        };

        if let Some(elem) = elem {
            section.elems.push(elem);
        }
    }
    Ok(())
}

/// Collect an indented block into one preformatted text element
///
/// Blank lines inside the block are kept; the block ends at the first
/// non-blank line that does not share the first line's indentation.
fn parse_indented(lines: &mut Lines, first: &str) -> Option<Elem> {
    let width = first.find(|c: char| !c.is_whitespace())?;
    let indent = first[..width].to_string();

    let mut block = Vec::new();
    let mut next = Some(first.to_string());
    while let Some(text) = next.take() {
        if text.is_empty() {
            block.push(String::new());
        } else if text.starts_with(&indent) {
            block.push(text[width..].to_string());
        } else {
            break;
        }
        next = lines.next();
    }
    lines.back();

    // Browsers treat tabs badly.
    let pre = block.join("\n").replace('\t', "    ");
    Some(Elem::Text(Text {
        lines: vec![pre.trim_end().to_string()],
        pre: true,
    }))
}

fn parse_list(lines: &mut Lines, first: String) -> Elem {
    let mut bullets = Vec::new();
    let mut next = Some(first);
    while let Some(text) = next.take() {
        match text.strip_prefix("- ") {
            Some(bullet) => bullets.push(bullet.to_string()),
            None => break,
        }
        next = lines.next();
    }
    lines.back();
    Elem::List(List { bullets })
}

/// Dispatch a dot-command line
///
/// `.background` only decorates the section; every other command goes
/// through the registry.
fn parse_command(
    ctx: &Context,
    name: &str,
    lines: &Lines,
    section: &mut Section,
    text: &str,
) -> Result<Option<Elem>, ParseError> {
    let line = lines.line_number();
    let mut args = text.split_whitespace();
    let command = args.next().unwrap_or(text);

    if command == ".background" {
        let url = args
            .next()
            .ok_or_else(|| ParseError::malformed(name, line, "missing .background url"))?;
        section.classes.push("background".to_string());
        section
            .styles
            .push(format!("background-image: url('{}')", url));
        return Ok(None);
    }

    let parser = ctx
        .registry()
        .get(command)
        .ok_or_else(|| ParseError::UnknownCommand {
            file: name.to_string(),
            line,
            command: text.to_string(),
        })?;
    parser(ctx, name, line, text).map(Some)
}

/// Collect a run of plain text lines
///
/// The run ends at a blank line, which is consumed, or at a line starting
/// with a period, which is pushed back as a command. A leading `\.` escapes
/// the period.
fn parse_text(lines: &mut Lines, first: String) -> Option<Elem> {
    let mut run = Vec::new();
    let mut next = Some(first);
    while let Some(text) = next.take() {
        if text.trim().is_empty() {
            break;
        }
        if text.starts_with('.') {
            lines.back();
            break;
        }
        match text.strip_prefix('\\') {
            Some(rest) if rest.starts_with('.') => run.push(rest.to_string()),
            _ => run.push(text),
        }
        next = lines.next();
    }
    if run.is_empty() {
        None
    } else {
        Some(Elem::Text(Text {
            lines: run,
            pre: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryReader;

    fn sections(input: &str) -> Result<Vec<Section>, ParseError> {
        let ctx = Context::new(MemoryReader::new());
        let mut lines = Lines::from_text(input);
        parse_sections(&ctx, "test.slide", &mut lines, &SectionNumber::default())
    }

    #[test]
    fn test_heading_depth() {
        assert_eq!(heading_depth("* One"), Some(1));
        assert_eq!(heading_depth("*** Three"), Some(3));
        assert_eq!(heading_depth("*bold* text"), None);
        assert_eq!(heading_depth("**"), None);
        assert_eq!(heading_depth("****** Six"), Some(6));
        assert_eq!(heading_depth("******* Seven"), None);
    }

    #[test]
    fn test_overlong_heading_is_text() {
        let input = format!("* S\n\n{} x\n", "*".repeat(10_000));
        let parsed = sections(&input).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].section_count(), 1);
        assert!(
            matches!(&parsed[0].elems[..], [Elem::Text(t)] if t.lines[0].len() == 10_002)
        );
    }

    #[test]
    fn test_deepest_jump_stops_at_max_depth() {
        let input = format!("* S\n\n{} deep\n", "*".repeat(MAX_DEPTH));
        let parsed = sections(&input).unwrap();
        let mut section = &parsed[0];
        while let Some(child) = section.sections().next() {
            section = child;
        }
        assert_eq!(section.title, "deep");
        assert_eq!(section.number.depth(), MAX_DEPTH);
    }

    #[test]
    fn test_sibling_numbering() {
        let parsed = sections("* A\n\n* B\n\n* C").unwrap();
        let numbers: Vec<Vec<u32>> = parsed.iter().map(|s| s.number.parts.clone()).collect();
        assert_eq!(numbers, vec![vec![1], vec![2], vec![3]]);
        assert_eq!(parsed[2].title, "C");
    }

    #[test]
    fn test_nested_numbering_restarts() {
        let parsed = sections("* A\n** A1\n** A2\n* B\n** B1").unwrap();
        assert_eq!(parsed.len(), 2);
        let a: Vec<&Section> = parsed[0].sections().collect();
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].number.parts, vec![1, 2]);
        assert_eq!(a[1].title, "A2");
        let b: Vec<&Section> = parsed[1].sections().collect();
        assert_eq!(b[0].number.parts, vec![2, 1]);
    }

    #[test]
    fn test_indented_block() {
        let parsed = sections("* Code\n\n    fn main() {\n\n    \tbody();\n    }\n\nafter").unwrap();
        let elems = &parsed[0].elems;
        assert_eq!(
            elems[0],
            Elem::Text(Text {
                lines: vec!["fn main() {\n\n    body();\n}".to_string()],
                pre: true,
            })
        );
        assert_eq!(elems[1], Elem::text(["after"]));
    }

    #[test]
    fn test_indented_block_ends_at_dedent() {
        let parsed = sections("* S\n  one\n  two\nthree").unwrap();
        assert_eq!(parsed[0].elems.len(), 2);
        assert_eq!(parsed[0].elems[1], Elem::text(["three"]));
    }

    #[test]
    fn test_list_and_notes() {
        let parsed = sections("* S\n- one\n- two\n: say this\ntext").unwrap();
        let s = &parsed[0];
        assert_eq!(
            s.elems[0],
            Elem::List(List {
                bullets: vec!["one".to_string(), "two".to_string()],
            })
        );
        assert_eq!(s.notes, vec!["say this"]);
        assert_eq!(s.elems[1], Elem::text(["text"]));
    }

    #[test]
    fn test_text_run_breaks_on_command_and_unescapes() {
        let parsed = sections("* S\nline one\n\\.not a command\n.caption A caption").unwrap();
        let s = &parsed[0];
        assert_eq!(s.elems[0], Elem::text(["line one", ".not a command"]));
        assert_eq!(s.elems[1].template_name(), "caption");
    }

    #[test]
    fn test_background() {
        let parsed = sections("* S\n.background img/bg.png").unwrap();
        let s = &parsed[0];
        assert!(s.elems.is_empty());
        assert_eq!(s.classes, vec!["background"]);
        assert_eq!(s.styles, vec!["background-image: url('img/bg.png')"]);
    }

    #[test]
    fn test_background_without_url() {
        assert!(matches!(
            sections("* S\n.background"),
            Err(ParseError::MalformedCommandArgs { line: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_command_names_line() {
        let err = sections("* S\n\ntext\n\n.nosuchcmd arg").unwrap_err();
        match err {
            ParseError::UnknownCommand {
                file,
                line,
                command,
            } => {
                assert_eq!(file, "test.slide");
                assert_eq!(line, 5);
                assert_eq!(command, ".nosuchcmd arg");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_skipped_level_is_nested_two_deep() {
        let parsed = sections("* Top\nintro\n\n*** Deep\ndeep text\n\n* Next").unwrap();
        assert_eq!(parsed.len(), 2);
        let implicit: Vec<&Section> = parsed[0].sections().collect();
        assert_eq!(implicit.len(), 1);
        assert_eq!(implicit[0].number.parts, vec![1, 1]);
        assert_eq!(implicit[0].title, "");
        let deep: Vec<&Section> = implicit[0].sections().collect();
        assert_eq!(deep[0].number.parts, vec![1, 1, 1]);
        assert_eq!(deep[0].title, "Deep");
        assert_eq!(deep[0].elems, vec![Elem::text(["deep text"])]);
        assert_eq!(parsed[1].number.parts, vec![2]);
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let parsed = sections("* S\n# hidden\nshown").unwrap();
        assert_eq!(parsed[0].elems, vec![Elem::text(["shown"])]);
    }

    #[test]
    fn test_non_heading_stops_run() {
        let mut lines = Lines::from_text("not a heading");
        let ctx = Context::new(MemoryReader::new());
        let parsed =
            parse_sections(&ctx, "x", &mut lines, &SectionNumber::default()).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(lines.next().as_deref(), Some("not a heading"));
    }
}
