//! `.code` and `.play`
//!
//! `.code [-edit] [-numbers] file [address] [HLname]`
//!
//! The optional address selects part of the file:
//!
//! * `N` - line N
//! * `/regexp/` - the first match
//! * `$` - the end of the file
//! * `a,b` - from the start of `a` to the end of `b`; `b` is searched
//!   from where `a` ends
//!
//! The selection is always widened to whole lines. Lines ending in `OMIT`
//! are dropped, and a trailing `// HLname` comment marks a line to be bolded
//! when the invocation asks for highlight `name`.

use crate::model::{Code, Elem};
use crate::parser::{Context, ParseError};
use crate::style::escape_html;
use regex::{bytes, Regex};
use std::sync::OnceLock;

fn invocation_regex() -> &'static Regex {
    static INVOCATION: OnceLock<Regex> = OnceLock::new();
    INVOCATION.get_or_init(|| {
        Regex::new(r"^\.(code|play)\s+((?:(?:-edit|-numbers)\s+)*)(\S+)(?:\s+(.*))?$")
            .expect("invocation pattern is valid")
    })
}

fn highlight_regex() -> &'static Regex {
    static HIGHLIGHT: OnceLock<Regex> = OnceLock::new();
    HIGHLIGHT.get_or_init(|| {
        Regex::new(r"\s+HL([a-zA-Z0-9_]+)?$").expect("highlight pattern is valid")
    })
}

/// Source files need not be UTF-8, so this matches raw bytes
fn highlight_comment_regex() -> &'static bytes::Regex {
    static COMMENT: OnceLock<bytes::Regex> = OnceLock::new();
    COMMENT.get_or_init(|| {
        bytes::Regex::new(r"(?-u)(.+) // HL(.*)$").expect("comment pattern is valid")
    })
}

/// One selected source line
#[derive(Debug, PartialEq)]
struct CodeLine {
    number: usize,
    /// Line content as stored in the file, without the line break
    text: Vec<u8>,
    /// Name from a trailing `// HLname` comment, if any
    highlight: String,
}

/// Parse a `.code` or `.play` invocation
pub fn parse_code(
    ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let mut cmd = text.trim();
    let mut highlight = "";
    if let Some(caps) = highlight_regex().captures(cmd) {
        let name = caps
            .get(1)
            .ok_or_else(|| ParseError::malformed(file_name, line, "invalid highlight syntax"))?;
        highlight = name.as_str();
        cmd = &cmd[..name.start() - 2];
    }

    let caps = invocation_regex().captures(cmd.trim_end()).ok_or_else(|| {
        ParseError::malformed(
            file_name,
            line,
            format!("syntax error for .code/.play invocation: {:?}", text),
        )
    })?;
    let play = &caps[1] == "play";
    let flags = caps.get(2).map_or("", |m| m.as_str());
    let address = caps.get(4).map_or("", |m| m.as_str().trim());

    let path = ctx.resolve(file_name, &caps[3]);
    let source = ctx.read_file(file_name, line, &path)?;

    let (lo, hi) =
        address_range(&source, address).map_err(|reason| ParseError::InvalidAddress {
            file: file_name.to_string(),
            line,
            address: address.to_string(),
            reason,
        })?;
    let (lo, hi) = widen_to_lines(&source, lo, hi);
    let first_line = 1 + source[..lo].iter().filter(|&&b| b == b'\n').count();
    let lines = select_lines(&source[lo..hi], first_line);

    let edit = flags.contains("-edit");
    let numbers = flags.contains("-numbers");
    log::debug!(
        "{}:{}: {} lines from {}",
        file_name,
        line,
        lines.len(),
        path.display()
    );

    Ok(Elem::Code(Code {
        text: render_lines(&lines, highlight, edit, numbers),
        play,
        edit,
        numbers,
        file_name: path.to_string_lossy().into_owned(),
        ext: path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
        raw: raw_code(&lines),
    }))
}

/// Byte range selected by `address`, before widening to whole lines
fn address_range(source: &[u8], address: &str) -> Result<(usize, usize), String> {
    if address.is_empty() {
        return Ok((0, source.len()));
    }
    let (first, second) = split_address(address);
    let (lo, hi) = resolve_address(source, first, 0)?;
    match second {
        None => Ok((lo, hi)),
        Some(second) => {
            let (_, end) = resolve_address(source, second, hi)?;
            if end < lo {
                return Err("range ends before it starts".to_string());
            }
            Ok((lo, end))
        }
    }
}

/// Split `a,b` at the first comma outside a `/regexp/`
fn split_address(address: &str) -> (&str, Option<&str>) {
    let mut in_regex = false;
    let mut escaped = false;
    for (i, c) in address.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '/' => in_regex = !in_regex,
            ',' if !in_regex => return (address[..i].trim(), Some(address[i + 1..].trim())),
            _ => {}
        }
    }
    (address.trim(), None)
}

fn resolve_address(
    source: &[u8],
    address: &str,
    from: usize,
) -> Result<(usize, usize), String> {
    if address == "$" {
        return Ok((source.len(), source.len()));
    }
    if let Some(pattern) = address
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
    {
        let re = bytes::Regex::new(&format!("(?m){}", pattern.replace("\\/", "/")))
            .map_err(|e| e.to_string())?;
        return re
            .find_at(source, from)
            .map(|m| (m.start(), m.end()))
            .ok_or_else(|| format!("no match for {}", address));
    }
    if let Ok(number) = address.parse::<usize>() {
        return line_range(source, number);
    }
    Err("unrecognized address".to_string())
}

/// Byte range of 1-based line `number`, including its newline
fn line_range(source: &[u8], number: usize) -> Result<(usize, usize), String> {
    if number == 0 {
        return Ok((0, 0));
    }
    let mut start = 0;
    for (i, line) in source.split_inclusive(|&b| b == b'\n').enumerate() {
        if i + 1 == number {
            return Ok((start, start + line.len()));
        }
        start += line.len();
    }
    Err(format!("line {} out of range", number))
}

fn widen_to_lines(src: &[u8], mut lo: usize, mut hi: usize) -> (usize, usize) {
    while lo > 0 && src[lo - 1] != b'\n' {
        lo -= 1;
    }
    if hi > 0 {
        while hi < src.len() && src[hi - 1] != b'\n' {
            hi += 1;
        }
    }
    (lo, hi)
}

/// Split the selection into numbered lines
///
/// `OMIT` lines are dropped but still count toward numbering. Leading and
/// trailing blank lines are trimmed. A `\r` before a line break is dropped.
fn select_lines(selection: &[u8], first_line: usize) -> Vec<CodeLine> {
    let selection = selection.strip_suffix(b"\n").unwrap_or(selection);
    if selection.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<CodeLine> = selection
        .split(|&b| b == b'\n')
        .map(|text| text.strip_suffix(b"\r").unwrap_or(text))
        .enumerate()
        .filter(|(_, text)| !text.ends_with(b"OMIT"))
        .map(|(i, text)| match highlight_comment_regex().captures(text) {
            Some(caps) => CodeLine {
                number: first_line + i,
                text: caps[1].to_vec(),
                highlight: String::from_utf8_lossy(&caps[2]).into_owned(),
            },
            None => CodeLine {
                number: first_line + i,
                text: text.to_vec(),
                highlight: String::new(),
            },
        })
        .collect();

    let leading = lines.iter().take_while(|l| l.text.is_empty()).count();
    lines.drain(..leading);
    while lines.last().is_some_and(|l| l.text.is_empty()) {
        lines.pop();
    }
    lines
}

fn render_lines(lines: &[CodeLine], highlight: &str, edit: bool, numbers: bool) -> String {
    let mut html = String::from("<pre");
    if edit {
        html.push_str(r#" contenteditable="true" spellcheck="false""#);
    }
    if numbers {
        html.push_str(r#" class="numbers""#);
    }
    html.push('>');
    for line in lines {
        let text = String::from_utf8_lossy(&line.text);
        html.push_str(&format!("<span num=\"{}\">", line.number));
        if !highlight.is_empty() && line.highlight == highlight {
            let body = text.trim_start();
            let indent = &text[..text.len() - body.len()];
            html.push_str(&escape_html(indent));
            html.push_str("<b>");
            html.push_str(&escape_html(body.trim_end()));
            html.push_str("</b>");
        } else {
            html.push_str(&escape_html(&text));
        }
        html.push_str("</span>\n");
    }
    html.push_str("</pre>");
    html
}

fn raw_code(lines: &[CodeLine]) -> Vec<u8> {
    let mut raw = Vec::new();
    for line in lines {
        raw.extend_from_slice(&line.text);
        raw.push(b'\n');
    }
    raw
}
