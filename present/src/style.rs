//! Inline styling of prose
//!
//! [`style`] turns one line of user text into HTML: the text is escaped,
//! then `_italic_`, `*bold*` and `` `code` `` markers and `[[url][label]]`
//! links are expanded word by word. Malformed markup is left as literal
//! text; styling never fails.

/// Characters that may not appear in an inline link URL (RFC 2396, 2.4.3)
const BAD_URL_CHARS: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '[', ']', ' ', '`'];

/// Escape and style a fragment of text
///
/// # Example
/// ```
/// assert_eq!(present::style("a *bold* <move>"), "a <b>bold</b> &lt;move&gt;");
/// ```
pub fn style(text: &str) -> String {
    font(&escape_html(text))
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Apply font markers and links to already escaped text
fn font(text: &str) -> String {
    if !text.contains(['[', '`', '_', '*']) {
        return text.to_string();
    }
    split(text).into_iter().map(style_word).collect()
}

fn style_word(word: &str) -> String {
    if word.len() < 2 {
        return word.to_string();
    }
    if let Some(link) = parse_inline_link(word) {
        return link.render();
    }

    // Leading punctuation stays outside the tag.
    let Some(first) = word.find(['_', '*', '`']) else {
        return word.to_string();
    };
    if first != 0 && !word[..first].chars().next_back().is_some_and(is_punct) {
        return word.to_string();
    }
    let (open_punct, rest) = word.split_at(first);
    let marker = rest.as_bytes()[0];
    let (open_tag, close_tag) = match marker {
        b'_' => ("<i>", "</i>"),
        b'*' => ("<b>", "</b>"),
        _ => ("<code>", "</code>"),
    };

    // The closing marker ends the word or is followed by punctuation.
    let last = rest.rfind(marker as char).unwrap_or(0);
    if last == 0 {
        return word.to_string();
    }
    if last + 1 != rest.len() && !rest[last + 1..].chars().next().is_some_and(is_punct) {
        return word.to_string();
    }
    let (head, tail) = rest.split_at(last + 1);

    let mut out = String::with_capacity(word.len() + open_tag.len() + close_tag.len());
    out.push_str(open_punct);
    out.push_str(open_tag);
    let bytes = head.as_bytes();
    let mut i = 1;
    while i < head.len() - 1 {
        let Some(c) = head[i..].chars().next() else {
            break;
        };
        if c != marker as char {
            out.push(c);
            i += c.len_utf8();
        } else if bytes[i + 1] != marker {
            // A lone inner marker reads as a space, a doubled one as itself.
            out.push(' ');
            i += 1;
        } else {
            out.push(c);
            i += 2;
        }
    }
    out.push_str(close_tag);
    out.push_str(tail);
    out
}

/// Split into words and whitespace runs
///
/// An inline link is always its own word, even when it starts mid-word or
/// contains spaces in its label.
fn split(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut was_space = false;
    for (i, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        if i > start && is_space != was_space {
            push_word(text, &mut words, &mut start, i);
        }
        was_space = is_space;
    }
    while start < text.len() {
        push_word(text, &mut words, &mut start, text.len());
    }
    words
}

fn push_word<'a>(text: &'a str, words: &mut Vec<&'a str>, start: &mut usize, end: usize) {
    if let Some(offset) = text[*start..end].find("[[") {
        let link_start = *start + offset;
        if let Some(link) = parse_inline_link(&text[link_start..]) {
            if offset > 0 {
                words.push(&text[*start..link_start]);
            }
            words.push(&text[link_start..link_start + link.len]);
            *start = link_start + link.len;
            return;
        }
    }
    words.push(&text[*start..end]);
    *start = end;
}

/// A `[[url]]` or `[[url][label]]` at the start of some text
#[derive(Debug, PartialEq)]
struct InlineLink<'a> {
    url: &'a str,
    label: Option<&'a str>,
    /// Bytes consumed, including the brackets
    len: usize,
}

fn parse_inline_link(text: &str) -> Option<InlineLink<'_>> {
    if !text.starts_with("[[") {
        return None;
    }
    let end = text.find("]]")?;
    let url_end = text.find(']')?;
    let url = &text[2..url_end];
    if url.contains(BAD_URL_CHARS) {
        return None;
    }
    let label = if url_end == end {
        None
    } else if text[url_end..].starts_with("][") {
        Some(&text[url_end + 2..end])
    } else {
        return None;
    };
    Some(InlineLink {
        url,
        label,
        len: end + 2,
    })
}

impl InlineLink<'_> {
    fn render(&self) -> String {
        // An empty text makes the anchor show the raw href.
        let text = match self.label {
            Some(label) => font(label),
            None => display_url(self.url).map(font).unwrap_or_default(),
        };
        render_link(self.url, &text)
    }
}

/// A URL without its `scheme://` or `scheme:` prefix, `None` if there is
/// no scheme to strip
fn display_url(url: &str) -> Option<&str> {
    let parsed = url::Url::parse(url).ok()?;
    let scheme = parsed.scheme();
    url.strip_prefix(&format!("{}://", scheme))
        .or_else(|| url.strip_prefix(&format!("{}:", scheme)))
}

/// Render an anchor; absolute links open in a new window
fn render_link(href: &str, text: &str) -> String {
    let text = if text.is_empty() { href } else { text };
    let target = match url::Url::parse(href) {
        Ok(parsed) if parsed.scheme() == "javascript" => "_self",
        Ok(_) => "_blank",
        Err(url::ParseError::RelativeUrlWithoutBase) => "_self",
        Err(e) => {
            log::warn!("inline link {:?}: {}", href, e);
            "_blank"
        }
    };
    format!(r#"<a href="{}" target="{}">{}</a>"#, href, target, text)
}

/// Unicode general category P, for the characters prose actually uses
fn is_punct(c: char) -> bool {
    matches!(
        c,
        '!' | '"'
            | '#'
            | '%'..='*'
            | ','..='/'
            | ':'
            | ';'
            | '?'
            | '@'
            | '['..=']'
            | '_'
            | '{'
            | '}'
            | '\u{a1}'
            | '\u{a7}'
            | '\u{ab}'
            | '\u{b6}'
            | '\u{b7}'
            | '\u{bb}'
            | '\u{bf}'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{2043}'
            | '\u{2045}'..='\u{2051}'
            | '\u{2053}'..='\u{205e}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
    )
}
