use crate::model::{Elem, Link};
use crate::parser::{Context, ParseError};
use itertools::Itertools;

/// `.link url [label...]`
///
/// Without a label the URL is shown with its scheme prefix removed.
pub fn parse_link(
    _ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let mut args = text.split_whitespace().skip(1);
    let url = args.next().ok_or_else(|| {
        ParseError::malformed(file_name, line, "link element must contain the URL")
    })?;
    let label = args.join(" ");
    let label = if label.is_empty() {
        default_label(url).map_err(|e| {
            ParseError::malformed(file_name, line, format!("invalid link URL {:?}: {}", url, e))
        })?
    } else {
        label
    };
    Ok(Elem::Link(Link {
        url: url.to_string(),
        label,
    }))
}

fn default_label(raw: &str) -> Result<String, url::ParseError> {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            let scheme = if parsed.scheme() == "mailto" {
                "mailto:".to_string()
            } else {
                format!("{}://", parsed.scheme())
            };
            Ok(raw.replacen(&scheme, "", 1))
        }
        // Relative links are shown as written.
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(raw.to_string()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryReader;

    fn link(text: &str) -> Result<Elem, ParseError> {
        parse_link(&Context::new(MemoryReader::new()), "a.slide", 7, text)
    }

    #[test]
    fn test_explicit_label() {
        assert_eq!(
            link(".link https://go.dev The Go site").unwrap(),
            Elem::Link(Link {
                url: "https://go.dev".to_string(),
                label: "The Go site".to_string(),
            })
        );
    }

    #[test]
    fn test_default_label_drops_scheme() {
        let Elem::Link(l) = link(".link https://go.dev/doc").unwrap() else {
            panic!("expected a link");
        };
        assert_eq!(l.label, "go.dev/doc");

        let Elem::Link(l) = link(".link mailto:gopher@go.dev").unwrap() else {
            panic!("expected a link");
        };
        assert_eq!(l.label, "gopher@go.dev");
    }

    #[test]
    fn test_relative_link() {
        let Elem::Link(l) = link(".link ../other.slide").unwrap() else {
            panic!("expected a link");
        };
        assert_eq!(l.label, "../other.slide");
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(
            link(".link"),
            Err(ParseError::MalformedCommandArgs { line: 7, .. })
        ));
    }
}
