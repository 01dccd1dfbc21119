//! `.image`, `.iframe` and `.video`

use crate::model::{Elem, Iframe, Image, Video};
use crate::parser::{Context, ParseError};

/// `.image url [height width]`
pub fn parse_image(
    _ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() < 2 {
        return Err(invocation_error(file_name, line, "image", text));
    }
    let (height, width) = dimensions(&args[2..])
        .ok_or_else(|| invocation_error(file_name, line, "image", text))?;
    Ok(Elem::Image(Image {
        url: args[1].to_string(),
        width,
        height,
    }))
}

/// `.iframe url [height width]`
pub fn parse_iframe(
    _ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() < 2 {
        return Err(invocation_error(file_name, line, "iframe", text));
    }
    let (height, width) = dimensions(&args[2..])
        .ok_or_else(|| invocation_error(file_name, line, "iframe", text))?;
    Ok(Elem::Iframe(Iframe {
        url: args[1].to_string(),
        width,
        height,
    }))
}

/// `.video url source-type [height width]`
pub fn parse_video(
    _ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() < 3 {
        return Err(invocation_error(file_name, line, "video", text));
    }
    let (height, width) = dimensions(&args[3..])
        .ok_or_else(|| invocation_error(file_name, line, "video", text))?;
    Ok(Elem::Video(Video {
        url: args[1].to_string(),
        source_type: args[2].to_string(),
        width,
        height,
    }))
}

/// Optional `height width` pair; `_` leaves a dimension unset
fn dimensions(args: &[&str]) -> Option<(Option<u32>, Option<u32>)> {
    match args {
        [] => Some((None, None)),
        [height, width] => Some((dimension(height)?, dimension(width)?)),
        _ => None,
    }
}

fn dimension(arg: &str) -> Option<Option<u32>> {
    if arg == "_" {
        return Some(None);
    }
    arg.parse().ok().map(Some)
}

fn invocation_error(file_name: &str, line: usize, kind: &str, text: &str) -> ParseError {
    ParseError::malformed(file_name, line, format!("incorrect {} invocation: {:?}", kind, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryReader;

    fn ctx() -> Context {
        Context::new(MemoryReader::new())
    }

    #[test]
    fn test_image_without_size() {
        let elem = parse_image(&ctx(), "a.slide", 1, ".image gopher.png").unwrap();
        assert_eq!(
            elem,
            Elem::Image(Image {
                url: "gopher.png".to_string(),
                width: None,
                height: None,
            })
        );
    }

    #[test]
    fn test_image_height_then_width() {
        let elem = parse_image(&ctx(), "a.slide", 1, ".image gopher.png 300 _").unwrap();
        assert_eq!(
            elem,
            Elem::Image(Image {
                url: "gopher.png".to_string(),
                width: None,
                height: Some(300),
            })
        );
    }

    #[test]
    fn test_image_bad_arity() {
        assert!(parse_image(&ctx(), "a.slide", 1, ".image").is_err());
        assert!(parse_image(&ctx(), "a.slide", 1, ".image a.png 100").is_err());
        assert!(parse_image(&ctx(), "a.slide", 1, ".image a.png tall wide").is_err());
    }

    #[test]
    fn test_iframe() {
        let elem = parse_iframe(&ctx(), "a.slide", 1, ".iframe https://go.dev 600 800").unwrap();
        assert_eq!(
            elem,
            Elem::Iframe(Iframe {
                url: "https://go.dev".to_string(),
                width: Some(800),
                height: Some(600),
            })
        );
    }

    #[test]
    fn test_video() {
        let elem = parse_video(&ctx(), "a.slide", 1, ".video demo.webm video/webm").unwrap();
        assert_eq!(
            elem,
            Elem::Video(Video {
                url: "demo.webm".to_string(),
                source_type: "video/webm".to_string(),
                width: None,
                height: None,
            })
        );
        assert!(parse_video(&ctx(), "a.slide", 1, ".video demo.webm").is_err());
    }
}
