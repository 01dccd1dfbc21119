use crate::model::{Elem, Html};
use crate::parser::{Context, ParseError};

/// `.html file`: embed a trusted HTML file verbatim
pub fn parse_html(
    ctx: &Context,
    file_name: &str,
    line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() != 2 {
        return Err(ParseError::malformed(file_name, line, "invalid .html args"));
    }
    let path = ctx.resolve(file_name, args[1]);
    let bytes = ctx.read_file(file_name, line, &path)?;
    Ok(Elem::Html(Html {
        html: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}
