use crate::model::{Caption, Elem};
use crate::parser::{Context, ParseError};

/// `.caption text`
pub fn parse_caption(
    _ctx: &Context,
    _file_name: &str,
    _line: usize,
    text: &str,
) -> Result<Elem, ParseError> {
    let text = text.strip_prefix(".caption").unwrap_or(text).trim();
    Ok(Elem::Caption(Caption {
        text: text.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryReader;

    #[test]
    fn test_caption_trims_command() {
        let ctx = Context::new(MemoryReader::new());
        let elem = parse_caption(&ctx, "a.slide", 1, ".caption   The _Go_ gopher  ").unwrap();
        assert_eq!(
            elem,
            Elem::Caption(Caption {
                text: "The _Go_ gopher".to_string()
            })
        );
    }
}
