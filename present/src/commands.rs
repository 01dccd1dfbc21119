//! Built-in dot-commands
//!
//! Each handler turns one command line into an [`Elem`](crate::model::Elem).
//! They are registered through the same registry call available to users;
//! see [`Registry::register`](crate::parser::Registry::register).

use crate::parser::{ParseFn, Registry};
use std::sync::Arc;

mod caption;
mod code;
mod html;
mod link;
mod media;

pub use caption::parse_caption;
pub use code::parse_code;
pub use html::parse_html;
pub use link::parse_link;
pub use media::{parse_iframe, parse_image, parse_video};

/// Add every built-in command to `registry`
pub(crate) fn register_builtins(registry: &mut Registry) {
    let builtins: [(&str, ParseFn); 8] = [
        ("caption", Arc::new(parse_caption)),
        ("code", Arc::new(parse_code)),
        ("play", Arc::new(parse_code)),
        ("html", Arc::new(parse_html)),
        ("image", Arc::new(parse_image)),
        ("iframe", Arc::new(parse_iframe)),
        ("video", Arc::new(parse_video)),
        ("link", Arc::new(parse_link)),
    ];
    for (name, parser) in builtins {
        registry.insert(name, parser);
    }
}
