//! present - parser and renderer for presentation documents
//!
//! Slide decks and articles are written in a line-oriented plain-text
//! format: a title block, author blocks, then `*`-headed sections holding
//! prose, bullets, preformatted blocks and dot-commands such as `.code` or
//! `.image`. [`parse`] turns such a document into a [`Doc`] tree, which can
//! be encoded with [`encode`] or rendered with [`html_renderer`].
//!
//! ```
//! use present::{Context, MemoryReader, ParseMode};
//!
//! let ctx = Context::new(MemoryReader::new());
//! let doc = ctx
//!     .parse_str("Hello\n\nGopher\n\n* One\n\nSome _text_.\n", "hello.slide", ParseMode::Full)
//!     .unwrap();
//! assert_eq!(doc.sections[0].title, "One");
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod commands;
pub mod file_tree;
pub mod html_renderer;
pub mod model;
pub mod parser;
pub mod render_config;
pub mod style;

pub use model::encoding::{decode, decode_from, encode, encode_to};
pub use model::{Author, Doc, Elem, EncodingError, Section, SectionNumber};
pub use parser::{
    parse, parse_file, Context, FileReader, FsReader, MemoryReader, ParseError, ParseFn,
    ParseMode, Registry,
};
pub use render_config::{RenderConfig, RenderMode};
pub use style::style;
