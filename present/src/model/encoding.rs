//! Wire encodings of the document model
//!
//! Two independent encodings are provided:
//! - a binary encoding of a whole [`Doc`] (bincode), used to hand a parsed
//!   document from one process to another with every element variant intact
//! - a JSON projection for sidecar structures such as the file tree, which
//!   relies on `#[serde(skip)]` to leave server-only fields out

use super::Doc;
use serde::Serialize;
use std::io::{Read, Write};
use thiserror::Error;

/// Errors raised while encoding or decoding documents
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a document to bytes
pub fn encode(doc: &Doc) -> Result<Vec<u8>, EncodingError> {
    Ok(bincode::serialize(doc)?)
}

/// Decode a document previously produced by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<Doc, EncodingError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Encode a document into a writer
pub fn encode_to<W: Write>(writer: W, doc: &Doc) -> Result<(), EncodingError> {
    bincode::serialize_into(writer, doc)?;
    Ok(())
}

/// Decode a document from a reader
pub fn decode_from<R: Read>(reader: R) -> Result<Doc, EncodingError> {
    Ok(bincode::deserialize_from(reader)?)
}

/// Render any serializable sidecar value as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodingError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Code, Elem, Image, Link, List, Section, SectionNumber};
    use chrono::TimeZone;

    fn sample_doc() -> Doc {
        let nested = Section {
            number: SectionNumber::new(vec![1, 1]),
            title: "Nested".to_string(),
            elems: vec![Elem::List(List {
                bullets: vec!["one".to_string(), "two".to_string()],
            })],
            ..Section::default()
        };
        Doc {
            title: "Title".to_string(),
            subtitle: "Sub".to_string(),
            time: Some(chrono::Utc.with_ymd_and_hms(2013, 3, 5, 11, 0, 0).unwrap()),
            authors: vec![Author {
                elems: vec![
                    Elem::text(["Jane"]),
                    Elem::Link(Link {
                        url: "mailto:jane@example.com".to_string(),
                        label: "jane@example.com".to_string(),
                    }),
                ],
            }],
            title_notes: vec!["note".to_string()],
            sections: vec![Section {
                number: SectionNumber::new(vec![1]),
                title: "First".to_string(),
                elems: vec![
                    Elem::Code(Code {
                        text: "<pre></pre>".to_string(),
                        play: true,
                        raw: b"fn main() {}\n".to_vec(),
                        ext: ".rs".to_string(),
                        ..Code::default()
                    }),
                    Elem::Image(Image {
                        url: "a.png".to_string(),
                        width: Some(10),
                        height: None,
                    }),
                    Elem::Section(nested),
                ],
                notes: vec!["speak".to_string()],
                classes: vec!["background".to_string()],
                styles: vec!["background-image: url('a.png')".to_string()],
            }],
            tags: vec!["go".to_string(), "go".to_string()],
        }
    }

    #[test]
    fn test_binary_preserves_every_variant() {
        let doc = sample_doc();
        let bytes = encode(&doc).unwrap();
        assert_eq!(decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn test_stream_encoding() {
        let doc = sample_doc();
        let mut buf = Vec::new();
        encode_to(&mut buf, &doc).unwrap();
        let decoded = decode_from(buf.as_slice()).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(&[0xff, 0x01]).is_err());
    }
}
