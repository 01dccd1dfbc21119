//! Text-to-document parser
//!
//! Parsing runs in one synchronous pass over the input lines:
//! 1. **Header**: title, subtitle, time and tags
//! 2. **Authors**: blank-separated contact blocks
//! 3. **Sections**: recursive descent over `*`-headings, dispatching
//!    dot-commands through the [`Registry`]
//!
//! A [`Context`] bundles the registry with a [`FileReader`] used by commands
//! that pull in other files. A context is not mutated while parsing, so one
//! context can serve any number of concurrent parses.

use crate::model::{Doc, SectionNumber};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Submodules
mod error;
mod header;
mod lines;
mod registry;
mod sections;

// Re-export public types
pub use error::{ParseError, ParseStage};
pub use lines::Lines;
pub use registry::{ParseFn, Registry};

/// Source of the files referenced by dot-commands
pub trait FileReader: Send + Sync {
    /// Read the whole file at `path`
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Serves files from memory, keyed by path
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning the reader for chaining
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileReader for MemoryReader {
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// How much of a document to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Header, authors and sections
    #[default]
    Full,
    /// Only the title block (title, subtitle, time, tags, title notes)
    TitlesOnly,
}

/// Supporting context for parsing a document
#[derive(Clone)]
pub struct Context {
    reader: Arc<dyn FileReader>,
    registry: Registry,
}

impl Context {
    /// Create a context with the built-in commands
    pub fn new<R: FileReader + 'static>(reader: R) -> Self {
        Self::with_registry(reader, Registry::with_builtins())
    }

    /// Create a context with a caller-supplied command registry
    pub fn with_registry<R: FileReader + 'static>(reader: R, registry: Registry) -> Self {
        Self {
            reader: Arc::new(reader),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registering commands before parsing starts
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Path of `reference` relative to the directory of document `doc_name`
    pub fn resolve(&self, doc_name: &str, reference: &str) -> PathBuf {
        Path::new(doc_name)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(reference)
    }

    /// Read an asset referenced from line `line` of document `doc_name`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - File contents
    /// * `Err(ParseError::AssetRead)` - The reader failed; this aborts the parse
    pub fn read_file(
        &self,
        doc_name: &str,
        line: usize,
        path: &Path,
    ) -> Result<Vec<u8>, ParseError> {
        log::debug!("{}:{}: reading asset {}", doc_name, line, path.display());
        self.reader
            .read_file(path)
            .map_err(|source| ParseError::AssetRead {
                file: doc_name.to_string(),
                line,
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse a document from a reader
    ///
    /// # Parameters
    /// * `input` - UTF-8 document text
    /// * `name` - Document name, used in error messages and to resolve
    ///   files referenced by commands
    /// * `mode` - Whether to stop after the title block
    ///
    /// # Returns
    /// * `Ok(Doc)` - The parsed document
    /// * `Err(ParseError)` - The first fatal error; no partial document is kept
    pub fn parse<R: Read>(
        &self,
        mut input: R,
        name: &str,
        mode: ParseMode,
    ) -> Result<Doc, ParseError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.parse_str(&text, name, mode)
    }

    /// Parse a document held in memory
    pub fn parse_str(&self, input: &str, name: &str, mode: ParseMode) -> Result<Doc, ParseError> {
        let mut lines = Lines::from_text(input);
        let mut doc = Doc {
            title_notes: header::title_notes(lines.raw()),
            ..Doc::default()
        };

        header::parse_header(&mut doc, &mut lines)?;
        if mode == ParseMode::TitlesOnly {
            return Ok(doc);
        }

        doc.authors = header::parse_authors(&mut lines)?;
        doc.sections =
            sections::parse_sections(self, name, &mut lines, &SectionNumber::default())?;

        log::debug!(
            "{}: parsed {:?} with {} authors and {} sections",
            name,
            doc.title,
            doc.authors.len(),
            doc.section_count()
        );
        Ok(doc)
    }
}

impl Default for Context {
    /// Filesystem reader with the built-in commands
    fn default() -> Self {
        Self::new(FsReader)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Parse a document from `input`, reading referenced files from disk
pub fn parse<R: Read>(input: R, name: &str, mode: ParseMode) -> Result<Doc, ParseError> {
    Context::default().parse(input, name, mode)
}

/// Read and parse the document at `path`
pub fn parse_file(path: &Path, mode: ParseMode) -> Result<Doc, ParseError> {
    let file = std::fs::File::open(path)?;
    Context::default().parse(file, &path.to_string_lossy(), mode)
}

/// Speaker notes start with a colon and a space
pub(crate) fn is_speaker_note(text: &str) -> bool {
    text.starts_with(": ")
}
