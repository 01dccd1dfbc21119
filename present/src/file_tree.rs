//! Directory tree of presentation files
//!
//! A [`File`] tree lists the `.slide` and `.article` documents below a root
//! directory. Nodes can cache their parsed [`Doc`]; the cache stays on the
//! server side and is never part of the JSON listing.

use crate::model::{encoding, Doc, EncodingError};
use crate::parser::{Context, ParseError, ParseMode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Extensions of files that are parsed as documents
pub const DOC_EXTENSIONS: &[&str] = &["slide", "article"];

/// Errors that can occur while building or loading a file tree
#[derive(Error, Debug)]
pub enum FileTreeError {
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to open {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// A node of the document listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub is_dir: bool,
    pub children: Vec<File>,
    /// Path relative to the tree root, `/`-separated; empty for the root
    pub name: String,
    /// Parsed document, filled by [`File::load_docs`]
    #[serde(skip)]
    pub doc: Option<Doc>,
}

impl File {
    pub fn path(&self) -> &str {
        &self.name
    }

    /// Last path component
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Absolute URL path of the node, e.g. `/talks/intro.slide`
    pub fn url(&self) -> String {
        format!("/{}", self.name)
    }

    /// Build the tree of documents below `root`
    ///
    /// Entries are sorted by name. Hidden entries are skipped, as are
    /// directories that contain no documents.
    pub fn walk(root: &Path) -> Result<File, FileTreeError> {
        // Open directories from the root down; stack[d] is at depth d.
        let mut stack = vec![File {
            is_dir: true,
            ..File::default()
        }];

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            while stack.len() > entry.depth() {
                close_dir(&mut stack);
            }

            let name = relative_name(root, entry.path());
            if entry.file_type().is_dir() {
                stack.push(File {
                    is_dir: true,
                    name,
                    ..File::default()
                });
            } else if is_document(entry.path()) {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(File {
                        name,
                        ..File::default()
                    });
                }
            }
        }
        while stack.len() > 1 {
            close_dir(&mut stack);
        }

        let tree = stack.pop().unwrap_or_default();
        log::debug!(
            "{}: {} documents",
            root.display(),
            tree.documents().len()
        );
        Ok(tree)
    }

    /// Every document node of the tree, in listing order
    pub fn documents(&self) -> Vec<&File> {
        let mut out = Vec::new();
        collect_documents(self, &mut out);
        out
    }

    /// Parse every document below `root` and cache it on its node
    ///
    /// Documents are parsed in parallel when the `parallel` feature is on.
    /// The first failure is returned; nodes parsed before it keep their doc.
    pub fn load_docs(
        &mut self,
        root: &Path,
        ctx: &Context,
        mode: ParseMode,
    ) -> Result<(), FileTreeError> {
        let mut files = Vec::new();
        collect_documents_mut(self, &mut files);
        log::debug!("parsing {} documents under {}", files.len(), root.display());

        #[cfg(feature = "parallel")]
        files
            .into_par_iter()
            .try_for_each(|file| load_doc(file, root, ctx, mode))?;

        #[cfg(not(feature = "parallel"))]
        files
            .into_iter()
            .try_for_each(|file| load_doc(file, root, ctx, mode))?;

        Ok(())
    }

    /// Map of URL to node for every node in the tree
    pub fn index(&self) -> HashMap<String, &File> {
        let mut index = HashMap::new();
        add_to_index(self, &mut index);
        index
    }

    /// Pretty JSON listing of the tree, without cached documents
    pub fn to_json(&self) -> Result<String, EncodingError> {
        encoding::to_json(self)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOC_EXTENSIONS.contains(&ext))
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .join("/")
}

/// Pop the innermost open directory and attach it to its parent if it
/// holds any documents
fn close_dir(stack: &mut Vec<File>) {
    if let Some(dir) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            if !dir.children.is_empty() {
                parent.children.push(dir);
            }
        }
    }
}

fn collect_documents<'a>(file: &'a File, out: &mut Vec<&'a File>) {
    if file.is_dir {
        for child in &file.children {
            collect_documents(child, out);
        }
    } else {
        out.push(file);
    }
}

fn collect_documents_mut<'a>(file: &'a mut File, out: &mut Vec<&'a mut File>) {
    if file.is_dir {
        for child in &mut file.children {
            collect_documents_mut(child, out);
        }
    } else {
        out.push(file);
    }
}

fn add_to_index<'a>(file: &'a File, index: &mut HashMap<String, &'a File>) {
    index.insert(file.url(), file);
    for child in &file.children {
        add_to_index(child, index);
    }
}

fn load_doc(
    file: &mut File,
    root: &Path,
    ctx: &Context,
    mode: ParseMode,
) -> Result<(), FileTreeError> {
    let path = root.join(&file.name);
    let input = std::fs::File::open(&path).map_err(|source| FileTreeError::Io {
        path: path.clone(),
        source,
    })?;
    let doc = ctx
        .parse(input, &path.to_string_lossy(), mode)
        .map_err(|source| FileTreeError::Parse {
            path: path.clone(),
            source,
        })?;
    file.doc = Some(doc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "talks/b.article", "Second\n\nAuthor\n\n* One\n\nbody\n");
        write(root, "talks/a.slide", "First\n\nAuthor\n\n* One\n\n.code snippet.go\n");
        write(root, "talks/snippet.go", "package main\n");
        write(root, "intro.slide", "Intro\n\nAuthor\n\n* Start\n");
        write(root, "notes.txt", "not a document");
        write(root, ".drafts/secret.slide", "Secret\n\nAuthor\n\n* S\n");
        fs::create_dir_all(root.join("empty")).unwrap();
        dir
    }

    #[test]
    fn test_walk_lists_documents_sorted() {
        let dir = fixture();
        let tree = File::walk(dir.path()).unwrap();

        assert!(tree.is_dir);
        assert_eq!(tree.url(), "/");
        let names: Vec<&str> = tree.children.iter().map(File::path).collect();
        assert_eq!(names, vec!["intro.slide", "talks"]);

        let talks = &tree.children[1];
        assert!(talks.is_dir);
        let names: Vec<&str> = talks.children.iter().map(File::base_name).collect();
        assert_eq!(names, vec!["a.slide", "b.article"]);
        assert_eq!(talks.children[0].url(), "/talks/a.slide");
    }

    #[test]
    fn test_index_by_url() {
        let dir = fixture();
        let tree = File::walk(dir.path()).unwrap();
        let index = tree.index();
        assert!(index.contains_key("/talks/b.article"));
        assert!(index["/talks"].is_dir);
        assert!(!index.contains_key("/.drafts/secret.slide"));
        assert!(!index.contains_key("/empty"));
    }

    #[test]
    fn test_load_docs_caches_parsed_documents() {
        let dir = fixture();
        let mut tree = File::walk(dir.path()).unwrap();
        let ctx = Context::default();
        tree.load_docs(dir.path(), &ctx, ParseMode::Full).unwrap();

        let titles: Vec<&str> = tree
            .documents()
            .into_iter()
            .filter_map(|f| f.doc.as_ref())
            .map(|d| d.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Intro", "First", "Second"]);
    }

    #[test]
    fn test_json_omits_cached_doc() {
        let dir = fixture();
        let mut tree = File::walk(dir.path()).unwrap();
        tree.load_docs(dir.path(), &Context::default(), ParseMode::TitlesOnly)
            .unwrap();

        let json = tree.to_json().unwrap();
        assert!(json.contains("\"name\": \"talks/a.slide\""));
        assert!(json.contains("\"is_dir\": true"));
        assert!(!json.contains("First"));
        assert!(!json.contains("\"doc\""));

        let listed: File = serde_json::from_str(&json).unwrap();
        assert!(listed.documents().iter().all(|f| f.doc.is_none()));
    }

    #[test]
    fn test_parse_failure_names_file() {
        let dir = fixture();
        write(dir.path(), "broken.slide", "Broken\n\nAuthor\n\n* One\n\n.nosuchcmd\n");
        let mut tree = File::walk(dir.path()).unwrap();
        let err = tree
            .load_docs(dir.path(), &Context::default(), ParseMode::Full)
            .unwrap_err();
        match err {
            FileTreeError::Parse { path, source } => {
                assert!(path.ends_with("broken.slide"));
                assert!(matches!(source, ParseError::UnknownCommand { line: 7, .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
