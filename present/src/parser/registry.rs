//! Dot-command registry
//!
//! Maps a command name (`code`, `image`, ...) to the function that turns a
//! command line into an [`Elem`]. Built-in commands are registered through
//! the same [`Registry::register`] call as user commands.

use super::{Context, ParseError};
use crate::model::Elem;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handler for one dot-command
///
/// Called with the parse context, the name of the document being parsed, the
/// 1-based line number of the command and the full command line.
pub type ParseFn =
    Arc<dyn Fn(&Context, &str, usize, &str) -> Result<Elem, ParseError> + Send + Sync>;

/// Name to handler map for dot-commands
#[derive(Clone, Default)]
pub struct Registry {
    parsers: HashMap<String, ParseFn>,
}

impl Registry {
    /// Create a registry with no commands
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in command
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        crate::commands::register_builtins(&mut registry);
        registry
    }

    /// Bind `name` (without the leading period) to a handler
    ///
    /// A later registration under the same name replaces the earlier one.
    ///
    /// # Parameters
    /// * `name` - Command name as it appears after the period, e.g. `"image"`
    /// * `parser` - Function producing the element for a command line
    ///
    /// # Returns
    /// * `Ok(&mut Registry)` - The registry, for chaining
    /// * `Err(ParseError::InvalidCommandName)` - Name is empty, starts with a
    ///   period or contains whitespace
    pub fn register<F>(&mut self, name: &str, parser: F) -> Result<&mut Self, ParseError>
    where
        F: Fn(&Context, &str, usize, &str) -> Result<Elem, ParseError> + Send + Sync + 'static,
    {
        if name.is_empty() || name.starts_with('.') || name.contains(char::is_whitespace) {
            return Err(ParseError::InvalidCommandName(name.to_string()));
        }
        self.insert(name, Arc::new(parser));
        Ok(self)
    }

    /// Store a handler under a name already known to be valid
    pub(crate) fn insert(&mut self, name: &str, parser: ParseFn) {
        if self.parsers.insert(format!(".{}", name), parser).is_some() {
            log::debug!("replacing handler for command .{}", name);
        }
    }

    /// Handler for a command as written in the document, period included
    pub fn get(&self, command: &str) -> Option<&ParseFn> {
        self.parsers.get(command)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.parsers.contains_key(command)
    }

    /// Registered command names, period included, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.names())
            .finish()
    }
}
