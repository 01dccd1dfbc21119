//! Rendering options from present.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up next to the documents
pub const CONFIG_FILE_NAME: &str = "present.toml";

/// How a document is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One continuous page with a table of contents
    #[default]
    Article,
    /// One `<article>` per top-level section
    Slides,
}

impl RenderMode {
    /// Mode implied by a document's extension: `.slide` files are slides
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("slide") => RenderMode::Slides,
            _ => RenderMode::Article,
        }
    }
}

/// Rendering options
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Layout; `None` picks one from the document's extension
    pub mode: Option<RenderMode>,

    /// Render speaker notes
    pub notes_enabled: bool,

    /// Mark `.play` snippets as runnable
    pub play_enabled: bool,

    /// Stylesheet linked instead of the built-in styles
    pub stylesheet: Option<String>,
}

impl RenderConfig {
    /// Load configuration from a present.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RenderConfig)` - Successfully loaded configuration
    /// * `Err(RenderConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RenderConfigError> {
        let content = fs::read_to_string(&path).map_err(RenderConfigError::IoError)?;

        let config: RenderConfig =
            toml::from_str(&content).map_err(RenderConfigError::ParseError)?;

        Ok(config)
    }

    /// Load `present.toml` from `dir` if there is one, defaults otherwise
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, RenderConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("loading {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a present.toml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderConfigError> {
        let content = toml::to_string_pretty(self).map_err(RenderConfigError::SerializeError)?;

        fs::write(&path, content).map_err(RenderConfigError::IoError)?;

        Ok(())
    }

    /// Layout for the document at `path`
    pub fn mode_for(&self, path: &Path) -> RenderMode {
        self.mode.unwrap_or_else(|| RenderMode::for_path(path))
    }
}

/// Errors that can occur when loading or saving render configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum RenderConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for RenderConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderConfigError::IoError(e) => write!(f, "IO error: {}", e),
            RenderConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            RenderConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for RenderConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config: RenderConfig = toml::from_str("").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert!(!config.notes_enabled);
        assert!(!config.play_enabled);
    }

    #[test]
    fn test_parse_example_toml() {
        let config: RenderConfig = toml::from_str(
            r#"
mode = "slides"
notes_enabled = true
stylesheet = "theme.css"
"#,
        )
        .unwrap();

        assert_eq!(config.mode, Some(RenderMode::Slides));
        assert!(config.notes_enabled);
        assert!(!config.play_enabled);
        assert_eq!(config.stylesheet.as_deref(), Some("theme.css"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            mode: Some(RenderMode::Article),
            notes_enabled: false,
            play_enabled: true,
            stylesheet: None,
        };
        config.save(dir.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(RenderConfig::discover(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            RenderConfig::discover(dir.path()).unwrap(),
            RenderConfig::default()
        );
    }

    #[test]
    fn test_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "mode = \"poster\"").unwrap();
        assert!(matches!(
            RenderConfig::load(&path),
            Err(RenderConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_mode_from_extension() {
        let config = RenderConfig::default();
        assert_eq!(config.mode_for(Path::new("talk.slide")), RenderMode::Slides);
        assert_eq!(config.mode_for(Path::new("post.article")), RenderMode::Article);
    }
}
