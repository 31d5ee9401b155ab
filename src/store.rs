//! Language files on disk.
//!
//! A [`LanguageFile`] is one `<language>.json` loaded into a [`Tree`]. Saving
//! writes the whole file atomically and keeps the original trailing newline,
//! so an untouched dictionary round-trips byte for byte when it was already
//! pretty-printed with two-space indentation.

use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::Error,
    traits::{Parser, read_text, write_atomic},
    tree::Tree,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFile {
    pub language: String,
    pub path: PathBuf,
    pub tree: Tree,
    trailing_newline: bool,
}

impl LanguageFile {
    /// Wraps an in-memory tree that will be written to `path`.
    pub fn new(language: impl Into<String>, path: impl Into<PathBuf>, tree: Tree) -> Self {
        Self {
            language: language.into(),
            path: path.into(),
            tree,
            trailing_newline: false,
        }
    }

    /// Reads and parses `path`. Errors are attributed to `language`.
    pub fn load(language: &str, path: &Path) -> Result<Self, Error> {
        let text = read_text(path).map_err(|e| e.in_language(language))?;
        let tree = Tree::from_str(&text).map_err(|e| e.in_language(language))?;
        tracing::debug!(
            language,
            path = %path.display(),
            leaves = tree.leaf_count(),
            "loaded language file"
        );
        Ok(Self {
            language: language.to_string(),
            path: path.to_path_buf(),
            tree,
            trailing_newline: text.ends_with('\n'),
        })
    }

    /// The exact file content [`LanguageFile::save`] would write.
    pub fn render(&self) -> Result<String, Error> {
        let mut text = self.tree.to_json_string()?;
        if self.trailing_newline {
            text.push('\n');
        }
        Ok(text)
    }

    /// Serializes fully in memory, then replaces the file atomically.
    pub fn save(&self) -> Result<(), Error> {
        let text = self.render().map_err(|e| e.in_language(&self.language))?;
        write_atomic(&self.path, text.as_bytes()).map_err(|e| e.in_language(&self.language))?;
        tracing::debug!(
            language = %self.language,
            path = %self.path.display(),
            "wrote language file"
        );
        Ok(())
    }
}

/// Access to the language files named by a [`Config`].
#[derive(Debug, Clone)]
pub struct LocaleStore {
    config: Config,
}

impl LocaleStore {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path_of(&self, language: &str) -> PathBuf {
        self.config.language_path(language)
    }

    pub fn load(&self, language: &str) -> Result<LanguageFile, Error> {
        LanguageFile::load(language, &self.path_of(language))
    }

    pub fn load_base(&self) -> Result<LanguageFile, Error> {
        self.load(&self.config.base_language)
    }
}
