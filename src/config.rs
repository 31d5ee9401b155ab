//! Run configuration: where the language files live and which languages to process.
//!
//! Values come from built-in defaults, optionally replaced by a `locsync.toml`
//! file:
//!
//! ```toml
//! locales_dir = "client/src/locales"
//! base_language = "it"
//! target_languages = ["en", "fr", "de"]
//! placeholder_marker = "[NEEDS TRANSLATION]"
//! ```

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    reconcile::{PLACEHOLDER_MARKER, ReconcileOptions},
};

/// File name looked up in the working directory when no config path is given.
pub const CONFIG_FILE_NAME: &str = "locsync.toml";

/// Extension of every language file.
pub const LANGUAGE_FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one `<language>.json` per language.
    pub locales_dir: PathBuf,
    /// Language whose key set every other language must match.
    pub base_language: String,
    /// Languages reconciled against the base.
    pub target_languages: Vec<String>,
    /// Tag prefixed onto copied base text.
    pub placeholder_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales_dir: PathBuf::from("./client/src/locales"),
            base_language: "it".to_string(),
            target_languages: ["en", "fr", "de", "es", "ru", "nl", "no", "ro"]
                .into_iter()
                .map(String::from)
                .collect(),
            placeholder_marker: PLACEHOLDER_MARKER.to_string(),
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a config file. A relative `locales_dir` is resolved against the
    /// directory containing the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if config.locales_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.locales_dir = parent.join(&config.locales_dir);
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads `dir/locsync.toml` when it exists, the defaults otherwise.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_locales_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locales_dir = dir.into();
        self
    }

    pub fn with_base_language(mut self, lang: impl Into<String>) -> Self {
        self.base_language = lang.into();
        self
    }

    pub fn with_target_languages<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_languages = langs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder_marker(mut self, marker: impl Into<String>) -> Self {
        self.placeholder_marker = marker.into();
        self
    }

    /// Checks language codes, duplicates and the marker.
    pub fn validate(&self) -> Result<(), Error> {
        validate_language_code(&self.base_language)?;

        let mut seen = HashSet::new();
        for lang in &self.target_languages {
            validate_language_code(lang)?;
            if *lang == self.base_language {
                return Err(Error::InvalidConfig(format!(
                    "base language `{}` is also listed as a target",
                    lang
                )));
            }
            if !seen.insert(lang.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "target language `{}` is listed twice",
                    lang
                )));
            }
        }

        if self.placeholder_marker.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "placeholder marker cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the file holding `lang`.
    pub fn language_path(&self, lang: &str) -> PathBuf {
        self.locales_dir
            .join(format!("{}.{}", lang, LANGUAGE_FILE_EXTENSION))
    }

    /// Base language first, then every target.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_language.as_str())
            .chain(self.target_languages.iter().map(String::as_str))
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::default().with_marker(self.placeholder_marker.clone())
    }
}

/// Validates a language code as a BCP 47 language identifier.
pub fn validate_language_code(lang: &str) -> Result<(), Error> {
    if lang.is_empty() {
        return Err(Error::InvalidConfig(
            "language code cannot be empty".to_string(),
        ));
    }
    lang.parse::<LanguageIdentifier>().map(|_| ()).map_err(|_| {
        Error::InvalidConfig(format!(
            "invalid language code `{}`, expected a BCP 47 language identifier",
            lang
        ))
    })
}
