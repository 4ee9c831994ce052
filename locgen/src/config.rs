//! Mapping configuration that ties spreadsheet columns to language codes.
//!
//! The mapping file is YAML:
//!
//! ```yaml
//! key: Key
//! languages:
//!   en: English
//!   fr: French
//! dirs:
//!   en: Base.lproj
//! filenames:
//!   fr: Main.strings
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Error;

/// Directory used for a language without a `dirs` override is `<code>.lproj`.
pub const DEFAULT_DIRECTORY_SUFFIX: &str = ".lproj";

/// File name used for a language without a `filenames` override.
pub const DEFAULT_FILENAME: &str = "Localizable.strings";

/// Validated mapping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Header text of the column holding translation keys.
    pub key: String,
    /// Language code to header display name.
    pub languages: BTreeMap<String, String>,
    /// Per-language output directory, relative to the output root.
    pub dirs: Option<BTreeMap<String, String>>,
    /// Per-language output file name.
    pub filenames: Option<BTreeMap<String, String>>,
}

/// Shape of the YAML document before required fields are checked.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "key-ios")]
    key: Option<String>,
    languages: Option<BTreeMap<String, String>>,
    dirs: Option<BTreeMap<String, String>>,
    #[serde(alias = "names")]
    filenames: Option<BTreeMap<String, String>>,
}

impl Config {
    /// Creates a configuration from a key column name and `(code, display name)` pairs.
    pub fn new<K, I, C, N>(key: K, languages: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Config {
            key: key.into(),
            languages: languages
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
            dirs: None,
            filenames: None,
        }
    }

    /// Overrides the output directory of one language.
    pub fn with_dir(mut self, code: impl Into<String>, dir: impl Into<String>) -> Self {
        self.dirs
            .get_or_insert_with(BTreeMap::new)
            .insert(code.into(), dir.into());
        self
    }

    /// Overrides the output file name of one language.
    pub fn with_filename(mut self, code: impl Into<String>, filename: impl Into<String>) -> Self {
        self.filenames
            .get_or_insert_with(BTreeMap::new)
            .insert(code.into(), filename.into());
        self
    }

    /// Decodes and validates a mapping file.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, Error> {
        let raw: RawConfig = serde_yaml::from_slice(bytes)?;
        raw.try_into()
    }

    /// Decodes and validates a mapping file held in a string.
    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        Self::from_yaml_slice(s.as_bytes())
    }

    /// Output directory for a language, relative to the output root.
    pub fn directory_for(&self, code: &str) -> String {
        self.dirs
            .as_ref()
            .and_then(|dirs| dirs.get(code))
            .cloned()
            .unwrap_or_else(|| format!("{}{}", code, DEFAULT_DIRECTORY_SUFFIX))
    }

    /// Output file name for a language.
    pub fn filename_for(&self, code: &str) -> String {
        self.filenames
            .as_ref()
            .and_then(|names| names.get(code))
            .cloned()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
    }

    /// Display name configured for a language code.
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let key = raw
            .key
            .ok_or_else(|| Error::ConfigIncomplete("missing `key`".to_string()))?;
        let languages = raw
            .languages
            .ok_or_else(|| Error::ConfigIncomplete("missing `languages`".to_string()))?;
        if languages.is_empty() {
            return Err(Error::ConfigIncomplete(
                "`languages` must contain at least one entry".to_string(),
            ));
        }

        Ok(Config {
            key,
            languages,
            dirs: raw.dirs,
            filenames: raw.filenames,
        })
    }
}
