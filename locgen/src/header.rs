//! Binds header columns to the key role and to configured languages.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    cell::ValueResolver,
    config::Config,
    error::Error,
    xlsx::{Row, SharedStrings},
};

/// Columns resolved from a worksheet's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column holding the translation keys.
    pub key_column: String,
    /// Language code to the column holding its translations.
    pub languages: BTreeMap<String, String>,
}

impl ColumnBinding {
    pub fn column_for(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }
}

/// Matches header cells against `config`.
///
/// Header text must equal the configured names exactly. When two header
/// cells carry the same name the later column wins.
pub fn resolve_header(
    sheet: &str,
    header: &Row,
    config: &Config,
    shared: Option<&SharedStrings>,
    resolver: &mut ValueResolver,
) -> Result<ColumnBinding, Error> {
    let mut key_column = None;
    let mut languages = BTreeMap::new();

    for cell in &header.cells {
        let Some(text) = resolver.resolve(Some(cell), shared) else {
            continue;
        };

        if text == config.key {
            key_column = Some(cell.column().to_string());
            continue;
        }

        for (code, display_name) in &config.languages {
            if *display_name == text {
                languages.insert(code.clone(), cell.column().to_string());
            }
        }
    }

    let key_column = key_column.ok_or_else(|| Error::ColumnNotFound {
        sheet: sheet.to_string(),
        names: vec![config.key.clone()],
    })?;

    let configured: BTreeSet<&String> = config.languages.keys().collect();
    let bound: BTreeSet<&String> = languages.keys().collect();
    let unmatched: Vec<String> = configured
        .symmetric_difference(&bound)
        .filter_map(|code| config.languages.get(*code).cloned())
        .collect();
    if !unmatched.is_empty() {
        return Err(Error::ColumnNotFound {
            sheet: sheet.to_string(),
            names: unmatched,
        });
    }

    tracing::debug!(sheet, key_column = %key_column, languages = ?languages, "resolved header");

    Ok(ColumnBinding {
        key_column,
        languages,
    })
}
