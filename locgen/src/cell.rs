//! Effective string value of a cell.

use std::collections::BTreeSet;

use crate::xlsx::{Cell, CellKind, SharedStrings};

/// Resolves raw cells to text and remembers which columns were looked at.
#[derive(Debug, Clone, Default)]
pub struct ValueResolver {
    seen_columns: BTreeSet<String>,
}

impl ValueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text a cell displays.
    ///
    /// Shared string cells whose raw value is an integer are looked up in
    /// `shared`; every other cell yields its raw value unchanged, so numeric
    /// looking text stays literal. The raw value is not trimmed. A missing
    /// cell, a negative or out of range index and a shared item without any
    /// text all resolve to `None`.
    pub fn resolve(
        &mut self,
        cell: Option<&Cell>,
        shared: Option<&SharedStrings>,
    ) -> Option<String> {
        let cell = cell?;
        self.seen_columns.insert(cell.column().to_string());

        let raw = cell.value.as_deref()?;
        if cell.kind == CellKind::SharedString
            && let Ok(index) = raw.parse::<i64>()
        {
            let index = usize::try_from(index).ok()?;
            return shared?.get(index)?.resolved_text();
        }
        Some(raw.to_string())
    }

    /// Columns of every cell passed to [`resolve`](Self::resolve) so far.
    pub fn seen_columns(&self) -> &BTreeSet<String> {
        &self.seen_columns
    }
}
