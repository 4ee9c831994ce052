//! Chooses which worksheets of a workbook are processed.

use std::collections::BTreeSet;

use crate::{error::Error, xlsx::Worksheet};

/// Anything that lists worksheets by name and can load them.
pub trait WorksheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Loads the rows of a sheet returned by [`sheet_names`](Self::sheet_names).
    fn load(&mut self, name: &str) -> Result<Worksheet, Error>;
}

/// Resolves the worksheets to process, in workbook order.
///
/// An empty `requested` list selects only the first sheet. Otherwise every
/// sheet whose name was requested is selected, and requesting a name the
/// workbook does not have is an error.
pub fn select_worksheets<S: WorksheetSource + ?Sized>(
    source: &mut S,
    requested: &[String],
) -> Result<Vec<(String, Worksheet)>, Error> {
    let names = source.sheet_names();
    if names.is_empty() {
        return Err(Error::EmptyWorkbook);
    }

    let selected: Vec<String> = if requested.is_empty() {
        names.into_iter().take(1).collect()
    } else {
        let wanted: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
        let selected: Vec<String> = names
            .into_iter()
            .filter(|name| wanted.contains(name.as_str()))
            .collect();
        if selected.len() < wanted.len() {
            let missing = requested
                .iter()
                .filter(|name| !selected.contains(name))
                .fold(Vec::<String>::new(), |mut acc, name| {
                    if !acc.contains(name) {
                        acc.push(name.clone());
                    }
                    acc
                });
            return Err(Error::WorksheetNotFound(missing));
        }
        selected
    };

    selected
        .into_iter()
        .map(|name| {
            let sheet = source.load(&name)?;
            Ok((name, sheet))
        })
        .collect()
}
