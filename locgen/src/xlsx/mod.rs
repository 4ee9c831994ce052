//! Minimal XLSX reader: sheet list, shared strings and cell values.
//!
//! Only the parts needed to read a translation table are decoded. Formulas,
//! styles and drawings are ignored.

use std::io::{Cursor, Read};

use zip::ZipArchive;
use zip::result::ZipError;

pub mod reader;
pub mod types;

pub use types::{
    Cell, CellKind, CellReference, Row, SharedStringItem, SharedStrings, Worksheet, column_index,
    column_name,
};

use crate::error::Error;
use crate::selector::WorksheetSource;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// A worksheet listed in the workbook, with the archive path of its XML part.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    name: String,
    path: String,
}

/// An opened XLSX package held entirely in memory.
pub struct Workbook {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    sheets: Vec<SheetEntry>,
    shared_strings: Option<SharedStrings>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.sheets)
            .field(
                "shared_strings",
                &self.shared_strings.as_ref().map(SharedStrings::len),
            )
            .finish()
    }
}

impl Workbook {
    /// Opens a workbook from the complete bytes of an `.xlsx` file.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::MalformedInput(format!("not an XLSX package ({})", e)))?;

        let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| Error::malformed(WORKBOOK_PART, "missing part"))?;
        let listed = reader::parse_sheet_list(&workbook_xml[..])?;

        let rels = match read_part(&mut archive, WORKBOOK_RELS_PART)? {
            Some(xml) => reader::parse_relationships(&xml[..])?,
            None => Default::default(),
        };

        let sheets = listed
            .into_iter()
            .map(|(name, rid)| {
                let target = rels.get(&rid).ok_or_else(|| {
                    Error::malformed(
                        WORKBOOK_RELS_PART,
                        format!("no relationship `{}` for sheet `{}`", rid, name),
                    )
                })?;
                Ok(SheetEntry {
                    name,
                    path: reader::resolve_target(target),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => Some(reader::parse_shared_strings(&xml[..])?),
            None => None,
        };

        tracing::debug!(
            sheets = sheets.len(),
            shared_strings = shared_strings.as_ref().map_or(0, SharedStrings::len),
            "opened workbook"
        );

        Ok(Workbook {
            archive,
            sheets,
            shared_strings,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// The shared string table, if the workbook has one.
    pub fn shared_strings(&self) -> Option<&SharedStrings> {
        self.shared_strings.as_ref()
    }

    /// Parses the rows of the named worksheet.
    pub fn worksheet(&mut self, name: &str) -> Result<Worksheet, Error> {
        let path = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.path.clone())
            .ok_or_else(|| Error::WorksheetNotFound(vec![name.to_string()]))?;

        let xml = read_part(&mut self.archive, &path)?
            .ok_or_else(|| Error::malformed(&path, "missing worksheet part"))?;
        let rows = reader::parse_worksheet(&xml[..])?;
        Ok(Worksheet::new(rows))
    }
}

impl WorksheetSource for Workbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn load(&mut self, name: &str) -> Result<Worksheet, Error> {
        self.worksheet(name)
    }
}

/// Reads a whole archive part, `None` if the package does not contain it.
fn read_part(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    name: &str,
) -> Result<Option<Vec<u8>>, Error> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::malformed(name, e)),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::malformed(name, e))?;
    Ok(Some(bytes))
}
