//! In-memory model of the parts of a worksheet the generator reads.

use std::fmt;

/// Position of a cell: column letters plus 1-based row number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellReference {
    /// Column letters, e.g. `"A"` or `"AB"`.
    pub column: String,
    /// 1-based row number.
    pub row: u32,
}

impl CellReference {
    pub fn new(column: impl Into<String>, row: u32) -> Self {
        CellReference {
            column: column.into(),
            row,
        }
    }

    /// Parses an A1-style reference such as `"B12"`.
    ///
    /// Returns `None` when the letters or the digits are missing, or when they
    /// are not in letters-then-digits order.
    pub fn parse(reference: &str) -> Option<Self> {
        let split = reference.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = reference.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let row = digits.parse::<u32>().ok()?;
        Some(CellReference {
            column: letters.to_ascii_uppercase(),
            row,
        })
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Converts 0-based column index to letters (`0` -> `"A"`, `26` -> `"AA"`).
pub fn column_name(index: u32) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts column letters to a 0-based index (`"A"` -> `0`).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col = 0u32;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }
    Some(col - 1)
}

/// The `t` attribute of a `<c>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// `t="s"`: the value is an index into the shared string table.
    SharedString,
    /// `t="inlineStr"`: the text lives in an `<is>` child.
    InlineString,
    /// `t="str"`: cached string result of a formula.
    FormulaString,
    /// `t="b"`.
    Boolean,
    /// `t="e"`.
    Error,
    /// `t="d"`: ISO 8601 date.
    Date,
    /// `t="n"` or no type attribute.
    #[default]
    Number,
}

impl CellKind {
    pub fn from_attribute(t: &str) -> Self {
        match t {
            "s" => CellKind::SharedString,
            "inlineStr" => CellKind::InlineString,
            "str" => CellKind::FormulaString,
            "b" => CellKind::Boolean,
            "e" => CellKind::Error,
            "d" => CellKind::Date,
            _ => CellKind::Number,
        }
    }
}

/// A single cell as stored in the sheet, before shared string resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub reference: CellReference,
    pub kind: CellKind,
    /// Raw stored value: `<v>` text, or the text of an inline string.
    pub value: Option<String>,
}

impl Cell {
    pub fn new(reference: CellReference, kind: CellKind, value: Option<String>) -> Self {
        Cell {
            reference,
            kind,
            value,
        }
    }

    /// A formula cell with a cached string result (`t="str"`). Its value is
    /// used as is, like any text that is not a shared string index.
    pub fn text(column: &str, row: u32, value: impl Into<String>) -> Self {
        Cell::new(
            CellReference::new(column, row),
            CellKind::FormulaString,
            Some(value.into()),
        )
    }

    /// A cell pointing at entry `index` of the shared string table.
    pub fn shared(column: &str, row: u32, index: usize) -> Self {
        Cell::new(
            CellReference::new(column, row),
            CellKind::SharedString,
            Some(index.to_string()),
        )
    }

    /// A numeric cell.
    pub fn number(column: &str, row: u32, value: impl Into<String>) -> Self {
        Cell::new(
            CellReference::new(column, row),
            CellKind::Number,
            Some(value.into()),
        )
    }

    pub fn column(&self) -> &str {
        &self.reference.column
    }
}

/// One `<row>` of a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// 1-based row number.
    pub number: u32,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(number: u32, cells: Vec<Cell>) -> Self {
        Row { number, cells }
    }

    /// Finds the cell stored in the given column.
    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column() == column)
    }
}

/// Rows of a worksheet in document order. The first row is the header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Worksheet {
    pub rows: Vec<Row>,
}

impl Worksheet {
    pub fn new(rows: Vec<Row>) -> Self {
        Worksheet { rows }
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// One `<si>` entry of the shared string table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedStringItem {
    /// Plain `<t>` text of the item.
    pub text: Option<String>,
    /// Rich-text runs (`<r>`), each with its optional `<t>` text.
    pub runs: Vec<Option<String>>,
}

impl SharedStringItem {
    pub fn plain(text: impl Into<String>) -> Self {
        SharedStringItem {
            text: Some(text.into()),
            runs: Vec::new(),
        }
    }

    pub fn rich<I, S>(runs: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        SharedStringItem {
            text: None,
            runs: runs.into_iter().map(|r| r.map(Into::into)).collect(),
        }
    }

    /// Effective text: the plain text, or the concatenated run texts.
    ///
    /// `None` when neither the item nor any of its runs carries text.
    pub fn resolved_text(&self) -> Option<String> {
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        let mut texts = self.runs.iter().flatten().peekable();
        texts.peek()?;
        Some(texts.map(String::as_str).collect())
    }
}

/// Workbook-wide table of deduplicated strings referenced by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedStrings {
    pub items: Vec<SharedStringItem>,
}

impl SharedStrings {
    pub fn new(items: Vec<SharedStringItem>) -> Self {
        SharedStrings { items }
    }

    pub fn get(&self, index: usize) -> Option<&SharedStringItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
