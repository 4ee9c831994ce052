//! SpreadsheetML part parsers built on quick-xml.
//!
//! Every parser takes a buffered reader over the raw bytes of one archive part,
//! so they can be exercised directly with byte slices.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::types::{
    Cell, CellKind, CellReference, Row, SharedStringItem, SharedStrings, column_index,
    column_name,
};
use crate::error::Error;

/// Index of the last worksheet column, `XFD`.
const MAX_COLUMN_INDEX: u32 = 16_383;

/// Reads `name`/`r:id` pairs of `<sheet>` elements from `xl/workbook.xml`, in order.
pub fn parse_sheet_list<R: BufRead>(input: R) -> Result<Vec<(String, String)>, Error> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = String::new();
                let mut rid = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr.unescape_value()?.to_string(),
                        // `r:id`, whatever prefix the relationship namespace got
                        _ if attr.key.local_name().as_ref() == b"id" => {
                            rid = attr.unescape_value()?.to_string()
                        }
                        _ => {}
                    }
                }
                sheets.push((name, rid));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Reads `Id` -> `Target` of every `<Relationship>` in a `.rels` part.
pub fn parse_relationships<R: BufRead>(input: R) -> Result<HashMap<String, String>, Error> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr.unescape_value()?.to_string(),
                        b"Target" => target = attr.unescape_value()?.to_string(),
                        _ => {}
                    }
                }
                rels.insert(id, target);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Turns a workbook relationship target into an archive path.
///
/// Targets are relative to `xl/` unless they start with `/`.
pub fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if target.starts_with("xl/") => target.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Parses `xl/sharedStrings.xml`.
pub fn parse_shared_strings<R: BufRead>(input: R) -> Result<SharedStrings, Error> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"si" => {
                items.push(read_rich_text(&mut reader, b"si")?);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                items.push(SharedStringItem::default());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(SharedStrings::new(items))
}

/// Parses the `<sheetData>` of a worksheet part into rows.
pub fn parse_worksheet<R: BufRead>(input: R) -> Result<Vec<Row>, Error> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut current: Option<Row> = None;
    let mut next_col = 0u32;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    let number = row_number(&e, rows.last())?;
                    current = Some(Row::new(number, Vec::new()));
                    next_col = 0;
                }
                b"c" => {
                    let row = current.as_mut().ok_or_else(|| {
                        Error::MalformedInput("cell outside of a row".to_string())
                    })?;
                    let (reference, kind) = cell_header(&e, row.number, &mut next_col)?;
                    let value = read_cell_value(&mut reader, kind)?;
                    row.cells.push(Cell::new(reference, kind, value));
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    let number = row_number(&e, rows.last())?;
                    rows.push(Row::new(number, Vec::new()));
                }
                b"c" => {
                    let row = current.as_mut().ok_or_else(|| {
                        Error::MalformedInput("cell outside of a row".to_string())
                    })?;
                    let (reference, kind) = cell_header(&e, row.number, &mut next_col)?;
                    row.cells.push(Cell::new(reference, kind, None));
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                if let Some(row) = current.take() {
                    rows.push(row);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

fn row_number(e: &BytesStart<'_>, previous: Option<&Row>) -> Result<u32, Error> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            let value = attr.unescape_value()?;
            return value
                .parse::<u32>()
                .map_err(|_| Error::MalformedInput(format!("invalid row number `{}`", value)));
        }
    }
    Ok(previous.map_or(1, |row| row.number + 1))
}

/// Reads `r` and `t` of a `<c>` element. Cells without `r` take the column
/// after the previous cell of the row.
fn cell_header(
    e: &BytesStart<'_>,
    row: u32,
    next_col: &mut u32,
) -> Result<(CellReference, CellKind), Error> {
    let mut reference = None;
    let mut kind = CellKind::default();
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let value = attr.unescape_value()?;
                reference = Some(CellReference::parse(&value).ok_or_else(|| {
                    Error::MalformedInput(format!("invalid cell reference `{}`", value))
                })?);
            }
            b"t" => kind = CellKind::from_attribute(&attr.unescape_value()?),
            _ => {}
        }
    }

    let reference = match reference {
        Some(reference) => reference,
        None => CellReference::new(column_name(*next_col), row),
    };
    let index = column_index(&reference.column)
        .filter(|index| *index <= MAX_COLUMN_INDEX)
        .ok_or_else(|| {
            Error::MalformedInput(format!("cell reference `{}` is out of range", reference))
        })?;
    *next_col = index + 1;
    Ok((reference, kind))
}

/// Consumes the children of a `<c>` element up to its end tag.
fn read_cell_value<R: BufRead>(
    reader: &mut Reader<R>,
    kind: CellKind,
) -> Result<Option<String>, Error> {
    let mut buf = Vec::new();
    let mut value = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"v" => value = Some(read_text(reader)?),
                b"is" if kind == CellKind::InlineString => {
                    value = read_rich_text(reader, b"is")?.resolved_text();
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"c" => break,
            Event::Eof => {
                return Err(Error::MalformedInput(
                    "unexpected end of worksheet inside a cell".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(value)
}

/// Reads the body of an `<si>` or `<is>` element: plain `<t>` text and `<r>`
/// runs. Phonetic `<rPh>` runs are skipped.
fn read_rich_text<R: BufRead>(
    reader: &mut Reader<R>,
    end: &[u8],
) -> Result<SharedStringItem, Error> {
    let mut buf = Vec::new();
    let mut item = SharedStringItem::default();
    let mut in_run = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"rPh" => in_phonetic = true,
                b"r" if !in_phonetic => {
                    in_run = true;
                    item.runs.push(None);
                }
                b"t" if !in_phonetic => {
                    let text = read_text(reader)?;
                    append_text(&mut item, in_run, &text);
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"r" if !in_phonetic => item.runs.push(None),
                b"t" if !in_phonetic => append_text(&mut item, in_run, ""),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"rPh" => in_phonetic = false,
                b"r" => in_run = false,
                name if name == end => break,
                _ => {}
            },
            Event::Eof => {
                return Err(Error::MalformedInput(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(item)
}

fn append_text(item: &mut SharedStringItem, in_run: bool, text: &str) {
    let slot = if in_run {
        match item.runs.last_mut() {
            Some(slot) => slot,
            None => return,
        }
    } else {
        &mut item.text
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Reads text content up to the closing tag of the current element.
fn read_text<R: BufRead>(reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(e.unescape()?.as_ref()),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
