//! Builds small XLSX packages in memory for tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::FileOptions;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

enum SheetBody {
    Table(Vec<Vec<String>>),
    Raw(String),
}

/// How text cells are stored.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// `t="s"` cells pointing at `xl/sharedStrings.xml`.
    Shared,
    /// `t="inlineStr"` cells.
    Inline,
}

pub struct XlsxBuilder {
    storage: Storage,
    sheets: Vec<(String, SheetBody)>,
    shared_strings_xml: Option<String>,
}

impl XlsxBuilder {
    pub fn new(storage: Storage) -> Self {
        XlsxBuilder {
            storage,
            sheets: Vec::new(),
            shared_strings_xml: None,
        }
    }

    /// Adds a sheet; empty strings leave the cell out.
    pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets.push((name.to_string(), SheetBody::Table(rows)));
        self
    }

    /// Adds a sheet whose `<sheetData>` content is given verbatim.
    pub fn raw_sheet(mut self, name: &str, sheet_data: &str) -> Self {
        self.sheets
            .push((name.to_string(), SheetBody::Raw(sheet_data.to_string())));
        self
    }

    /// Replaces the generated shared string table with the given `<si>` items.
    pub fn shared_strings(mut self, items: &str) -> Self {
        self.shared_strings_xml = Some(items.to_string());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let mut sheet_parts = Vec::new();
        for (_, body) in &self.sheets {
            let data = match body {
                SheetBody::Raw(xml) => xml.clone(),
                SheetBody::Table(rows) => table_xml(rows, self.storage, &mut shared),
            };
            sheet_parts.push(format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{data}</sheetData></worksheet>"#
            ));
        }

        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options =
                FileOptions::<()>::default().compression_method(zip::CompressionMethod::Stored);

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(content_types(self.sheets.len()).as_bytes())
                .unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            let sheet_list: String = self
                .sheets
                .iter()
                .enumerate()
                .map(|(i, (name, _))| {
                    format!(
                        r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                        escape(name),
                        i + 1,
                        i + 1
                    )
                })
                .collect();
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{sheet_list}</sheets></workbook>"#
                )
                .as_bytes(),
            )
            .unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options)
                .unwrap();
            let rels: String = (1..=self.sheets.len())
                .map(|i| {
                    format!(
                        r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
                    )
                })
                .collect();
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
                )
                .as_bytes(),
            )
            .unwrap();

            for (i, part) in sheet_parts.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(part.as_bytes()).unwrap();
            }

            let items = match self.shared_strings_xml {
                Some(items) => Some(items),
                None if !shared.is_empty() => Some(
                    shared
                        .iter()
                        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
                        .collect(),
                ),
                None => None,
            };
            if let Some(items) = items {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{MAIN_NS}">{items}</sst>"#
                    )
                    .as_bytes(),
                )
                .unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }
}

fn table_xml(rows: &[Vec<String>], storage: Storage, shared: &mut Vec<String>) -> String {
    let mut xml = String::new();
    for (r, row) in rows.iter().enumerate() {
        let number = r + 1;
        xml.push_str(&format!(r#"<row r="{number}">"#));
        for (c, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let reference = format!("{}{}", (b'A' + c as u8) as char, number);
            match storage {
                Storage::Shared => {
                    let index = match shared.iter().position(|s| s == text) {
                        Some(index) => index,
                        None => {
                            shared.push(text.clone());
                            shared.len() - 1
                        }
                    };
                    xml.push_str(&format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#));
                }
                Storage::Inline => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    escape(text)
                )),
            }
        }
        xml.push_str("</row>");
    }
    xml
}

fn content_types(sheets: usize) -> String {
    let overrides: String = (1..=sheets)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
