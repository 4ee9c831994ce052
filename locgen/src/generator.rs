//! Runs the whole spreadsheet to `.strings` conversion.
//!
//! A run opens the workbook, selects the worksheets, binds each header row to
//! the configured languages, translates every data row into the shared
//! [`OutputBuffer`] and finally writes all files at once. If anything fails
//! before the final write, no output file is touched.

use std::path::{Path, PathBuf};

use crate::{
    cell::ValueResolver,
    config::Config,
    error::Error,
    header::resolve_header,
    output::{FileEvent, OutputBuffer, WrittenFile, file_target},
    selector::select_worksheets,
    translate::translate_row,
    xlsx::{SharedStrings, Workbook, Worksheet},
};

/// Summary of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Worksheets processed, in processing order.
    pub sheets: Vec<String>,
    /// Data rows skipped because their key cell was missing or empty.
    pub skipped_rows: usize,
    /// Files written, sorted by path.
    pub files: Vec<WrittenFile>,
}

/// Converts a workbook into per-language `.strings` files.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    sheets: Vec<String>,
    output_dir: PathBuf,
}

impl Generator {
    /// Creates a generator that reads the first worksheet and writes below
    /// the current directory.
    pub fn new(config: Config) -> Self {
        Generator {
            config,
            sheets: Vec::new(),
            output_dir: PathBuf::from("."),
        }
    }

    /// Worksheets to process. Empty means the first worksheet.
    pub fn sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    /// Root directory the per-language directories are created in.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Converts the complete bytes of an `.xlsx` file and writes the output.
    pub fn run(&self, workbook_bytes: Vec<u8>) -> Result<Report, Error> {
        let mut workbook = Workbook::from_bytes(workbook_bytes)?;
        self.run_workbook(&mut workbook)
    }

    /// Same as [`run`](Self::run) on an already opened workbook.
    pub fn run_workbook(&self, workbook: &mut Workbook) -> Result<Report, Error> {
        let (buffer, mut report) = self.collect(workbook)?;
        report.files = buffer.commit()?;
        Ok(report)
    }

    /// Builds the output without writing it.
    pub fn collect(&self, workbook: &mut Workbook) -> Result<(OutputBuffer, Report), Error> {
        let selected = select_worksheets(workbook, &self.sheets)?;
        let shared = workbook.shared_strings();

        let mut buffer = OutputBuffer::new();
        let mut resolver = ValueResolver::new();
        let mut report = Report::default();

        for (name, sheet) in &selected {
            report.skipped_rows +=
                self.process_sheet(name, sheet, shared, &mut resolver, &mut buffer)?;
            report.sheets.push(name.clone());
        }

        tracing::debug!(columns = ?resolver.seen_columns(), "columns read");
        Ok((buffer, report))
    }

    fn process_sheet(
        &self,
        name: &str,
        sheet: &Worksheet,
        shared: Option<&SharedStrings>,
        resolver: &mut ValueResolver,
        buffer: &mut OutputBuffer,
    ) -> Result<usize, Error> {
        let header = sheet
            .header()
            .ok_or_else(|| Error::EmptyWorksheetData(name.to_string()))?;
        let binding = resolve_header(name, header, &self.config, shared, resolver)?;

        tracing::info!(sheet = name, rows = sheet.data_rows().len(), "processing worksheet");

        let mut skipped = 0;
        for row in sheet.data_rows() {
            let Some(translated) = translate_row(row, &binding, &self.config, shared, resolver)
            else {
                tracing::debug!(sheet = name, row = row.number, "skipping row without key");
                skipped += 1;
                continue;
            };

            for (code, line) in translated.lines {
                let path = file_target(&code, &self.config, &self.output_dir);
                if let FileEvent::TruncateOrCreate(path) = buffer.append(path, &line) {
                    tracing::debug!(language = %code, path = %path.display(), "regenerating file");
                }
            }
        }

        Ok(skipped)
    }
}

/// Converts `workbook_bytes` with `config`, processing `sheets` (the first
/// sheet when empty) and writing below `output_dir`.
pub fn generate(
    workbook_bytes: Vec<u8>,
    config: Config,
    sheets: &[String],
    output_dir: impl AsRef<Path>,
) -> Result<Report, Error> {
    Generator::new(config)
        .sheets(sheets.iter().cloned())
        .output_dir(output_dir.as_ref())
        .run(workbook_bytes)
}
