#![forbid(unsafe_code)]
//! Generate Apple `.strings` localization files from an XLSX spreadsheet.
//!
//! The spreadsheet holds one row per translation key and one column per
//! language. A YAML mapping file names the key column and associates language
//! codes with column headers; every configured language gets its own
//! `<code>.lproj/Localizable.strings` file with lines of the form
//! `"key" = "value";`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locgen::{Config, Generator};
//!
//! let config = Config::from_yaml_slice(&std::fs::read("map.yml")?)?;
//! let report = Generator::new(config)
//!     .sheets(["Strings"])
//!     .output_dir("App/Resources")
//!     .run(std::fs::read("translations.xlsx")?)?;
//! for file in &report.files {
//!     println!("{}: {} lines", file.path.display(), file.lines);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipeline
//!
//! - [`selector`] picks the worksheets (the first one by default)
//! - [`header`] binds the header row to the key column and languages
//! - [`translate`] turns each data row into escaped `.strings` lines
//! - [`output`] accumulates lines per file and writes them in one pass

pub mod cell;
pub mod config;
pub mod error;
pub mod generator;
pub mod header;
pub mod output;
pub mod selector;
pub mod translate;
pub mod xlsx;

// Re-export most used types for easy consumption
pub use crate::{
    cell::ValueResolver,
    config::Config,
    error::Error,
    generator::{Generator, Report, generate},
    header::{ColumnBinding, resolve_header},
    output::{FileEvent, OutputBuffer, WrittenFile, file_target},
    selector::{WorksheetSource, select_worksheets},
    translate::{TranslatedRow, escape_quotes, format_line, translate_row},
    xlsx::Workbook,
};
