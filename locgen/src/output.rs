//! Per-file accumulation of generated lines and the final write.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{config::Config, error::Error};

/// Where a language's `.strings` file lives below `working_dir`.
pub fn file_target(code: &str, config: &Config, working_dir: &Path) -> PathBuf {
    working_dir
        .join(config.directory_for(code))
        .join(config.filename_for(code))
}

/// What happened to a target file when a line was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// First line for this path in the run: the file will be recreated.
    TruncateOrCreate(PathBuf),
    Append,
}

/// A file written by [`OutputBuffer::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub lines: usize,
}

#[derive(Debug, Default)]
struct Pending {
    content: String,
    lines: usize,
}

/// Content of every target file produced in one run.
///
/// Nothing touches the filesystem until [`commit`](Self::commit).
#[derive(Debug, Default)]
pub struct OutputBuffer {
    files: BTreeMap<PathBuf, Pending>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a formatted line to `path`.
    pub fn append(&mut self, path: PathBuf, line: &str) -> FileEvent {
        let event = if self.files.contains_key(&path) {
            FileEvent::Append
        } else {
            FileEvent::TruncateOrCreate(path.clone())
        };
        let pending = self.files.entry(path).or_default();
        pending.content.push_str(line);
        pending.lines += 1;
        event
    }

    /// Accumulated content of `path`, if any line was appended to it.
    pub fn content(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(|p| p.content.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes every file in full, creating parent directories and replacing
    /// whatever was there before. Paths without lines are never touched.
    ///
    /// Content is first written to a hidden sibling of each target and only
    /// renamed over the targets once every file has been staged, so a failed
    /// write leaves all previous files intact. A failing rename can still
    /// leave the earlier targets replaced.
    pub fn commit(self) -> Result<Vec<WrittenFile>, Error> {
        let mut staged = Vec::with_capacity(self.files.len());
        for (path, pending) in self.files {
            let staging = staging_path(&path);
            if let Err(e) = stage(&path, &staging, &pending.content) {
                discard(staged.iter().map(|(_, staging, _)| staging));
                let _ = fs::remove_file(&staging);
                return Err(e.into());
            }
            staged.push((path, staging, pending.lines));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (i, (path, staging, lines)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(staging, path) {
                discard(staged[i..].iter().map(|(_, staging, _)| staging));
                return Err(e.into());
            }
            tracing::info!(path = %path.display(), lines = *lines, "wrote strings file");
            written.push(WrittenFile {
                path: path.clone(),
                lines: *lines,
            });
        }
        Ok(written)
    }
}

/// `dir/.Localizable.strings.locgen-tmp` for `dir/Localizable.strings`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".locgen-tmp");
    path.with_file_name(name)
}

fn stage(path: &Path, staging: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(staging, content.as_bytes())
}

fn discard<'a>(staged: impl Iterator<Item = &'a PathBuf>) {
    for staging in staged {
        if let Err(e) = fs::remove_file(staging) {
            tracing::warn!(path = %staging.display(), error = %e, "can't remove staged file");
        }
    }
}
