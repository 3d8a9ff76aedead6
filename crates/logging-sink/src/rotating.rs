//! crates/logging-sink/src/rotating.rs
//! Append-only log file that rotates by size.
//!
//! When a write would push the active file past `max_size`, the file is
//! renamed to `<path>.1`, earlier rotations shift up by one (`.1` to `.2`
//! and so on) and the oldest one beyond the retention limit is removed. At
//! most `max_files` files exist for a sink, the active file included. With
//! `max_files == 1` the active file is truncated instead.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use logging::{Severity, Sink};

/// Size-rotated log file.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    name: String,
    max_size: u64,
    max_files: usize,
    file: Option<File>,
    size: u64,
}

impl RotatingFileSink {
    /// Opens (creating if needed) the file at `path` for appending.
    ///
    /// `max_size` and `max_files` are clamped to at least one.
    pub fn open(path: impl Into<PathBuf>, max_size: u64, max_files: usize) -> io::Result<Self> {
        let path = path.into();
        let mut sink = Self {
            name: path.display().to_string(),
            path,
            max_size: max_size.max(1),
            max_files: max_files.max(1),
            file: None,
            size: 0,
        };
        sink.ensure_open()?;
        Ok(sink)
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the active file, as tracked by the sink.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Path of the `index`th rotated file (`1` is the most recent).
    #[must_use]
    pub fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn ensure_open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.size = file.metadata()?.len();
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file handle unavailable"))
    }

    fn rotate(&mut self) -> io::Result<()> {
        tracing::debug!(
            target: "logging::sink",
            path = %self.path.display(),
            size = self.size,
            max_files = self.max_files,
            "rotating log file"
        );
        self.file = None;
        self.size = 0;

        if self.max_files == 1 {
            File::create(&self.path)?;
            return Ok(());
        }

        let oldest = self.max_files - 1;
        remove_if_exists(&self.rotated_path(oldest))?;
        for index in (1..oldest).rev() {
            rename_if_exists(&self.rotated_path(index), &self.rotated_path(index + 1))?;
        }
        rename_if_exists(&self.path, &self.rotated_path(1))
    }
}

impl Sink for RotatingFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, _level: Severity, payload: &str) -> io::Result<()> {
        let mut line = Vec::with_capacity(payload.len() + 1);
        line.extend_from_slice(payload.as_bytes());
        line.push(b'\n');
        let len = line.len() as u64;

        self.ensure_open()?;
        if self.size > 0 && self.size + len > self.max_size {
            self.rotate()?;
        }

        let file = self.ensure_open()?;
        if let Err(error) = file.write_all(&line) {
            // Reopen on the next write; the handle may be stale.
            self.file = None;
            return Err(error);
        }
        self.size += len;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
        _ => Ok(()),
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
        _ => Ok(()),
    }
}
