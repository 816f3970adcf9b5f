// src/logging/rotating.rs

//! Size-based rotating log file.
//!
//! Once writing the next record would take the file to `max_bytes` or more,
//! the file is renamed to `<file>.1`, older backups shift up by one
//! (`.1` → `.2`, ...), anything beyond `backup_count` is removed, and a
//! fresh file is started. Rotation is off when either limit is zero.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open (append) `path`, creating missing parent directories.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    /// Path of the `index`-th backup, e.g. `app.log.2`.
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && self.written > 0
            && self.written + incoming as u64 >= self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        for index in (1..self.backup_count).rev() {
            let src = self.backup_path(index);
            if src.exists() {
                replace(&src, &self.backup_path(index + 1))?;
            }
        }
        replace(&self.path, &self.backup_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn replace(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_file(dst)?;
    }
    fs::rename(src, dst)
}

/// Cloneable, thread-safe handle to a [`RotatingFile`], usable as a
/// `tracing-subscriber` writer.
#[derive(Debug, Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

impl RotatingFileWriter {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingFile::open(path, max_bytes, backup_count)?)),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.lock().path().to_path_buf()
    }

    pub fn max_bytes(&self) -> u64 {
        self.lock().max_bytes()
    }

    pub fn backup_count(&self) -> usize {
        self.lock().backup_count()
    }

    fn lock(&self) -> MutexGuard<'_, RotatingFile> {
        // A panic mid-write leaves the file usable; keep logging.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the lock for the duration of one formatted record.
pub struct RotatingFileGuard<'a>(MutexGuard<'a, RotatingFile>);

impl Write for RotatingFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileGuard(self.lock())
    }
}
