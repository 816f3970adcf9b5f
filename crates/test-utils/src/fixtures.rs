use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Scratch working directory for one test; removed on drop.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("creating temp workspace")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Canonical form of [`path`](Self::path), as the path guard reports it.
    pub fn canonical(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).unwrap_or_else(|_| self.dir.path().to_path_buf())
    }

    /// Write `contents` to `rel` (parents created) and return the full path.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {:?}", path))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.dir.path().join(rel);
        fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))
    }

    pub fn mkdir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(&path).with_context(|| format!("creating {:?}", path))?;
        Ok(path)
    }
}
