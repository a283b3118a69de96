//! Raw byte access for input files, with transparent gzip support.

use anyhow::Context;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Anything that can hand back the bytes stored at a configured path.
///
/// The CLI reads from disk; the web app serves files embedded at build time.
pub trait SourceReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads sources from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Serves sources from bytes already in memory, keyed by path.
///
/// The web app fills one from files embedded at build time.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl SourceReader for MemoryReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} was not bundled", path.display()),
            )
        })
    }
}

/// True when the path names a gzip-compressed file (`*.gz`).
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Undo any compression implied by the file name and return the plain bytes.
pub fn decode(path: &Path, bytes: Vec<u8>) -> anyhow::Result<Vec<u8>> {
    if !is_gzip(path) {
        return Ok(bytes);
    }
    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .with_context(|| format!("failed to gunzip {}", path.display()))?;
    Ok(out)
}

/// Read and decode a source in one step.
pub fn read_source(reader: &dyn SourceReader, path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes = reader
        .read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode(path, bytes)
}
