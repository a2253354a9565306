use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("failed to persist watermark to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists the highest change number already accounted for.
///
/// The backing file holds nothing but the decimal digits of the watermark.
/// Single writer, read once at cycle start; two processes sharing one file
/// is unsupported.
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted watermark, or `0` when the file is missing,
    /// unreadable, or holds anything other than a number. A missing file is
    /// the normal cold-start state, not an error.
    pub fn read(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse::<u64>().unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Writes the watermark durably: the digits land in a sibling temp file
    /// which is then renamed over the target, so a reader never observes a
    /// partially written value.
    pub fn write(&self, number: u64) -> Result<(), WatermarkError> {
        let io_err = |source| WatermarkError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, number.to_string()).map_err(|source| WatermarkError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
