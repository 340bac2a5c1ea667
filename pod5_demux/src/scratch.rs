//! Working directory for the per-file id dumps.
use crate::DemuxError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Either a temporary directory, removed when dropped, or a directory given
/// by the user, which is kept.
#[derive(Debug)]
pub enum Scratch {
    Temporary(TempDir),
    Persistent(PathBuf),
}

impl Scratch {
    pub fn temporary() -> Result<Self, DemuxError> {
        let dir = tempfile::Builder::new()
            .prefix("pod5_demux.")
            .tempdir()
            .map_err(|why| DemuxError::io(std::env::temp_dir(), why))?;
        debug!("Scratch directory:{}", dir.path().display());
        Ok(Scratch::Temporary(dir))
    }
    pub fn persistent<P: Into<PathBuf>>(dir: P) -> Result<Self, DemuxError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|why| DemuxError::io(&dir, why))?;
        Ok(Scratch::Persistent(dir))
    }
    /// A persistent scratch at `dir`, or a temporary one.
    pub fn from_option(dir: Option<&Path>) -> Result<Self, DemuxError> {
        match dir {
            Some(dir) => Self::persistent(dir),
            None => Self::temporary(),
        }
    }
    pub fn path(&self) -> &Path {
        match self {
            Scratch::Temporary(dir) => dir.path(),
            Scratch::Persistent(dir) => dir.as_path(),
        }
    }
    /// The dump file of an input file, named after the input.
    pub fn dump_path(&self, file_name: &str) -> PathBuf {
        self.path().join(format!("{}.csv", file_name))
    }
}
