//! Scoped files handed to the external tools
//!
//! Every call gets its own randomly named files, so concurrent calls never
//! share a path. A [`ScratchFile`] deletes its file when dropped, which
//! covers early returns, errors and timeouts alike.

use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};

/// Files created by the adapter, by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchKind {
    TrainInput,
    PredictInput,
    PredictOutput,
    Model,
}

impl ScratchKind {
    fn prefix(self) -> &'static str {
        match self {
            ScratchKind::TrainInput => "fairlab-train-",
            ScratchKind::PredictInput => "fairlab-test-",
            ScratchKind::PredictOutput => "fairlab-pred-",
            ScratchKind::Model => "fairlab-model-",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ScratchKind::Model => ".model",
            _ => ".dat",
        }
    }
}

/// A uniquely named file that is removed on drop unless persisted
#[derive(Debug)]
pub struct ScratchFile {
    kind: ScratchKind,
    path: TempPath,
}

impl ScratchFile {
    /// Create an empty file of the given kind inside `dir`
    pub fn create_in(dir: &Path, kind: ScratchKind) -> io::Result<Self> {
        let file = Builder::new()
            .prefix(kind.prefix())
            .suffix(kind.suffix())
            .tempfile_in(dir)?;
        // Only the path is needed; the tools open the file themselves
        let path = file.into_temp_path();
        debug!("Created {:?} scratch file {}", kind, path.display());
        Ok(Self { kind, path })
    }

    pub fn kind(&self) -> ScratchKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk and hand back its path
    pub fn persist(self) -> io::Result<PathBuf> {
        self.path.keep().map_err(|e| e.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let file = ScratchFile::create_in(dir.path(), ScratchKind::TrainInput).unwrap();
            assert!(file.path().exists());
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_names_are_unique_and_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::create_in(dir.path(), ScratchKind::PredictOutput).unwrap();
        let b = ScratchFile::create_in(dir.path(), ScratchKind::PredictOutput).unwrap();

        assert_ne!(a.path(), b.path());
        let name = a.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("fairlab-pred-"));
        assert!(name.ends_with(".dat"));
    }

    #[test]
    fn test_persisted_file_survives() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchFile::create_in(dir.path(), ScratchKind::Model).unwrap();
        let kept = file.persist().unwrap();
        assert!(kept.exists());
        assert_eq!(kept.extension().unwrap(), "model");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = ScratchFile::create_in(Path::new("/definitely/not/a/dir"), ScratchKind::Model)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
