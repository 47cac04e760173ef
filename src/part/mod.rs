//! Access to the files of one part directory.

pub mod checksums;
pub mod reader;
pub mod writer;

pub use checksums::{Checksums, FileChecksum};
pub use reader::{ChecksummedReader, MetadataReader, PlainMetadataReader};
pub use writer::PartFileWriter;

use crate::config::WriteSettings;
use crate::error::Result;
use crate::Error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Byte-level file access within a single part's directory.
pub trait PartStorage: Send + Sync {
    fn path(&self) -> &Path;

    /// Opens a write handle for `name`. Nothing is visible under that name
    /// until the handle is finished.
    fn write_file(&self, name: &str, settings: &WriteSettings) -> Result<PartFileWriter>;

    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    fn exists(&self, name: &str) -> bool;

    fn remove_file(&self, name: &str) -> Result<()>;

    /// Names of the finished files in the part, sorted.
    fn list_files(&self) -> Result<Vec<String>>;
}

/// Part storage backed by a local directory.
#[derive(Debug, Clone)]
pub struct DiskPartStorage {
    dir: PathBuf,
}

impl DiskPartStorage {
    /// Opens the part directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn file_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::InvalidOperation(format!(
                "invalid part file name {:?}",
                name
            )));
        }
        Ok(self.dir.join(name))
    }
}

impl PartStorage for DiskPartStorage {
    fn path(&self) -> &Path {
        &self.dir
    }

    fn write_file(&self, name: &str, settings: &WriteSettings) -> Result<PartFileWriter> {
        self.file_path(name)?;
        PartFileWriter::create(&self.dir, name, settings.buffer_size, settings.fsync)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        fs::read(self.file_path(name)?).map_err(|e| Error::ReadError("part file", e))
    }

    fn exists(&self, name: &str) -> bool {
        self.file_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn remove_file(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.file_path(name)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(writer::TMP_PREFIX) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
