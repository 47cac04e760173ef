use super::PartStorage;
use crate::config::WriteSettings;
use crate::encoding::bincode;
use crate::error::Result;
use crate::hasher;
use crate::Error;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

pub const CHECKSUMS_FILE_NAME: &str = "checksums.bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksum {
    pub size: u64,
    pub hash: u64,
}

/// File name to size and CRC-64 for every file of a part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    files: BTreeMap<String, FileChecksum>,
}

impl Checksums {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, size: u64, hash: u64) {
        self.files.insert(name.into(), FileChecksum { size, hash });
    }

    pub fn get(&self, name: &str) -> Option<&FileChecksum> {
        self.files.get(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Checks `data` against the recorded size and checksum of `name`.
    pub fn verify(&self, name: &str, data: &[u8]) -> Result<()> {
        let expected = self
            .get(name)
            .ok_or_else(|| Error::CorruptedData(format!("no checksum recorded for {}", name)))?;
        if expected.size != data.len() as u64 {
            return Err(Error::ChecksumMismatch(format!(
                "{}: expected {} bytes, found {}",
                name,
                expected.size,
                data.len()
            )));
        }
        if expected.hash != hasher::checksum(data) {
            return Err(Error::ChecksumMismatch(name.to_string()));
        }
        Ok(())
    }

    /// Persists the record as the part's checksum file.
    pub fn write_to(&self, storage: &dyn PartStorage, settings: &WriteSettings) -> Result<()> {
        let mut writer = storage.write_file(CHECKSUMS_FILE_NAME, settings)?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        writer.finish()
    }

    pub fn read_from(storage: &dyn PartStorage) -> Result<Self> {
        let bytes = storage.read_file(CHECKSUMS_FILE_NAME)?;
        bincode::deserialize(&bytes)
    }
}
