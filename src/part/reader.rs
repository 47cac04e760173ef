use super::{Checksums, PartStorage};
use crate::error::Result;

/// Read access to a part's metadata files.
pub trait MetadataReader {
    fn exists(&self, name: &str) -> bool;

    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Reads files as they are on disk.
pub struct PlainMetadataReader<'a> {
    storage: &'a dyn PartStorage,
}

impl<'a> PlainMetadataReader<'a> {
    pub fn new(storage: &'a dyn PartStorage) -> Self {
        Self { storage }
    }
}

impl MetadataReader for PlainMetadataReader<'_> {
    fn exists(&self, name: &str) -> bool {
        self.storage.exists(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.storage.read_file(name)
    }
}

/// Reads files and verifies them against the part's checksum record.
pub struct ChecksummedReader<'a> {
    storage: &'a dyn PartStorage,
    checksums: &'a Checksums,
}

impl<'a> ChecksummedReader<'a> {
    pub fn new(storage: &'a dyn PartStorage, checksums: &'a Checksums) -> Self {
        Self { storage, checksums }
    }
}

impl MetadataReader for ChecksummedReader<'_> {
    fn exists(&self, name: &str) -> bool {
        self.storage.exists(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let bytes = self.storage.read_file(name)?;
        self.checksums.verify(name, &bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WriteSettings;
    use crate::hasher;
    use crate::part::DiskPartStorage;
    use crate::Error;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_checksummed_reader_detects_tampering() -> Result<()> {
        let dir = tempdir()?;
        let storage = DiskPartStorage::new(dir.path())?;

        let mut writer = storage.write_file("meta.bin", &WriteSettings::default())?;
        writer.write_all(b"value")?;
        writer.finish()?;

        let mut checksums = Checksums::new();
        checksums.add_file("meta.bin", 5, hasher::checksum(b"value"));

        let reader = ChecksummedReader::new(&storage, &checksums);
        assert_eq!(reader.read("meta.bin")?, b"value");

        std::fs::write(dir.path().join("meta.bin"), b"VALUE")?;
        assert!(matches!(
            reader.read("meta.bin"),
            Err(Error::ChecksumMismatch(_))
        ));

        let plain = PlainMetadataReader::new(&storage);
        assert_eq!(plain.read("meta.bin")?, b"VALUE");
        Ok(())
    }
}
