use super::Partition;
use crate::block::Block;
use crate::config::WriteSettings;
use crate::encoding::binary;
use crate::error::Result;
use crate::key::Table;
use crate::part::{Checksums, MetadataReader, PartFileWriter, PartStorage};
use crate::types::DataType;
use crate::Error;

use std::io::Write;

/// Name of the file holding a part's partition value.
pub const PARTITION_FILE_NAME: &str = "partition.dat";

fn key_types(sample: &Block) -> Vec<DataType> {
    sample.columns().iter().map(|c| c.data_type.clone()).collect()
}

impl Partition {
    /// Writes the value into the part's `partition.dat` and records the file
    /// in `checksums`.
    ///
    /// Returns `None` for an unpartitioned table, which has no file.
    /// Otherwise the returned writer holds the complete content but is not
    /// finished: the caller decides when the file becomes visible by calling
    /// [`PartFileWriter::finish`], and dropping it instead leaves nothing
    /// behind. The recorded checksum describes the bytes the finished file
    /// will contain.
    pub fn store(
        &self,
        table: &Table,
        storage: &dyn PartStorage,
        checksums: &mut Checksums,
    ) -> Result<Option<PartFileWriter>> {
        self.store_with_sample(
            &table.partition_key().sample_block,
            storage,
            checksums,
            &table.settings.write,
        )
    }

    /// Like [`store`](Partition::store), with the key known only through its
    /// sample block.
    pub fn store_with_sample(
        &self,
        sample: &Block,
        storage: &dyn PartStorage,
        checksums: &mut Checksums,
        settings: &WriteSettings,
    ) -> Result<Option<PartFileWriter>> {
        if sample.column_count() == 0 {
            return Ok(None);
        }

        let bytes = binary::encode_row(&key_types(sample), &self.value)?;
        let mut writer = storage.write_file(PARTITION_FILE_NAME, settings)?;
        writer.write_all(&bytes)?;
        writer.flush()?;

        checksums.add_file(PARTITION_FILE_NAME, writer.size(), writer.checksum());
        tracing::debug!(
            part = %storage.path().display(),
            size = writer.size(),
            "Stored partition value"
        );
        Ok(Some(writer))
    }

    /// Reads the value back from a part of `table`.
    pub fn load(table: &Table, reader: &dyn MetadataReader) -> Result<Self> {
        let sample = &table.partition_key().sample_block;
        if sample.column_count() == 0 {
            return Ok(Self::default());
        }

        if !reader.exists(PARTITION_FILE_NAME) {
            return Err(Error::CorruptedData(format!(
                "{} is missing for a key with {} columns",
                PARTITION_FILE_NAME,
                sample.column_count()
            )));
        }

        let bytes = reader.read(PARTITION_FILE_NAME)?;
        let value = binary::decode_row(&key_types(sample), &bytes).map_err(|e| match e {
            Error::CorruptedData(msg) => {
                Error::CorruptedData(format!("{}: {}", PARTITION_FILE_NAME, msg))
            }
            other => other,
        })?;

        tracing::debug!(size = bytes.len(), "Loaded partition value");
        Ok(Self { value })
    }
}
