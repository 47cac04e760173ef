use crate::error::Result;
use crate::hasher::Hasher;
use crate::Error;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub(crate) const TMP_PREFIX: &str = "tmp_";

/// Write handle for one file inside a part directory.
///
/// Bytes go to a temporary file next to the destination. Only [`finish`]
/// moves the file to its final name; a writer dropped without finishing
/// (error, cancellation, panic) deletes the temporary file, so a partially
/// written file is never visible under the real name.
///
/// [`finish`]: PartFileWriter::finish
pub struct PartFileWriter {
    name: String,
    tmp_path: PathBuf,
    final_path: PathBuf,
    writer: Option<BufWriter<File>>,
    hasher: Hasher,
    fsync: bool,
    finished: bool,
}

impl PartFileWriter {
    pub fn create(dir: &Path, name: &str, buffer_size: usize, fsync: bool) -> Result<Self> {
        let tmp_path = dir.join(format!("{}{}", TMP_PREFIX, name));
        let file = File::create(&tmp_path).map_err(|e| Error::WriteError("part file", e))?;
        Ok(Self {
            name: name.to_string(),
            final_path: dir.join(name),
            tmp_path,
            writer: Some(BufWriter::with_capacity(buffer_size.max(1), file)),
            hasher: Hasher::new(),
            fsync,
            finished: false,
        })
    }

    /// File name the data will have once finished.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.hasher.size()
    }

    /// CRC-64 of the bytes written so far.
    pub fn checksum(&self) -> u64 {
        self.hasher.checksum()
    }

    /// Flushes, optionally fsyncs, and renames the file into place.
    pub fn finish(mut self) -> Result<()> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| Error::InvalidOperation(format!("{} already finished", self.name)))?;
        let file = writer
            .into_inner()
            .map_err(|e| Error::WriteError("part file", e.into_error()))?;
        if self.fsync {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&self.tmp_path, &self.final_path)?;
        self.finished = true;
        tracing::debug!(file = %self.name, size = self.size(), "Finished part file");
        Ok(())
    }

    /// Abandons the file. Equivalent to dropping the writer.
    pub fn cancel(self) {}
}

impl Write for PartFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "part file already finished"))?;
        let written = writer.write(buf)?;
        self.hasher.write(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PartFileWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        drop(self.writer.take());
        if let Err(e) = fs::remove_file(&self.tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    file = %self.name,
                    error = %e,
                    "Failed to remove unfinished part file"
                );
                return;
            }
        }
        tracing::warn!(file = %self.name, "Discarded unfinished part file");
    }
}

impl std::fmt::Debug for PartFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartFileWriter")
            .field("name", &self.name)
            .field("size", &self.size())
            .field("finished", &self.finished)
            .finish()
    }
}
