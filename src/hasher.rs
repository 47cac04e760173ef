use std::fmt;

use crc::{Crc, Digest, CRC_64_ECMA_182};

static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

/// Running CRC-64 and byte count over everything written to a part file.
///
/// The digest is updated as bytes arrive, so [`checksum`](Hasher::checksum)
/// can be taken at any point without buffering the file.
#[derive(Clone)]
pub struct Hasher {
    digest: Digest<'static, u64>,
    size: u64,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher").field("size", &self.size).finish()
    }
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            digest: CRC64.digest(),
            size: 0,
        }
    }

    pub fn write(&mut self, data: &[u8]) {
        self.digest.update(data);
        self.size += data.len() as u64;
    }

    pub fn checksum(&self) -> u64 {
        self.digest.clone().finalize()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-64 of a whole buffer, as recorded in a part's checksums.
pub fn checksum(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}
