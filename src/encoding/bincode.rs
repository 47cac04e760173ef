//! Bincode framing for the part's metadata records.
//!
//! Fixed-width integers, and decoding insists on consuming the whole input so
//! a record with garbage appended is reported instead of silently accepted.

use super::EncodingError;
use crate::error::Result;

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn decode_error(err: bincode::Error) -> crate::Error {
    match err.as_ref() {
        bincode::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            EncodingError::TruncatedData.into()
        }
        bincode::ErrorKind::InvalidUtf8Encoding(_) => EncodingError::InvalidUtf8.into(),
        _ => EncodingError::InvalidFormat(err.to_string()).into(),
    }
}

pub fn serialize_into<T: Serialize, W: Write>(writer: W, value: &T) -> Result<()> {
    options()
        .serialize_into(writer, value)
        .map_err(|e| EncodingError::InvalidFormat(e.to_string()).into())
}

pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    options().deserialize(bytes).map_err(decode_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn manifest() -> BTreeMap<String, (u64, u64)> {
        let mut files = BTreeMap::new();
        files.insert("partition.dat".to_string(), (4u64, 99u64));
        files
    }

    #[test]
    fn test_fixed_width_lengths() {
        let mut buffer = Vec::new();
        serialize_into(&mut buffer, &manifest()).unwrap();
        // u64 entry count, u64 name length, name, two u64 values
        assert_eq!(buffer.len(), 8 + 8 + "partition.dat".len() + 16);

        let decoded: BTreeMap<String, (u64, u64)> = deserialize(&buffer).unwrap();
        assert_eq!(decoded, manifest());
    }

    #[test]
    fn test_truncated_and_trailing() {
        let mut buffer = Vec::new();
        serialize_into(&mut buffer, &manifest()).unwrap();

        let short: Result<BTreeMap<String, (u64, u64)>> = deserialize(&buffer[..buffer.len() - 1]);
        assert!(matches!(short, Err(crate::Error::CorruptedData(_))));

        buffer.push(0);
        let long: Result<BTreeMap<String, (u64, u64)>> = deserialize(&buffer);
        assert!(matches!(long, Err(crate::Error::CorruptedData(_))));
    }
}
