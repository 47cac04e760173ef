use super::Partition;
use crate::block::Block;
use crate::config::IdentifierMode;
use crate::encoding::{binary, text};
use crate::error::Result;
use crate::key::Table;
use crate::types::{date, DataType, Field, Row};
use crate::Error;

use itertools::Itertools;
use xxhash_rust::xxh3::xxh3_128;

/// Identifier of the only partition of an unpartitioned table.
pub const UNPARTITIONED_ID: &str = "all";

/// Longest string value used verbatim as an identifier.
pub const MAX_DIRECT_ID_LENGTH: usize = 64;

/// Length of a hash-form identifier: 128 bits as lowercase hex.
pub const HASH_ID_LENGTH: usize = 32;

impl Partition {
    /// Identifier naming this partition on disk.
    pub fn get_id(&self, table: &Table) -> Result<String> {
        self.get_id_for(&table.partition_key().sample_block, table.settings.identifier_mode)
    }

    /// Identifier of this partition, given only the key's sample block.
    ///
    /// Fails only when the value does not match the sample's arity or types.
    pub fn get_id_for(&self, sample: &Block, mode: IdentifierMode) -> Result<String> {
        let types: Vec<DataType> = sample.columns().iter().map(|c| c.data_type.clone()).collect();
        if types.len() != self.value.len() {
            return Err(Error::InvalidOperation(format!(
                "partition value has {} fields but the key has {} columns",
                self.value.len(),
                types.len()
            )));
        }
        let invalid = types.iter().zip(&self.value).find(|(t, f)| !t.accepts(f));
        if let Some((data_type, field)) = invalid {
            return Err(Error::InvalidOperation(format!(
                "partition value {:?} is not a valid {}",
                field, data_type
            )));
        }

        match types.len() {
            0 => return Ok(UNPARTITIONED_ID.to_string()),
            1 => {
                if let Some(id) = direct_id(&types[0], &self.value[0]) {
                    return Ok(id);
                }
                tracing::debug!(
                    data_type = %types[0],
                    "Single-column partition id uses the hash form"
                );
            }
            _ if mode == IdentifierMode::Legacy && types.iter().all(DataType::is_integral) => {
                let parts = types
                    .iter()
                    .zip(&self.value)
                    .map(|(t, f)| text::id_component(t, f))
                    .collect::<Option<Vec<_>>>();
                if let Some(parts) = parts {
                    return Ok(parts.iter().join("-"));
                }
            }
            _ => {}
        }

        let bytes = binary::encode_row(&types, &self.value)?;
        Ok(format!("{:032x}", xxh3_128(&bytes)))
    }

    /// Reverses [`get_id_for`] where the identifier is the value itself.
    ///
    /// Returns `None` for hash-form and multi-column identifiers, whose value
    /// has to be read from the part's `partition.dat` instead, and for any
    /// identifier that the value would not render back to exactly.
    ///
    /// [`get_id_for`]: Partition::get_id_for
    pub fn try_parse_value_from_id(id: &str, sample: &Block) -> Option<Row> {
        match sample.columns() {
            [] => (id == UNPARTITIONED_ID).then(Vec::new),
            [column] => {
                let field = parse_direct(&column.data_type, id)?;
                (direct_id(&column.data_type, &field).as_deref() == Some(id)).then(|| vec![field])
            }
            _ => None,
        }
    }
}

/// Direct rendering of a single-column value, if it has one.
fn direct_id(data_type: &DataType, field: &Field) -> Option<String> {
    match data_type {
        DataType::String => field.as_str().filter(|s| is_direct_string(s)).map(str::to_string),
        ty if ty.is_integral() => text::id_component(ty, field),
        _ => None,
    }
}

/// Strings that are safe as a directory name and cannot be mistaken for a hash.
fn is_direct_string(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_alphanumeric() || *first == b'_' => {}
        _ => return false,
    }
    bytes.len() <= MAX_DIRECT_ID_LENGTH
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
        && !looks_like_hash(s)
}

fn looks_like_hash(s: &str) -> bool {
    s.len() == HASH_ID_LENGTH && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn parse_direct(data_type: &DataType, id: &str) -> Option<Field> {
    let field = match data_type {
        DataType::String => Field::from(id),
        DataType::Date => {
            let days = date::days_from_date(date::parse_yyyymmdd(id)?)?;
            Field::UInt(days as u64)
        }
        ty if ty.is_signed_integer() => Field::Int(id.parse().ok()?),
        ty if ty.is_integral() => Field::UInt(id.parse().ok()?),
        _ => return None,
    };
    data_type.accepts(&field).then_some(field)
}
