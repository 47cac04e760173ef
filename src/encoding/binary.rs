//! Fixed binary layout for partition values.
//!
//! Each field is encoded according to its column type, little-endian, with no
//! per-field tags: the reader must know the key's types to decode. The same
//! bytes feed the identifier hash, so the layout is a compatibility contract.
//!
//! ```text
//! UInt8 / Int8 / Bool          1 byte
//! UInt16 / Int16 / Date        2 bytes
//! UInt32 / Int32 / Float32 /
//! DateTime                     4 bytes
//! UInt64 / Int64 / Float64     8 bytes
//! String                       LEB128 length + bytes
//! Nullable(T)                  u8 null flag (1 = NULL), then T if not NULL
//! ```

use super::EncodingError;
use crate::error::Result;
use crate::types::{DataType, Field, Row};
use crate::Error;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read};

/// Longest string accepted on decode, guards against garbage lengths.
const MAX_STRING_SIZE: u64 = 1 << 30;

fn type_mismatch(data_type: &DataType, field: &Field) -> Error {
    Error::InvalidOperation(format!(
        "value {:?} is not a valid {}",
        field, data_type
    ))
}

fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        EncodingError::TruncatedData.into()
    } else {
        Error::ReadError("partition value", err)
    }
}

pub fn write_var_uint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

pub fn read_var_uint(cursor: &mut Cursor<&[u8]>) -> Result<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        let byte = cursor.read_u8().map_err(truncated)?;
        value |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(EncodingError::InvalidFormat("varint longer than 10 bytes".to_string()).into())
}

/// Appends the encoding of `field` as a value of `data_type`.
pub fn encode_field(data_type: &DataType, field: &Field, buf: &mut Vec<u8>) -> Result<()> {
    if !data_type.accepts(field) {
        return Err(type_mismatch(data_type, field));
    }

    // Range was checked by accepts(), the casts below cannot truncate.
    let int = field.to_i128().unwrap_or_default();
    match (data_type, field) {
        (DataType::Nullable(_), Field::Null) => buf.push(1),
        (DataType::Nullable(inner), value) => {
            buf.push(0);
            encode_field(inner, value, buf)?;
        }
        (DataType::UInt8 | DataType::Bool, _) => buf.write_u8(int as u8)?,
        (DataType::UInt16 | DataType::Date, _) => buf.write_u16::<LittleEndian>(int as u16)?,
        (DataType::UInt32 | DataType::DateTime, _) => buf.write_u32::<LittleEndian>(int as u32)?,
        (DataType::UInt64, _) => buf.write_u64::<LittleEndian>(int as u64)?,
        (DataType::Int8, _) => buf.write_i8(int as i8)?,
        (DataType::Int16, _) => buf.write_i16::<LittleEndian>(int as i16)?,
        (DataType::Int32, _) => buf.write_i32::<LittleEndian>(int as i32)?,
        (DataType::Int64, _) => buf.write_i64::<LittleEndian>(int as i64)?,
        (DataType::Float32, Field::Float(v)) => buf.write_f32::<LittleEndian>(*v as f32)?,
        (DataType::Float64, Field::Float(v)) => buf.write_f64::<LittleEndian>(*v)?,
        (DataType::String, Field::String(s)) => {
            write_var_uint(buf, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        _ => return Err(type_mismatch(data_type, field)),
    }
    Ok(())
}

/// Reads one value of `data_type` from the cursor.
pub fn decode_field(data_type: &DataType, cursor: &mut Cursor<&[u8]>) -> Result<Field> {
    let field = match data_type {
        DataType::Nullable(inner) => match cursor.read_u8().map_err(truncated)? {
            0 => decode_field(inner, cursor)?,
            1 => Field::Null,
            flag => {
                return Err(EncodingError::InvalidFormat(format!(
                    "invalid null flag {}",
                    flag
                ))
                .into())
            }
        },
        DataType::UInt8 => Field::UInt(cursor.read_u8().map_err(truncated)? as u64),
        DataType::Bool => match cursor.read_u8().map_err(truncated)? {
            b @ (0 | 1) => Field::UInt(b as u64),
            b => {
                return Err(EncodingError::InvalidFormat(format!("invalid bool byte {}", b)).into())
            }
        },
        DataType::UInt16 | DataType::Date => {
            Field::UInt(cursor.read_u16::<LittleEndian>().map_err(truncated)? as u64)
        }
        DataType::UInt32 | DataType::DateTime => {
            Field::UInt(cursor.read_u32::<LittleEndian>().map_err(truncated)? as u64)
        }
        DataType::UInt64 => Field::UInt(cursor.read_u64::<LittleEndian>().map_err(truncated)?),
        DataType::Int8 => Field::Int(cursor.read_i8().map_err(truncated)? as i64),
        DataType::Int16 => Field::Int(cursor.read_i16::<LittleEndian>().map_err(truncated)? as i64),
        DataType::Int32 => Field::Int(cursor.read_i32::<LittleEndian>().map_err(truncated)? as i64),
        DataType::Int64 => Field::Int(cursor.read_i64::<LittleEndian>().map_err(truncated)?),
        DataType::Float32 => {
            Field::Float(cursor.read_f32::<LittleEndian>().map_err(truncated)? as f64)
        }
        DataType::Float64 => Field::Float(cursor.read_f64::<LittleEndian>().map_err(truncated)?),
        DataType::String => {
            let len = read_var_uint(cursor)?;
            if len > MAX_STRING_SIZE {
                return Err(EncodingError::InvalidFormat(format!(
                    "string length {} is too large",
                    len
                ))
                .into());
            }
            let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position());
            if len > remaining {
                return Err(EncodingError::TruncatedData.into());
            }
            let mut bytes = vec![0u8; len as usize];
            cursor.read_exact(&mut bytes).map_err(truncated)?;
            Field::String(String::from_utf8(bytes).map_err(|_| EncodingError::InvalidUtf8)?)
        }
    };
    Ok(field)
}

/// Encodes a whole row, one field per type.
pub fn encode_row(types: &[DataType], row: &[Field]) -> Result<Vec<u8>> {
    if types.len() != row.len() {
        return Err(Error::InvalidOperation(format!(
            "row has {} values but key has {} columns",
            row.len(),
            types.len()
        )));
    }
    let mut buf = Vec::new();
    for (data_type, field) in types.iter().zip(row) {
        encode_field(data_type, field, &mut buf)?;
    }
    Ok(buf)
}

/// Decodes a row and requires the input to be consumed exactly.
pub fn decode_row(types: &[DataType], bytes: &[u8]) -> Result<Row> {
    let mut cursor = Cursor::new(bytes);
    let row = types
        .iter()
        .map(|t| decode_field(t, &mut cursor))
        .collect::<Result<Row>>()?;

    let remaining = bytes.len() - cursor.position() as usize;
    if remaining != 0 {
        return Err(EncodingError::TrailingBytes(remaining).into());
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_layout() {
        let bytes = encode_row(
            &[DataType::UInt32, DataType::UInt8, DataType::Int16],
            &[Field::UInt(202309), Field::UInt(10), Field::Int(-2)],
        )
        .unwrap();
        assert_eq!(bytes, vec![0x45, 0x16, 0x03, 0x00, 0x0a, 0xfe, 0xff]);
    }

    #[test]
    fn test_string_and_nullable_layout() {
        let types = [DataType::String, DataType::nullable(DataType::UInt16)];
        let bytes = encode_row(&types, &[Field::from("ab"), Field::Null]).unwrap();
        assert_eq!(bytes, vec![2, b'a', b'b', 1]);

        let bytes = encode_row(&types, &[Field::from(""), Field::UInt(7)]).unwrap();
        assert_eq!(bytes, vec![0, 0, 7, 0]);
        assert_eq!(
            decode_row(&types, &bytes).unwrap(),
            vec![Field::from(""), Field::UInt(7)]
        );
    }

    #[test]
    fn test_var_uint() {
        for value in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            write_var_uint(&mut buf, value);
            let mut cursor = Cursor::new(buf.as_slice());
            assert_eq!(read_var_uint(&mut cursor).unwrap(), value);
            assert_eq!(cursor.position() as usize, buf.len());
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let types = [DataType::UInt32];
        assert!(matches!(
            decode_row(&types, &[1, 2, 3]),
            Err(Error::CorruptedData(_))
        ));
        assert!(matches!(
            decode_row(&types, &[1, 2, 3, 4, 5]),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn test_string_length_beyond_input() {
        // 2^30 - 1 bytes announced, two present
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x03, b'a', b'b'];
        assert!(matches!(
            decode_row(&[DataType::String], &bytes),
            Err(Error::CorruptedData(_))
        ));
        assert!(matches!(
            decode_row(&[DataType::String], &[3, b'a', b'b']),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn test_encode_rejects_ill_typed_value() {
        assert!(encode_row(&[DataType::UInt8], &[Field::UInt(1000)]).is_err());
        assert!(encode_row(&[DataType::String], &[Field::Null]).is_err());
        assert!(encode_row(&[DataType::UInt8, DataType::UInt8], &[Field::UInt(1)]).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_utf8_and_flags() {
        assert!(decode_row(&[DataType::String], &[1, 0xff]).is_err());
        assert!(decode_row(&[DataType::nullable(DataType::UInt8)], &[2]).is_err());
        assert!(decode_row(&[DataType::Bool], &[2]).is_err());
    }
}
