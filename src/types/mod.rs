//! Column types and scalar values.
//!
//! A [`Field`] is the untyped scalar a column holds at one row; its
//! interpretation (width, signedness, calendar meaning) always comes from the
//! [`DataType`] of the column it was read from. Date, DateTime and Bool values
//! travel as [`Field::UInt`].

pub mod date;

use std::fmt;

/// Column data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    /// Days since 1970-01-01, stored in 16 bits.
    Date,
    /// Seconds since the Unix epoch (UTC), stored in 32 bits.
    DateTime,
    String,
    Nullable(Box<DataType>),
}

impl DataType {
    pub fn nullable(inner: DataType) -> Self {
        match inner {
            DataType::Nullable(_) => inner,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    /// The type with any Nullable wrapper stripped.
    pub fn remove_nullable(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner,
            other => other,
        }
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
        )
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_integer(&self) -> bool {
        self.is_unsigned_integer() || self.is_signed_integer()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    pub fn is_date_or_datetime(&self) -> bool {
        matches!(self, DataType::Date | DataType::DateTime)
    }

    /// Types whose values are whole numbers and can be named by their decimal
    /// rendering.
    pub fn is_integral(&self) -> bool {
        self.is_integer() || self.is_date_or_datetime() || *self == DataType::Bool
    }

    /// Width in bytes of the fixed-size encoding, `None` for String and
    /// Nullable.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            DataType::UInt8 | DataType::Int8 | DataType::Bool => Some(1),
            DataType::UInt16 | DataType::Int16 | DataType::Date => Some(2),
            DataType::UInt32 | DataType::Int32 | DataType::Float32 | DataType::DateTime => {
                Some(4)
            }
            DataType::UInt64 | DataType::Int64 | DataType::Float64 => Some(8),
            DataType::String | DataType::Nullable(_) => None,
        }
    }

    /// Unsigned integer type of the given byte width.
    pub fn unsigned_of_width(width: usize) -> DataType {
        match width {
            1 => DataType::UInt8,
            2 => DataType::UInt16,
            4 => DataType::UInt32,
            _ => DataType::UInt64,
        }
    }

    /// Signed integer type of the given byte width.
    pub fn signed_of_width(width: usize) -> DataType {
        match width {
            1 => DataType::Int8,
            2 => DataType::Int16,
            4 => DataType::Int32,
            _ => DataType::Int64,
        }
    }

    /// Inclusive value range of an integral type.
    pub fn integral_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            DataType::Bool => (0, 1),
            DataType::UInt8 => (0, u8::MAX as i128),
            DataType::UInt16 | DataType::Date => (0, u16::MAX as i128),
            DataType::UInt32 | DataType::DateTime => (0, u32::MAX as i128),
            DataType::UInt64 => (0, u64::MAX as i128),
            DataType::Int8 => (i8::MIN as i128, i8::MAX as i128),
            DataType::Int16 => (i16::MIN as i128, i16::MAX as i128),
            DataType::Int32 => (i32::MIN as i128, i32::MAX as i128),
            DataType::Int64 => (i64::MIN as i128, i64::MAX as i128),
            _ => return None,
        };
        Some(range)
    }

    /// Whether `field` is a valid value of this type, in its canonical form.
    ///
    /// Signed integers are `Field::Int`, every other integral type is
    /// `Field::UInt`, and a Float32 value must be exactly representable as
    /// `f32`. See [`DataType::normalize`].
    pub fn accepts(&self, field: &Field) -> bool {
        match (self, field) {
            (DataType::Nullable(_), Field::Null) => true,
            (DataType::Nullable(inner), other) => inner.accepts(other),
            (_, Field::Null) => false,
            (DataType::String, Field::String(_)) => true,
            (DataType::Float64, Field::Float(_)) => true,
            (DataType::Float32, Field::Float(v)) => (*v as f32 as f64).to_bits() == v.to_bits(),
            (ty, Field::Int(v)) if ty.is_signed_integer() => ty.in_range(*v as i128),
            (ty, Field::UInt(v)) if ty.is_integral() && !ty.is_signed_integer() => {
                ty.in_range(*v as i128)
            }
            _ => false,
        }
    }

    fn in_range(&self, value: i128) -> bool {
        self.integral_range()
            .is_some_and(|(min, max)| (min..=max).contains(&value))
    }

    /// Canonical form of `field` as a value of this type.
    ///
    /// Integers move to the variant matching the type's signedness when the
    /// value fits, and Float32 values are rounded through `f32` the way
    /// `partition.dat` stores them. Anything else is returned unchanged, so
    /// invalid values still fail [`DataType::accepts`].
    pub fn normalize(&self, field: Field) -> Field {
        match (self, field) {
            (DataType::Nullable(inner), field) if !field.is_null() => inner.normalize(field),
            (DataType::Float32, Field::Float(v)) => Field::Float(v as f32 as f64),
            (ty, Field::UInt(v)) if ty.is_signed_integer() && v <= i64::MAX as u64 => {
                Field::Int(v as i64)
            }
            (ty, Field::Int(v)) if ty.is_integral() && !ty.is_signed_integer() && v >= 0 => {
                Field::UInt(v as u64)
            }
            (_, field) => field,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::UInt8 => write!(f, "UInt8"),
            DataType::UInt16 => write!(f, "UInt16"),
            DataType::UInt32 => write!(f, "UInt32"),
            DataType::UInt64 => write!(f, "UInt64"),
            DataType::Int8 => write!(f, "Int8"),
            DataType::Int16 => write!(f, "Int16"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float32 => write!(f, "Float32"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::Bool => write!(f, "Bool"),
            DataType::Date => write!(f, "Date"),
            DataType::DateTime => write!(f, "DateTime"),
            DataType::String => write!(f, "String"),
            DataType::Nullable(inner) => write!(f, "Nullable({})", inner),
        }
    }
}

/// A scalar value.
#[derive(Debug, Clone)]
pub enum Field {
    Null,
    UInt(u64),
    Int(i64),
    Float(f64),
    String(String),
}

/// One value per key column.
pub type Row = Vec<Field>;

impl Field {
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Integer view of the field, for both signed and unsigned values.
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Field::UInt(v) => Some(*v as i128),
            Field::Int(v) => Some(*v as i128),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that equal partition values always yield
// equal identifiers, NaN included.
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::Null, Field::Null) => true,
            (Field::UInt(a), Field::UInt(b)) => a == b,
            (Field::Int(a), Field::Int(b)) => a == b,
            (Field::Float(a), Field::Float(b)) => a.to_bits() == b.to_bits(),
            (Field::String(a), Field::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Field {}

impl From<u64> for Field {
    fn from(v: u64) -> Self {
        Field::UInt(v)
    }
}

impl From<u32> for Field {
    fn from(v: u32) -> Self {
        Field::UInt(v as u64)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Int(v)
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Float(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::String(v.to_string())
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::String(v)
    }
}

/// Column name paired with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndType {
    pub name: String,
    pub data_type: DataType,
}

impl NameAndType {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}
