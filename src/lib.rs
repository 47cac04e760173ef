//! Partition values for the immutable parts of a columnar table.
//!
//! A table's partition key is evaluated on each batch of rows; the resulting
//! [`Partition`] names the part through [`Partition::get_id`] and is stored
//! in the part's `partition.dat` so it can be reloaded without evaluating
//! the key again.

pub mod block;
pub mod config;
pub mod encoding;
pub mod error;
pub mod expr;
pub mod hasher;
pub mod key;
pub mod part;
pub mod partition;
pub mod types;

pub use block::{Block, Column};
pub use config::{
    DateStyle, EvalSettings, FormatSettings, IdentifierMode, StorageSettings, WriteSettings,
};
pub use error::{Error, Result};
pub use expr::{ExecutionContext, Expr, FunctionRegistry, ScalarFunction};
pub use hasher::Hasher;
pub use key::{KeyDescription, StorageMetadata, Table};
pub use part::{Checksums, DiskPartStorage, MetadataReader, PartFileWriter, PartStorage};
pub use partition::{Partition, PARTITION_FILE_NAME, UNPARTITIONED_ID};
pub use types::{DataType, Field, NameAndType, Row};
