//! The partition value of a single part.
//!
//! A [`Partition`] holds one value per partition key column. It is computed
//! once when a part is built, named through [`Partition::get_id`], persisted
//! into the part's `partition.dat`, and read back whenever the part is
//! reopened. There is no way to change the value of an existing part.
//!
//! # Lifecycle
//!
//! ```text
//!   block ──execute_partition_by_expression──► key columns
//!                                                   │
//!                                    create(row) ───┘
//!                                        │
//!                 get_id ◄───── Partition ─────► store ──► partition.dat
//!                                        ▲                      │
//!                                        └──────── load ◄───────┘
//! ```

mod id;
mod store;
mod text;

pub use id::{HASH_ID_LENGTH, MAX_DIRECT_ID_LENGTH, UNPARTITIONED_ID};
pub use store::PARTITION_FILE_NAME;

use crate::block::Block;
use crate::error::Result;
use crate::expr::ExecutionContext;
use crate::key::{KeyDescription, StorageMetadata, Table};
use crate::types::{Field, NameAndType, Row};
use crate::Error;

/// Function renamed by [`Partition::adjust_partition_key`], and its replacement.
const MODULO: &str = "modulo";
const MODULO_LEGACY: &str = "moduloLegacy";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub value: Row,
}

impl Partition {
    pub fn new(value: Row) -> Self {
        Self { value }
    }

    /// Partition of a month-partitioned table, given as `YYYYMM`.
    pub fn from_yyyymm(yyyymm: u32) -> Self {
        Self {
            value: vec![Field::from(yyyymm)],
        }
    }

    pub fn assign(&mut self, other: &Partition) {
        self.value = other.value.clone();
    }

    /// Evaluates the table's partition key on the block, appending the key
    /// columns, and returns their names and types.
    pub fn execute_partition_by_expression(
        table: &Table,
        block: &mut Block,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NameAndType>> {
        let key = table.partition_key();
        ctx.execute(&key.expression_list, block)?;
        Ok(key.names_and_types())
    }

    /// Partition value of `row` in `block`.
    pub fn create(
        table: &Table,
        mut block: Block,
        row: usize,
        ctx: &ExecutionContext,
    ) -> Result<Self> {
        if !table.has_partition_key() {
            return Ok(Self::default());
        }

        let key_columns = Self::execute_partition_by_expression(table, &mut block, ctx)?;
        if row >= block.rows() {
            return Err(Error::InvalidOperation(format!(
                "row {} is out of range for a block of {} rows",
                row,
                block.rows()
            )));
        }

        let value = key_columns
            .iter()
            .map(|column| Ok(block.get_by_name(&column.name)?.data[row].clone()))
            .collect::<Result<Row>>()?;
        Ok(Self { value })
    }

    /// Partition value of a block holding exactly two rows, the minimum and
    /// maximum of a sorted range, after checking both rows agree on every key
    /// column. A disagreement means the range spans several partitions.
    ///
    /// Only the two boundary rows are inspected; the rows in between are
    /// assumed to have been partitioned upstream.
    pub fn create_and_validate_min_max_partition_ids(
        table: &Table,
        mut block_with_min_max: Block,
        ctx: &ExecutionContext,
    ) -> Result<Self> {
        if !table.has_partition_key() {
            return Ok(Self::default());
        }

        let key_columns =
            Self::execute_partition_by_expression(table, &mut block_with_min_max, ctx)?;

        let mut value = Row::with_capacity(key_columns.len());
        for column in &key_columns {
            let partition_column = block_with_min_max.get_by_name(&column.name)?;
            if partition_column.len() != 2 {
                return Err(Error::InvalidOperation(format!(
                    "partition column {} should have two rows, has {}",
                    column.name,
                    partition_column.len()
                )));
            }

            let (min, max) = (&partition_column.data[0], &partition_column.data[1]);
            if min != max {
                tracing::debug!(
                    column = %column.name,
                    ?min,
                    ?max,
                    "Min/max partition values differ"
                );
                return Err(Error::InvalidPartitionValue(format!(
                    "can not create the partition, a partition can not contain values that have \
                     different partition ids: {} is {:?} at the minimum and {:?} at the maximum",
                    column.name, min, max
                )));
            }
            value.push(min.clone());
        }
        Ok(Self { value })
    }

    /// Copy of the table's declared partition key with `modulo` replaced by
    /// `moduloLegacy` wherever it occurs.
    ///
    /// Parts written before `modulo` got its wider result type were named and
    /// stored with the old semantics; partition pruning uses this key to
    /// compute values comparable with theirs. The declared key is never
    /// modified, and a key without `modulo` comes back equivalent to it.
    pub fn adjust_partition_key(
        metadata: &StorageMetadata,
        ctx: &ExecutionContext,
    ) -> Result<KeyDescription> {
        let key = &metadata.partition_key;
        if key.is_empty() || !key.definition.contains_function(MODULO) {
            return Ok(key.clone());
        }

        let adjusted = key.definition.rename_function(MODULO, MODULO_LEGACY);
        tracing::debug!(from = %key.definition, to = %adjusted, "Adjusted partition key");
        KeyDescription::new(adjusted, &metadata.columns, ctx)
    }

    /// Appends the names of the files a partition contributes to a part of
    /// this table.
    pub fn append_files(table: &Table, files: &mut Vec<String>) {
        if table.has_partition_key() {
            files.push(PARTITION_FILE_NAME.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Column;
    use crate::config::StorageSettings;
    use crate::expr::Expr;
    use crate::types::DataType;

    fn columns() -> Vec<NameAndType> {
        vec![
            NameAndType::new("date", DataType::Date),
            NameAndType::new("userId", DataType::UInt64),
        ]
    }

    fn table_with_key(definition: Expr, settings: StorageSettings) -> Table {
        let ctx = ExecutionContext::default();
        let key = KeyDescription::new(definition, &columns(), &ctx).unwrap();
        Table::new(StorageMetadata::new(columns(), key), settings, &ctx).unwrap()
    }

    fn month_and_bucket() -> Expr {
        Expr::Tuple(vec![
            Expr::function("toYYYYMM", vec![Expr::column("date")]),
            Expr::function("modulo", vec![Expr::column("userId"), Expr::uint(16)]),
        ])
    }

    fn block(dates: &[u64], users: &[u64]) -> Block {
        Block::new(vec![
            Column::new("date", DataType::Date, dates.iter().copied().map(Field::UInt).collect()),
            Column::new(
                "userId",
                DataType::UInt64,
                users.iter().copied().map(Field::UInt).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_extracts_row() {
        let table = table_with_key(month_and_bucket(), StorageSettings::default());
        let ctx = ExecutionContext::default();

        // 2023-09-15 and 2023-10-01
        let partition =
            Partition::create(&table, block(&[19615, 19631], &[42, 7]), 1, &ctx).unwrap();
        assert_eq!(partition.value, vec![Field::UInt(202310), Field::UInt(7)]);

        let result = Partition::create(&table, block(&[19615], &[42]), 3, &ctx);
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_create_without_key() {
        let table = table_with_key(Expr::Tuple(vec![]), StorageSettings::default());
        let ctx = ExecutionContext::default();
        let partition = Partition::create(&table, block(&[1], &[1]), 0, &ctx).unwrap();
        assert!(partition.value.is_empty());
    }

    #[test]
    fn test_min_max_validation() {
        let table = table_with_key(month_and_bucket(), StorageSettings::default());
        let ctx = ExecutionContext::default();

        // Different days, same month and bucket
        let partition = Partition::create_and_validate_min_max_partition_ids(
            &table,
            block(&[19601, 19630], &[16, 32]),
            &ctx,
        )
        .unwrap();
        assert_eq!(partition.value, vec![Field::UInt(202309), Field::UInt(0)]);

        // 2023-09-15 .. 2023-10-15
        let result = Partition::create_and_validate_min_max_partition_ids(
            &table,
            block(&[19615, 19645], &[16, 16]),
            &ctx,
        );
        assert!(matches!(result, Err(Error::InvalidPartitionValue(_))));

        let result = Partition::create_and_validate_min_max_partition_ids(
            &table,
            block(&[19615, 19615, 19615], &[1, 1, 1]),
            &ctx,
        );
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_min_max_over_mixed_integer_forms() {
        let ctx = ExecutionContext::default();
        let columns = vec![NameAndType::new("delta", DataType::Int64)];
        let key = KeyDescription::new(Expr::column("delta"), &columns, &ctx).unwrap();
        let table = Table::new(StorageMetadata::new(columns, key), StorageSettings::default(), &ctx)
            .unwrap();

        let block = Block::new(vec![Column::new(
            "delta",
            DataType::Int64,
            vec![Field::UInt(5), Field::Int(5)],
        )])
        .unwrap();
        let partition =
            Partition::create_and_validate_min_max_partition_ids(&table, block, &ctx).unwrap();
        assert_eq!(partition.value, vec![Field::Int(5)]);
        assert_eq!(partition.get_id(&table).unwrap(), "5");
    }

    #[test]
    fn test_failed_validation_keeps_existing_value() {
        let table = table_with_key(month_and_bucket(), StorageSettings::default());
        let ctx = ExecutionContext::default();

        let mut partition = Partition::new(vec![Field::UInt(202301), Field::UInt(3)]);
        let before = partition.clone();
        if let Ok(created) = Partition::create_and_validate_min_max_partition_ids(
            &table,
            block(&[19615, 19645], &[0, 0]),
            &ctx,
        ) {
            partition.assign(&created);
        }
        assert_eq!(partition, before);
    }

    #[test]
    fn test_adjust_partition_key() {
        let table = table_with_key(month_and_bucket(), StorageSettings::default());
        let ctx = ExecutionContext::default();

        let adjusted = Partition::adjust_partition_key(&table.metadata, &ctx).unwrap();
        assert_eq!(
            adjusted.column_names,
            vec!["toYYYYMM(date)", "moduloLegacy(userId, 16)"]
        );
        assert_eq!(adjusted.data_types, vec![DataType::UInt32, DataType::UInt8]);
        // The declared key is untouched
        assert_eq!(
            table.metadata.partition_key.column_names,
            vec!["toYYYYMM(date)", "modulo(userId, 16)"]
        );
    }

    #[test]
    fn test_adjust_without_modulo_is_equivalent() {
        let definition = Expr::function("toYYYYMM", vec![Expr::column("date")]);
        let table = table_with_key(definition, StorageSettings::default());
        let ctx = ExecutionContext::default();

        let adjusted = Partition::adjust_partition_key(&table.metadata, &ctx).unwrap();
        assert_eq!(&adjusted, table.partition_key());
    }

    #[test]
    fn test_legacy_modulo_table_builds_with_adjusted_key() {
        let table = table_with_key(
            month_and_bucket(),
            StorageSettings::default().legacy_modulo_key(true),
        );
        let ctx = ExecutionContext::default();

        let mut rows = block(&[19615], &[42]);
        let columns = Partition::execute_partition_by_expression(&table, &mut rows, &ctx).unwrap();
        assert_eq!(columns[1], NameAndType::new("moduloLegacy(userId, 16)", DataType::UInt8));
        assert!(rows.has("moduloLegacy(userId, 16)"));
        assert!(!rows.has("modulo(userId, 16)"));
    }

    #[test]
    fn test_append_files() {
        let mut files = vec!["checksums.bin".to_string()];
        Partition::append_files(
            &table_with_key(month_and_bucket(), StorageSettings::default()),
            &mut files,
        );
        assert_eq!(files, vec!["checksums.bin", PARTITION_FILE_NAME]);

        let mut files = Vec::new();
        Partition::append_files(
            &table_with_key(Expr::Tuple(vec![]), StorageSettings::default()),
            &mut files,
        );
        assert!(files.is_empty());
    }
}
