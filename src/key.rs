//! Partition key descriptions and the table context they live in.

use crate::block::Block;
use crate::config::StorageSettings;
use crate::error::Result;
use crate::expr::{ExecutionContext, Expr};
use crate::partition::Partition;
use crate::types::{DataType, NameAndType};
use crate::Error;

use std::sync::Arc;

/// The partition key of a table: its definition, the per-column expressions,
/// and the names and types of the columns those expressions produce.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDescription {
    pub definition: Expr,
    pub expression_list: Vec<Expr>,
    /// Empty block with one column per key expression.
    pub sample_block: Block,
    pub column_names: Vec<String>,
    pub data_types: Vec<DataType>,
}

impl KeyDescription {
    /// Describes `definition` over a table with the given columns.
    ///
    /// A tuple definition yields one key column per element, the empty tuple
    /// meaning "unpartitioned"; any other expression yields a single column.
    pub fn new(definition: Expr, columns: &[NameAndType], ctx: &ExecutionContext) -> Result<Self> {
        let expression_list = match &definition {
            Expr::Tuple(items) => items.clone(),
            single => vec![single.clone()],
        };

        let mut sample = Vec::with_capacity(expression_list.len());
        for expr in &expression_list {
            let data_type = ctx.infer_type(expr, columns)?;
            if data_type.is_nullable() && !ctx.settings.allow_nullable_key {
                return Err(Error::IllegalKey(format!(
                    "partition key {} has Nullable type {}, enable allow_nullable_key to use it",
                    expr, data_type
                )));
            }
            sample.push(NameAndType::new(expr.to_string(), data_type));
        }

        Ok(Self {
            definition,
            column_names: sample.iter().map(|c| c.name.clone()).collect(),
            data_types: sample.iter().map(|c| c.data_type.clone()).collect(),
            sample_block: Block::sample(&sample),
            expression_list,
        })
    }

    /// Key of an unpartitioned table.
    pub fn empty() -> Self {
        Self {
            definition: Expr::Tuple(Vec::new()),
            expression_list: Vec::new(),
            sample_block: Block::default(),
            column_names: Vec::new(),
            data_types: Vec::new(),
        }
    }

    /// The monthly key `toYYYYMM(date_column)` used by month-partitioned tables.
    pub fn month(
        date_column: &str,
        columns: &[NameAndType],
        ctx: &ExecutionContext,
    ) -> Result<Self> {
        Self::new(
            Expr::function("toYYYYMM", vec![Expr::column(date_column)]),
            columns,
            ctx,
        )
    }

    pub fn column_count(&self) -> usize {
        self.expression_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expression_list.is_empty()
    }

    pub fn names_and_types(&self) -> Vec<NameAndType> {
        self.sample_block.names_and_types()
    }
}

/// Schema-level metadata of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageMetadata {
    pub columns: Vec<NameAndType>,
    pub partition_key: KeyDescription,
}

impl StorageMetadata {
    pub fn new(columns: Vec<NameAndType>, partition_key: KeyDescription) -> Self {
        Self {
            columns,
            partition_key,
        }
    }

    pub fn has_partition_key(&self) -> bool {
        !self.partition_key.is_empty()
    }
}

/// A table as seen by partition handling: shared metadata, settings, and the
/// partition key parts are actually built with.
#[derive(Debug, Clone)]
pub struct Table {
    pub metadata: Arc<StorageMetadata>,
    pub settings: StorageSettings,
    partition_key: Arc<KeyDescription>,
}

impl Table {
    /// Resolves the effective partition key: the declared one, or its legacy
    /// adjustment when the table was created with `legacy_modulo_key`.
    pub fn new(
        metadata: StorageMetadata,
        settings: StorageSettings,
        ctx: &ExecutionContext,
    ) -> Result<Self> {
        let partition_key = if settings.legacy_modulo_key {
            Partition::adjust_partition_key(&metadata, ctx)?
        } else {
            metadata.partition_key.clone()
        };
        Ok(Self {
            metadata: Arc::new(metadata),
            settings,
            partition_key: Arc::new(partition_key),
        })
    }

    /// Key used to compute, name, store and load partition values.
    pub fn partition_key(&self) -> &KeyDescription {
        &self.partition_key
    }

    pub fn has_partition_key(&self) -> bool {
        !self.partition_key.is_empty()
    }
}
