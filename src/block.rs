use crate::error::Result;
use crate::types::{DataType, Field, NameAndType};
use crate::Error;

/// A named, typed column of values.
///
/// Values are kept in the canonical form of the column type, see
/// [`DataType::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub data: Vec<Field>,
    /// Set when the column comes from a literal. Kept even for zero rows.
    pub constant: Option<Field>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, data: Vec<Field>) -> Self {
        let data = data.into_iter().map(|v| data_type.normalize(v)).collect();
        Self {
            name: name.into(),
            data_type,
            data,
            constant: None,
        }
    }

    /// A column with the same value repeated `rows` times.
    pub fn constant(
        name: impl Into<String>,
        data_type: DataType,
        value: Field,
        rows: usize,
    ) -> Self {
        let value = data_type.normalize(value);
        Self {
            constant: Some(value.clone()),
            ..Self::new(name, data_type, vec![value; rows])
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Field> {
        self.data.get(row)
    }

    /// The literal value of a constant column.
    pub fn constant_value(&self) -> Option<&Field> {
        self.constant.as_ref()
    }
}

/// A batch of rows stored column by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    columns: Vec<Column>,
}

impl Block {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut block = Self::default();
        for column in columns {
            block.insert(column)?;
        }
        Ok(block)
    }

    /// Block with no rows, carrying only names and types.
    pub fn sample(names_and_types: &[NameAndType]) -> Self {
        Self {
            columns: names_and_types
                .iter()
                .map(|nt| Column::new(nt.name.clone(), nt.data_type.clone(), Vec::new()))
                .collect(),
        }
    }

    /// Number of rows, zero when the block has no columns.
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn get_by_name(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownIdentifier(format!("no column {} in block", name)))
    }

    /// Appends a column. Its length must match the existing rows.
    pub fn insert(&mut self, column: Column) -> Result<()> {
        if self.has(&column.name) {
            return Err(Error::InvalidOperation(format!(
                "column {} already exists in block",
                column.name
            )));
        }
        if !self.columns.is_empty() && column.len() != self.rows() {
            return Err(Error::InvalidOperation(format!(
                "column {} has {} rows, block has {}",
                column.name,
                column.len(),
                self.rows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn names_and_types(&self) -> Vec<NameAndType> {
        self.columns
            .iter()
            .map(|c| NameAndType::new(c.name.clone(), c.data_type.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u64]) -> Column {
        Column::new(
            "id",
            DataType::UInt64,
            values.iter().copied().map(Field::UInt).collect(),
        )
    }

    #[test]
    fn test_block_rows_and_lookup() {
        let block = Block::new(vec![
            ids(&[1, 2, 3]),
            Column::constant("tag", DataType::String, Field::from("a"), 3),
        ])
        .unwrap();

        assert_eq!(block.rows(), 3);
        assert_eq!(block.column_count(), 2);
        assert_eq!(block.get_by_name("tag").unwrap().constant_value(), Some(&Field::from("a")));
        assert!(matches!(
            block.get_by_name("missing"),
            Err(Error::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_columns_hold_canonical_values() {
        let signed = Column::new("i", DataType::Int64, vec![Field::UInt(5), Field::Int(5)]);
        assert_eq!(signed.data, vec![Field::Int(5), Field::Int(5)]);

        let float = Column::new("f", DataType::Float32, vec![Field::Float(0.1)]);
        assert_eq!(float.data, vec![Field::Float(0.1f32 as f64)]);

        // The literal survives an empty block
        let empty = Column::constant("'/'", DataType::String, Field::from("/"), 0);
        assert!(empty.is_empty());
        assert_eq!(empty.constant_value(), Some(&Field::from("/")));
        assert_eq!(ids(&[7, 7]).constant_value(), None);
    }

    #[test]
    fn test_insert_rejects_mismatched_length() {
        let mut block = Block::new(vec![ids(&[1, 2])]).unwrap();
        let result = block.insert(Column::new("x", DataType::UInt8, vec![Field::UInt(1)]));
        assert!(result.is_err());
        assert!(block.insert(ids(&[5, 6])).is_err(), "duplicate name");
    }

    #[test]
    fn test_sample_has_no_rows() {
        let sample = Block::sample(&[NameAndType::new("d", DataType::Date)]);
        assert_eq!(sample.rows(), 0);
        assert_eq!(sample.names_and_types(), vec![NameAndType::new("d", DataType::Date)]);
    }
}
