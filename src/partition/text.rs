use super::Partition;
use crate::config::FormatSettings;
use crate::encoding::text;
use crate::error::Result;
use crate::key::Table;
use crate::Error;

use itertools::Itertools;
use std::io::{self, Write};

impl Partition {
    /// Writes the value as literals, for display only. Never read back.
    ///
    /// `tuple()` for an unpartitioned table, the bare literal for one key
    /// column, a parenthesized list otherwise.
    pub fn serialize_text(
        &self,
        table: &Table,
        out: &mut impl io::Write,
        settings: &FormatSettings,
    ) -> Result<()> {
        let types = &table.partition_key().data_types;
        if types.len() != self.value.len() {
            return Err(Error::InvalidOperation(format!(
                "partition value has {} fields but the key has {} columns",
                self.value.len(),
                types.len()
            )));
        }

        let literals: Vec<String> = types
            .iter()
            .zip(&self.value)
            .map(|(data_type, field)| text::literal(data_type, field, settings))
            .collect();

        match literals.as_slice() {
            [] => out.write_all(b"tuple()")?,
            [single] => out.write_all(single.as_bytes())?,
            many => write!(out, "({})", many.iter().join(", "))?,
        }
        Ok(())
    }

    pub fn to_text(&self, table: &Table, settings: &FormatSettings) -> Result<String> {
        let mut out = Vec::new();
        self.serialize_text(table, &mut out, settings)?;
        String::from_utf8(out).map_err(|e| Error::InvalidOperation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DateStyle, StorageSettings};
    use crate::expr::{ExecutionContext, Expr};
    use crate::key::{KeyDescription, StorageMetadata};
    use crate::types::{DataType, Field, NameAndType};

    fn table(definition: Expr) -> Table {
        let ctx = ExecutionContext::default();
        let columns = vec![
            NameAndType::new("date", DataType::Date),
            NameAndType::new("region", DataType::String),
        ];
        let key = KeyDescription::new(definition, &columns, &ctx).unwrap();
        Table::new(StorageMetadata::new(columns, key), StorageSettings::default(), &ctx).unwrap()
    }

    #[test]
    fn test_single_column() {
        let table = table(Expr::column("date"));
        let partition = Partition::new(vec![Field::UInt(19615)]);

        let iso = FormatSettings::default();
        assert_eq!(partition.to_text(&table, &iso).unwrap(), "'2023-09-15'");

        let compact = FormatSettings::default().date_style(DateStyle::Compact);
        assert_eq!(partition.to_text(&table, &compact).unwrap(), "20230915");
    }

    #[test]
    fn test_tuple_and_empty() {
        let table_two = table(Expr::Tuple(vec![
            Expr::function("toYYYYMM", vec![Expr::column("date")]),
            Expr::column("region"),
        ]));
        let partition = Partition::new(vec![Field::UInt(202309), Field::from("eu")]);
        assert_eq!(
            partition.to_text(&table_two, &FormatSettings::default()).unwrap(),
            "(202309, 'eu')"
        );

        let unpartitioned = table(Expr::Tuple(vec![]));
        assert_eq!(
            Partition::default()
                .to_text(&unpartitioned, &FormatSettings::default())
                .unwrap(),
            "tuple()"
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let table = table(Expr::column("date"));
        let mut out = Vec::new();
        let result =
            Partition::default().serialize_text(&table, &mut out, &FormatSettings::default());
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
        assert!(out.is_empty());
    }
}
