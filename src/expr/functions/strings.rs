use super::ScalarFunction;
use crate::block::Column;
use crate::error::Result;
use crate::types::{DataType, Field};
use crate::Error;

/// Appends a character to every non-empty string that does not already end
/// with it. The character must be a constant one-byte string.
pub struct AppendTrailingCharIfAbsent;

impl ScalarFunction for AppendTrailingCharIfAbsent {
    fn name(&self) -> &'static str {
        "appendTrailingCharIfAbsent"
    }

    fn number_of_arguments(&self) -> usize {
        2
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        for (position, arg) in ["first", "second"].iter().zip(args) {
            if *arg != DataType::String {
                return Err(Error::IllegalTypeOfArgument(format!(
                    "illegal type {} of the {} argument of function {}",
                    arg,
                    position,
                    self.name()
                )));
            }
        }
        Ok(DataType::String)
    }

    fn execute(&self, args: &[Column], _result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        let suffix = match args[1].constant_value() {
            Some(Field::String(s)) => s,
            _ => {
                return Err(Error::IllegalColumn(format!(
                    "second argument of function {} must be a constant string",
                    self.name()
                )))
            }
        };
        if suffix.len() != 1 {
            return Err(Error::BadArguments(format!(
                "second argument of function {} must be a one-character string",
                self.name()
            )));
        }
        if rows == 0 {
            return Ok(Vec::new());
        }

        args[0]
            .data
            .iter()
            .map(|value| match value {
                Field::String(s) if !s.is_empty() && !s.ends_with(suffix.as_str()) => {
                    Ok(Field::String(format!("{}{}", s, suffix)))
                }
                Field::String(s) => Ok(Field::String(s.clone())),
                other => Err(Error::IllegalColumn(format!(
                    "illegal value {:?} of argument of function {}",
                    other,
                    self.name()
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::FunctionRegistry;

    fn paths(values: &[&str]) -> Column {
        Column::new(
            "path",
            DataType::String,
            values.iter().map(|s| Field::from(*s)).collect(),
        )
    }

    #[test]
    fn test_appends_when_absent() {
        let registry = FunctionRegistry::with_defaults();
        let slash = Column::constant("'/'", DataType::String, Field::from("/"), 3);

        let (ty, data) = registry
            .execute(
                "appendTrailingCharIfAbsent",
                &[paths(&["a/b", "a/b/", ""]), slash],
                3,
            )
            .unwrap();
        assert_eq!(ty, DataType::String);
        assert_eq!(
            data,
            vec![Field::from("a/b/"), Field::from("a/b/"), Field::from("")]
        );
    }

    #[test]
    fn test_requires_constant_single_char() {
        let registry = FunctionRegistry::with_defaults();

        let not_const = paths(&["/"]);
        assert!(matches!(
            registry.execute("appendTrailingCharIfAbsent", &[paths(&["a"]), not_const], 1),
            Err(Error::IllegalColumn(_))
        ));

        let too_long = Column::constant("'//'", DataType::String, Field::from("//"), 1);
        assert!(matches!(
            registry.execute("appendTrailingCharIfAbsent", &[paths(&["a"]), too_long], 1),
            Err(Error::BadArguments(_))
        ));
    }

    #[test]
    fn test_checks_suffix_on_empty_input() {
        let registry = FunctionRegistry::with_defaults();

        let too_long = Column::constant("'//'", DataType::String, Field::from("//"), 0);
        assert!(matches!(
            registry.execute("appendTrailingCharIfAbsent", &[paths(&[]), too_long], 0),
            Err(Error::BadArguments(_))
        ));

        assert!(matches!(
            registry.execute("appendTrailingCharIfAbsent", &[paths(&[]), paths(&[])], 0),
            Err(Error::IllegalColumn(_))
        ));

        let slash = Column::constant("'/'", DataType::String, Field::from("/"), 0);
        let (_, data) = registry
            .execute("appendTrailingCharIfAbsent", &[paths(&[]), slash], 0)
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_rejects_non_string_arguments() {
        let registry = FunctionRegistry::with_defaults();
        assert!(matches!(
            registry.return_type(
                "appendTrailingCharIfAbsent",
                &[DataType::UInt8, DataType::String]
            ),
            Err(Error::IllegalTypeOfArgument(_))
        ));
    }
}
