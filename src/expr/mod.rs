//! Key expressions.
//!
//! An [`Expr`] is the parsed form of a partition key definition such as
//! `(toYYYYMM(date), modulo(userId, 16))`. Its `Display` rendering doubles as
//! the name of the column the expression produces when evaluated.

pub mod eval;
pub mod functions;
pub mod rewrite;

pub use eval::ExecutionContext;
pub use functions::{FunctionRegistry, ScalarFunction};

use crate::config::FormatSettings;
use crate::encoding::text;
use crate::types::{DataType, Field};

use itertools::Itertools as _;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Field, DataType),
    Function { name: String, args: Vec<Expr> },
    Tuple(Vec<Expr>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    /// Unsigned literal typed with the narrowest type that holds it.
    pub fn uint(value: u64) -> Self {
        let data_type = if value <= u8::MAX as u64 {
            DataType::UInt8
        } else if value <= u16::MAX as u64 {
            DataType::UInt16
        } else if value <= u32::MAX as u64 {
            DataType::UInt32
        } else {
            DataType::UInt64
        };
        Expr::Literal(Field::UInt(value), data_type)
    }

    /// Signed literal. Non-negative values are typed as unsigned.
    pub fn int(value: i64) -> Self {
        if value >= 0 {
            return Self::uint(value as u64);
        }
        let data_type = if value >= i8::MIN as i64 {
            DataType::Int8
        } else if value >= i16::MIN as i64 {
            DataType::Int16
        } else if value >= i32::MIN as i64 {
            DataType::Int32
        } else {
            DataType::Int64
        };
        Expr::Literal(Field::Int(value), data_type)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Field::String(value.into()), DataType::String)
    }

    pub fn float(value: f64) -> Self {
        Expr::Literal(Field::Float(value), DataType::Float64)
    }

    /// Children of this node, in argument order.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Function { args, .. } => args,
            Expr::Tuple(items) => items,
            Expr::Column(_) | Expr::Literal(..) => &[],
        }
    }

    /// Whether a function of the given name appears anywhere in the tree.
    pub fn contains_function(&self, function: &str) -> bool {
        match self {
            Expr::Function { name, .. } if name == function => true,
            other => other.children().iter().any(|c| c.contains_function(function)),
        }
    }

    /// Names of all columns the expression reads.
    pub fn required_columns(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names.into_iter().unique().collect()
    }

    fn collect_columns(&self, names: &mut Vec<String>) {
        match self {
            Expr::Column(name) => names.push(name.clone()),
            other => other.children().iter().for_each(|c| c.collect_columns(names)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Literal(value, data_type) => write!(
                f,
                "{}",
                text::literal(data_type, value, &FormatSettings::default())
            ),
            Expr::Function { name, args } => write!(f, "{}({})", name, args.iter().join(", ")),
            Expr::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_column_name() {
        let key = Expr::Tuple(vec![
            Expr::function("toYYYYMM", vec![Expr::column("date")]),
            Expr::function("modulo", vec![Expr::column("userId"), Expr::uint(16)]),
        ]);
        assert_eq!(key.to_string(), "(toYYYYMM(date), modulo(userId, 16))");
        assert_eq!(
            Expr::function("appendTrailingCharIfAbsent", vec![Expr::column("p"), Expr::string("/")])
                .to_string(),
            "appendTrailingCharIfAbsent(p, '/')"
        );
    }

    #[test]
    fn test_literal_typing() {
        assert_eq!(Expr::uint(16), Expr::Literal(Field::UInt(16), DataType::UInt8));
        assert_eq!(Expr::uint(300), Expr::Literal(Field::UInt(300), DataType::UInt16));
        assert_eq!(Expr::int(7), Expr::Literal(Field::UInt(7), DataType::UInt8));
        assert_eq!(Expr::int(-200), Expr::Literal(Field::Int(-200), DataType::Int16));
        assert_eq!(
            Expr::uint(1 << 40),
            Expr::Literal(Field::UInt(1 << 40), DataType::UInt64)
        );
    }

    #[test]
    fn test_tree_queries() {
        let key = Expr::function(
            "intDiv",
            vec![
                Expr::function("modulo", vec![Expr::column("a"), Expr::uint(10)]),
                Expr::column("a"),
            ],
        );
        assert!(key.contains_function("modulo"));
        assert!(!key.contains_function("moduloLegacy"));
        assert_eq!(key.required_columns(), vec!["a".to_string()]);
    }
}
