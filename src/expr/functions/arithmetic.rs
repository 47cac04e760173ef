use super::{integer_arg, wrap_integer, ScalarFunction};
use crate::block::Column;
use crate::error::Result;
use crate::types::{DataType, Field};
use crate::Error;

fn check_integers(name: &str, args: &[DataType]) -> Result<()> {
    for (i, arg) in args.iter().enumerate() {
        if !arg.is_integer() {
            return Err(Error::IllegalTypeOfArgument(format!(
                "illegal type {} of argument {} of function {}",
                arg,
                i + 1,
                name
            )));
        }
    }
    Ok(())
}

fn width(data_type: &DataType) -> usize {
    data_type.fixed_width().unwrap_or(8)
}

/// Applies `op` row by row over two integer columns.
fn binary_integer_op(
    name: &str,
    args: &[Column],
    result_type: &DataType,
    rows: usize,
    op: impl Fn(i128, i128) -> i128,
) -> Result<Vec<Field>> {
    (0..rows)
        .map(|row| {
            let lhs = integer_arg(&args[0], row)?;
            let rhs = integer_arg(&args[1], row)?;
            if rhs == 0 {
                return Err(Error::BadArguments(format!("division by zero in {}", name)));
            }
            Ok(wrap_integer(result_type, op(lhs, rhs)))
        })
        .collect()
}

/// Remainder of integer division. The sign follows the dividend.
///
/// The result is as wide as the wider operand and signed when the dividend
/// is signed.
pub struct Modulo;

impl ScalarFunction for Modulo {
    fn name(&self) -> &'static str {
        "modulo"
    }

    fn number_of_arguments(&self) -> usize {
        2
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_integers(self.name(), args)?;
        let result_width = width(&args[0]).max(width(&args[1]));
        if args[0].is_signed_integer() {
            Ok(DataType::signed_of_width(result_width))
        } else {
            Ok(DataType::unsigned_of_width(result_width))
        }
    }

    fn execute(&self, args: &[Column], result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        binary_integer_op(self.name(), args, result_type, rows, |a, b| a % b)
    }
}

/// `modulo` as computed before its result type was widened: the result takes
/// the divisor's type and the remainder is wrapped into it.
pub struct ModuloLegacy;

impl ScalarFunction for ModuloLegacy {
    fn name(&self) -> &'static str {
        "moduloLegacy"
    }

    fn number_of_arguments(&self) -> usize {
        2
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_integers(self.name(), args)?;
        Ok(args[1].clone())
    }

    fn execute(&self, args: &[Column], result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        binary_integer_op(self.name(), args, result_type, rows, |a, b| a % b)
    }
}

/// Integer division rounding toward zero, in the dividend's width.
pub struct IntDiv;

impl ScalarFunction for IntDiv {
    fn name(&self) -> &'static str {
        "intDiv"
    }

    fn number_of_arguments(&self) -> usize {
        2
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_integers(self.name(), args)?;
        if args[0].is_signed_integer() || args[1].is_signed_integer() {
            Ok(DataType::signed_of_width(width(&args[0])))
        } else {
            Ok(args[0].clone())
        }
    }

    fn execute(&self, args: &[Column], result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        binary_integer_op(self.name(), args, result_type, rows, |a, b| a / b)
    }
}
