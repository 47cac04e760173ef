//! Scalar functions usable in key expressions.
//!
//! Each function validates its argument types and computes a result column
//! from a batch of argument columns. The [`FunctionRegistry`] is populated once
//! and shared read-only afterwards; NULL handling lives in the registry so
//! individual functions only ever see non-NULL rows.

mod arithmetic;
mod dates;
mod strings;

pub use arithmetic::{IntDiv, Modulo, ModuloLegacy};
pub use dates::{ToDate, ToYYYYMM, ToYYYYMMDD};
pub use strings::AppendTrailingCharIfAbsent;

use crate::block::Column;
use crate::error::Result;
use crate::types::{DataType, Field};
use crate::Error;

use std::collections::HashMap;
use std::sync::Arc;

pub trait ScalarFunction: Send + Sync {
    fn name(&self) -> &'static str;

    fn number_of_arguments(&self) -> usize;

    /// Result type for non-nullable argument types.
    fn return_type(&self, args: &[DataType]) -> Result<DataType>;

    /// Computes `rows` results. Arguments never contain NULL here.
    fn execute(&self, args: &[Column], result_type: &DataType, rows: usize) -> Result<Vec<Field>>;
}

/// Name to function mapping.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Arc<dyn ScalarFunction>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in function.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ToYYYYMM));
        registry.register(Arc::new(ToYYYYMMDD));
        registry.register(Arc::new(ToDate));
        registry.register(Arc::new(Modulo));
        registry.register(Arc::new(ModuloLegacy));
        registry.register(Arc::new(IntDiv));
        registry.register(Arc::new(AppendTrailingCharIfAbsent));
        registry
    }

    pub fn register(&mut self, function: Arc<dyn ScalarFunction>) {
        self.functions.insert(function.name(), function);
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn ScalarFunction>> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Result type of applying `name` to arguments of the given types.
    ///
    /// Nullable arguments are unwrapped for the function and the result is
    /// wrapped back into Nullable.
    pub fn return_type(&self, name: &str, args: &[DataType]) -> Result<DataType> {
        let function = self.get(name)?;
        check_number_of_arguments(function.as_ref(), args.len())?;

        let stripped: Vec<DataType> = args.iter().map(|t| t.remove_nullable().clone()).collect();
        let result = function.return_type(&stripped)?;
        if args.iter().any(DataType::is_nullable) {
            Ok(DataType::nullable(result))
        } else {
            Ok(result)
        }
    }

    /// Applies `name` to the argument columns.
    pub fn execute(
        &self,
        name: &str,
        args: &[Column],
        rows: usize,
    ) -> Result<(DataType, Vec<Field>)> {
        let function = self.get(name)?;
        let arg_types: Vec<DataType> = args.iter().map(|c| c.data_type.clone()).collect();
        let result_type = self.return_type(name, &arg_types)?;
        let inner_type = result_type.remove_nullable().clone();

        if !result_type.is_nullable() {
            let data = function.execute(args, &inner_type, rows)?;
            return Ok((result_type, data));
        }

        // Run the function on the rows without NULLs, then scatter back.
        let present: Vec<usize> = (0..rows)
            .filter(|&row| args.iter().all(|c| c.get(row).is_some_and(|v| !v.is_null())))
            .collect();
        let stripped: Vec<Column> = args
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data_type: c.data_type.remove_nullable().clone(),
                data: present.iter().map(|&row| c.data[row].clone()).collect(),
                constant: c.constant.clone(),
            })
            .collect();
        let computed = function.execute(&stripped, &inner_type, present.len())?;

        let mut data = vec![Field::Null; rows];
        for (row, value) in present.into_iter().zip(computed) {
            data[row] = value;
        }
        Ok((result_type, data))
    }
}

fn check_number_of_arguments(function: &dyn ScalarFunction, given: usize) -> Result<()> {
    if function.number_of_arguments() != given {
        return Err(Error::NumberOfArgumentsDoesntMatch(format!(
            "function {} expects {} arguments, got {}",
            function.name(),
            function.number_of_arguments(),
            given
        )));
    }
    Ok(())
}

/// Wraps an integer into the value range of `data_type`, two's complement.
pub(crate) fn wrap_integer(data_type: &DataType, value: i128) -> Field {
    let bits = data_type.fixed_width().unwrap_or(8) as u32 * 8;
    let modulus = 1i128 << bits;
    let unsigned = value.rem_euclid(modulus);
    if data_type.is_signed_integer() {
        let half = modulus >> 1;
        let signed = if unsigned >= half { unsigned - modulus } else { unsigned };
        Field::Int(signed as i64)
    } else {
        Field::UInt(unsigned as u64)
    }
}

/// Integer value of a non-NULL argument row.
pub(crate) fn integer_arg(column: &Column, row: usize) -> Result<i128> {
    column
        .get(row)
        .and_then(Field::to_i128)
        .ok_or_else(|| {
            Error::IllegalColumn(format!(
                "expected integer value in column {} at row {}",
                column.name, row
            ))
        })
}
