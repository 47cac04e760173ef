use super::{integer_arg, ScalarFunction};
use crate::block::Column;
use crate::error::Result;
use crate::types::date;
use crate::types::{DataType, Field};
use crate::Error;

use chrono::NaiveDate;

fn check_date_argument(name: &str, args: &[DataType]) -> Result<()> {
    if !args[0].is_date_or_datetime() {
        return Err(Error::IllegalTypeOfArgument(format!(
            "illegal type {} of argument of function {}, expected Date or DateTime",
            args[0], name
        )));
    }
    Ok(())
}

/// Day number of a Date or DateTime argument at `row`.
fn day_number(column: &Column, row: usize) -> Result<u16> {
    let value = integer_arg(column, row)?;
    match column.data_type {
        DataType::DateTime => u32::try_from(value)
            .map(date::days_from_datetime)
            .map_err(|_| Error::IllegalColumn(format!("DateTime value {} out of range", value))),
        _ => u16::try_from(value)
            .map_err(|_| Error::IllegalColumn(format!("Date value {} out of range", value))),
    }
}

fn map_dates(
    args: &[Column],
    rows: usize,
    f: impl Fn(u16, NaiveDate) -> Field,
) -> Result<Vec<Field>> {
    (0..rows)
        .map(|row| {
            let days = day_number(&args[0], row)?;
            Ok(f(days, date::date_from_days(days)))
        })
        .collect()
}

/// Year and month as the number `YYYYMM`. The classic monthly partition key.
pub struct ToYYYYMM;

impl ScalarFunction for ToYYYYMM {
    fn name(&self) -> &'static str {
        "toYYYYMM"
    }

    fn number_of_arguments(&self) -> usize {
        1
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_date_argument(self.name(), args)?;
        Ok(DataType::UInt32)
    }

    fn execute(&self, args: &[Column], _result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        map_dates(args, rows, |_, d| Field::from(date::to_yyyymm(d)))
    }
}

pub struct ToYYYYMMDD;

impl ScalarFunction for ToYYYYMMDD {
    fn name(&self) -> &'static str {
        "toYYYYMMDD"
    }

    fn number_of_arguments(&self) -> usize {
        1
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_date_argument(self.name(), args)?;
        Ok(DataType::UInt32)
    }

    fn execute(&self, args: &[Column], _result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        map_dates(args, rows, |_, d| Field::from(date::to_yyyymmdd(d)))
    }
}

pub struct ToDate;

impl ScalarFunction for ToDate {
    fn name(&self) -> &'static str {
        "toDate"
    }

    fn number_of_arguments(&self) -> usize {
        1
    }

    fn return_type(&self, args: &[DataType]) -> Result<DataType> {
        check_date_argument(self.name(), args)?;
        Ok(DataType::Date)
    }

    fn execute(&self, args: &[Column], _result_type: &DataType, rows: usize) -> Result<Vec<Field>> {
        map_dates(args, rows, |days, _| Field::UInt(days as u64))
    }
}
