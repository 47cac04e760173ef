use super::{Expr, FunctionRegistry};
use crate::block::{Block, Column};
use crate::config::EvalSettings;
use crate::error::Result;
use crate::types::{DataType, NameAndType};
use crate::Error;

use std::sync::Arc;

/// Everything expression evaluation needs besides the data: the function
/// table and the settings in effect. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub functions: Arc<FunctionRegistry>,
    pub settings: EvalSettings,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(EvalSettings::default())
    }
}

impl ExecutionContext {
    pub fn new(settings: EvalSettings) -> Self {
        Self {
            functions: Arc::new(FunctionRegistry::with_defaults()),
            settings,
        }
    }

    pub fn with_functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = functions;
        self
    }

    /// Type the expression produces over columns of the given types.
    pub fn infer_type(&self, expr: &Expr, columns: &[NameAndType]) -> Result<DataType> {
        match expr {
            Expr::Column(name) => columns
                .iter()
                .find(|c| &c.name == name)
                .map(|c| c.data_type.clone())
                .ok_or_else(|| Error::UnknownIdentifier(format!("missing column {}", name))),
            Expr::Literal(_, data_type) => Ok(data_type.clone()),
            Expr::Function { name, args } => {
                let arg_types = args
                    .iter()
                    .map(|a| self.infer_type(a, columns))
                    .collect::<Result<Vec<_>>>()?;
                self.functions.return_type(name, &arg_types)
            }
            Expr::Tuple(_) => Err(Error::InvalidOperation(format!(
                "tuple {} does not produce a single column",
                expr
            ))),
        }
    }

    /// Evaluates the expression over every row of the block.
    ///
    /// A column already present under the expression's name is reused.
    pub fn evaluate(&self, expr: &Expr, block: &Block) -> Result<Column> {
        let name = expr.to_string();
        if let Ok(existing) = block.get_by_name(&name) {
            return Ok(existing.clone());
        }

        let rows = block.rows();
        match expr {
            Expr::Column(column) => Err(Error::UnknownIdentifier(format!(
                "missing column {} in block",
                column
            ))),
            Expr::Literal(value, data_type) => {
                Ok(Column::constant(name, data_type.clone(), value.clone(), rows))
            }
            Expr::Function { name: function, args } => {
                let arg_columns = args
                    .iter()
                    .map(|a| self.evaluate(a, block))
                    .collect::<Result<Vec<_>>>()?;
                let (data_type, data) = self.functions.execute(function, &arg_columns, rows)?;
                Ok(Column::new(name, data_type, data))
            }
            Expr::Tuple(_) => Err(Error::InvalidOperation(format!(
                "tuple {} does not produce a single column",
                expr
            ))),
        }
    }

    /// Evaluates each expression and appends its column to the block, skipping
    /// any whose column is already there.
    pub fn execute(&self, exprs: &[Expr], block: &mut Block) -> Result<()> {
        for expr in exprs {
            if block.has(&expr.to_string()) {
                continue;
            }
            let column = self.evaluate(expr, block)?;
            tracing::debug!(column = %column.name, rows = column.len(), "Evaluated key column");
            block.insert(column)?;
        }
        Ok(())
    }
}
