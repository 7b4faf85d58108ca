use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BoxError;
use crate::plan::NameMapping;
use crate::query::{Querier, QueryContext};
use crate::value::Value;

use super::parse::{Condition, Parser, Projection, Select, Statement};
use super::{MemError, MemResult, MemRows};

/// A named set of columns and the rows stored under them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl MemTable {
    pub fn new<I>(columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        MemTable {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column`, compared case-insensitively.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = NameMapping::Lowercase.apply(column);
        self.columns
            .iter()
            .position(|c| NameMapping::Lowercase.apply(c) == wanted)
    }
}

/// In-memory table store answering simple SQL.
///
/// Tables are created and filled with `CREATE TABLE` and `INSERT ... VALUES`
/// through [`MemDb::execute`]; reads go through the [`Querier`] impl. Table
/// names are case-insensitive.
#[derive(Default)]
pub struct MemDb {
    tables: RwLock<HashMap<String, MemTable>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table<I>(&self, name: &str, columns: I) -> MemResult<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let key = table_key(name);
        let mut tables = self.tables.write();
        if tables.contains_key(&key) {
            return Err(MemError::TableExists(name.to_string()));
        }
        tables.insert(key, MemTable::new(columns));
        Ok(())
    }

    /// Appends `row` to `table`. The row must list a value for every column.
    pub fn insert(&self, table: &str, row: Vec<Value>) -> MemResult<()> {
        let mut tables = self.tables.write();
        let target = tables
            .get_mut(&table_key(table))
            .ok_or_else(|| MemError::UnknownTable(table.to_string()))?;
        if row.len() != target.columns.len() {
            return Err(MemError::RowWidth {
                table: table.to_string(),
                expected: target.columns.len(),
                actual: row.len(),
            });
        }
        target.rows.push(row);
        Ok(())
    }

    /// Runs a `CREATE TABLE` or `INSERT` statement and returns the number of
    /// rows it affected.
    pub fn execute(&self, sql: &str, params: &[Value]) -> MemResult<usize> {
        match Parser::new().parse(sql)? {
            Statement::CreateTable { table, columns } => {
                self.create_table(&table, columns)?;
                debug!(table, "created table");
                Ok(0)
            }
            Statement::Insert { table, columns, rows } => {
                let mut tables = self.tables.write();
                let target = tables
                    .get_mut(&table_key(&table))
                    .ok_or_else(|| MemError::UnknownTable(table.clone()))?;

                let positions = if columns.is_empty() {
                    (0..target.columns.len()).collect::<Vec<_>>()
                } else {
                    columns
                        .iter()
                        .map(|column| {
                            target.column_index(column).ok_or_else(|| MemError::UnknownColumn {
                                table: table.clone(),
                                column: column.clone(),
                            })
                        })
                        .collect::<MemResult<Vec<_>>>()?
                };

                let mut staged = Vec::with_capacity(rows.len());
                for operands in &rows {
                    if operands.len() != positions.len() {
                        return Err(MemError::RowWidth {
                            table: table.clone(),
                            expected: positions.len(),
                            actual: operands.len(),
                        });
                    }
                    let mut row = vec![Value::Null; target.columns.len()];
                    for (position, operand) in positions.iter().zip(operands) {
                        row[*position] = operand.evaluate(params)?;
                    }
                    staged.push(row);
                }

                let inserted = staged.len();
                target.rows.extend(staged);
                Ok(inserted)
            }
            Statement::Select(_) => Err(MemError::Unsupported(
                "SELECT must be run through query".to_string(),
            )),
        }
    }

    /// Evaluates a SELECT and returns a cursor over a copy of the matching rows.
    pub fn select(&self, ctx: &QueryContext, sql: &str, params: &[Value]) -> MemResult<MemRows> {
        ctx.check()?;
        let select = match Parser::new().parse(sql)? {
            Statement::Select(select) => select,
            _ => return Err(MemError::Unsupported("query expects a SELECT".to_string())),
        };

        let tables = self.tables.read();
        let table = tables
            .get(&table_key(&select.table))
            .ok_or_else(|| MemError::UnknownTable(select.table.clone()))?;

        let (names, positions) = project(table, &select)?;
        let filter = compile_filter(table, &select, params)?;

        let rows: Vec<Vec<Value>> = table
            .rows
            .iter()
            .filter(|row| filter.iter().all(|check| check.matches(row)))
            .map(|row| positions.iter().map(|&i| row[i].clone()).collect())
            .collect();

        debug!(table = select.table, rows = rows.len(), "selected rows");
        Ok(MemRows::new(names, rows).with_context(ctx.clone()))
    }

    pub fn table(&self, name: &str) -> Option<MemTable> {
        self.tables.read().get(&table_key(name)).cloned()
    }

    /// Serializes every table with bincode.
    pub fn snapshot(&self) -> MemResult<Vec<u8>> {
        Ok(bincode::serialize(&*self.tables.read())?)
    }

    pub fn restore(bytes: &[u8]) -> MemResult<Self> {
        let tables: HashMap<String, MemTable> = bincode::deserialize(bytes)?;
        Ok(MemDb {
            tables: RwLock::new(tables),
        })
    }
}

impl Querier for MemDb {
    type Rows = MemRows;

    fn query(&self, ctx: &QueryContext, query: &str, params: &[Value]) -> Result<MemRows, BoxError> {
        Ok(self.select(ctx, query, params)?)
    }
}

fn table_key(name: &str) -> String {
    NameMapping::Lowercase.apply(name)
}

fn project(table: &MemTable, select: &Select) -> MemResult<(Vec<String>, Vec<usize>)> {
    match &select.projection {
        Projection::All => Ok((table.columns.clone(), (0..table.columns.len()).collect())),
        Projection::Columns(outputs) => outputs
            .iter()
            .map(|output| {
                let position = table
                    .column_index(&output.column)
                    .ok_or_else(|| MemError::UnknownColumn {
                        table: select.table.clone(),
                        column: output.column.clone(),
                    })?;
                Ok((output.name.clone(), position))
            })
            .collect::<MemResult<Vec<_>>>()
            .map(|pairs| pairs.into_iter().unzip()),
    }
}

enum Check {
    Eq(usize, Value),
    IsNull(usize),
}

impl Check {
    fn matches(&self, row: &[Value]) -> bool {
        match self {
            // NULL never compares equal.
            Check::Eq(i, value) => !value.is_null() && row[*i] == *value,
            Check::IsNull(i) => row[*i].is_null(),
        }
    }
}

fn compile_filter(table: &MemTable, select: &Select, params: &[Value]) -> MemResult<Vec<Check>> {
    let position = |column: &str| {
        table.column_index(column).ok_or_else(|| MemError::UnknownColumn {
            table: select.table.clone(),
            column: column.to_string(),
        })
    };

    select
        .filter
        .iter()
        .map(|condition| match condition {
            Condition::Eq { column, operand } => Ok(Check::Eq(position(column)?, operand.evaluate(params)?)),
            Condition::IsNull { column } => Ok(Check::IsNull(position(column)?)),
        })
        .collect()
}
