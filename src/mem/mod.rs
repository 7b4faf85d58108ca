//! In-memory transport: a cursor over owned rows and a tiny table store that
//! answers simple SELECT statements. Used by the demo binary, the tests and
//! the benchmarks; also handy as a reference `Rows`/`Querier` implementation.

pub mod mem_db;
pub mod mem_rows;
mod parse;

pub use mem_db::{MemDb, MemTable};
pub use mem_rows::MemRows;

use thiserror::Error;

use crate::query::ContextError;

#[derive(Error, Debug)]
pub enum MemError {
    #[error("rows are closed")]
    Closed,

    #[error("{0}")]
    Injected(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("failed to parse SQL: {0}")]
    Parse(String),

    #[error("unsupported statement: {0}")]
    Unsupported(String),

    #[error("table '{0}' does not exist")]
    UnknownTable(String),

    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    #[error("table '{table}' expects {expected} values per row, got {actual}")]
    RowWidth {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("missing query parameter {0}")]
    MissingParameter(usize),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

pub type MemResult<T> = Result<T, MemError>;
