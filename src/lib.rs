//! Generic scanning of query result rows into typed destinations.
//!
//! A destination describes itself once through [`Scannable`]; the engine
//! matches that description against a result's column names, caches the
//! resulting [`BindingPlan`] and then converts each row's raw [`Value`]s into
//! the destination's fields.

pub mod api;
pub mod bind;
pub mod dest;
pub mod engine;
pub mod error;
pub mod mem;
pub mod plan;
pub mod query;
pub mod rows;
pub mod value;

#[cfg(test)]
mod utils;

pub use crate::api::{query_all, query_one, row_scanner, scan_all, scan_one, scan_row};
pub use crate::dest::{Scannable, Shape, ShapeKind, StructBuilder};
pub use crate::engine::{Engine, RowScanner, ScanConfig};
pub use crate::error::{BoxError, ConvertError, ErrorKind, ScanError, ScanResult, error_kind, is_not_found};
pub use crate::mem::{MemDb, MemRows};
pub use crate::plan::{BindingPlan, CacheStats, NameMapping};
pub use crate::query::{Querier, QueryContext};
pub use crate::rows::{Rows, RowsGuard};
pub use crate::value::{Bincode, FromValue, Value};
