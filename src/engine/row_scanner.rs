use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::bind::bind;
use crate::dest::Scannable;
use crate::error::{ScanError, ScanResult};
use crate::plan::BindingPlan;
use crate::rows::Rows;

use super::Engine;

/// Scans rows one at a time while the caller drives the cursor.
///
/// Column names are read once, on the first scan, and plans are memoized per
/// destination type, so scanning many rows into the same type costs one
/// engine lookup. The cursor is never advanced or closed by the scanner.
///
/// ```
/// use rowscan::{Engine, MemRows, Rows, ScanError, Value};
///
/// let engine = Engine::new();
/// let mut rows = MemRows::new(["n"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
/// let mut scanner = engine.row_scanner(&mut rows);
///
/// let mut total = 0;
/// while scanner.next()? {
///     let mut n = 0i64;
///     scanner.scan(&mut n)?;
///     total += n;
/// }
/// scanner.close()?;
/// assert_eq!(total, 3);
/// # Ok::<(), ScanError>(())
/// ```
pub struct RowScanner<'a, R: Rows + ?Sized> {
    engine: &'a Engine,
    rows: &'a mut R,
    columns: Option<Vec<String>>,
    plans: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl<'a, R: Rows + ?Sized> RowScanner<'a, R> {
    pub fn new(engine: &'a Engine, rows: &'a mut R) -> Self {
        RowScanner {
            engine,
            rows,
            columns: None,
            plans: HashMap::new(),
        }
    }

    /// Advances the underlying cursor.
    pub fn next(&mut self) -> ScanResult<bool> {
        self.rows.next().map_err(ScanError::Io)
    }

    /// Binds the current row into `dst`.
    pub fn scan<T: Scannable>(&mut self, dst: &mut T) -> ScanResult<()> {
        let plan = self.plan::<T>()?;
        bind(&plan, self.rows.values(), dst)
    }

    /// Column names of the result set, read from the cursor on first use.
    pub fn columns(&mut self) -> ScanResult<&[String]> {
        if self.columns.is_none() {
            self.columns = Some(self.rows.columns().map_err(ScanError::Io)?);
        }
        Ok(self.columns.as_deref().unwrap_or_default())
    }

    /// Closes the underlying cursor.
    pub fn close(self) -> ScanResult<()> {
        self.rows.close().map_err(ScanError::Io)
    }

    fn plan<T: Scannable>(&mut self) -> ScanResult<Arc<BindingPlan<T>>> {
        let type_id = TypeId::of::<T>();
        if let Some(plan) = self
            .plans
            .get(&type_id)
            .and_then(|plan| Arc::clone(plan).downcast::<BindingPlan<T>>().ok())
        {
            return Ok(plan);
        }

        self.columns()?;
        let columns = self.columns.as_deref().unwrap_or_default();
        let plan = self.engine.resolve::<T>(columns)?;
        self.plans.insert(type_id, Arc::clone(&plan) as Arc<dyn Any + Send + Sync>);
        Ok(plan)
    }
}
