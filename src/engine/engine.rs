use std::any::type_name;
use std::sync::{Arc, LazyLock};

use tracing::trace;

use crate::bind::bind;
use crate::dest::Scannable;
use crate::error::{ScanError, ScanResult};
use crate::plan::{BindingPlan, CacheStats, PlanCache, resolve};
use crate::query::{Querier, QueryContext};
use crate::rows::{Rows, RowsGuard};
use crate::value::Value;

use super::{RowScanner, ScanConfig};

static GLOBAL: LazyLock<Engine> = LazyLock::new(Engine::new);

/// The scanning engine: a configuration plus the plan cache shared by every
/// scan it runs.
pub struct Engine {
    config: ScanConfig,
    cache: PlanCache,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::new())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Engine {
            config,
            cache: PlanCache::new(),
        }
    }

    /// The process-wide engine with the default configuration.
    pub fn global() -> &'static Engine {
        &GLOBAL
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the binding plan of `T` for `columns`, from the cache when possible.
    pub fn resolve<T: Scannable>(&self, columns: &[String]) -> ScanResult<Arc<BindingPlan<T>>> {
        self.cache
            .plan::<T, _>(columns, |shape| resolve(shape, columns, &self.config))
    }

    pub fn row_scanner<'a, R: Rows + ?Sized>(&'a self, rows: &'a mut R) -> RowScanner<'a, R> {
        RowScanner::new(self, rows)
    }

    /// Binds the row `rows` is currently positioned at. The cursor is neither
    /// advanced nor closed.
    pub fn scan_row<T: Scannable, R: Rows + ?Sized>(&self, dst: &mut T, rows: &mut R) -> ScanResult<()> {
        self.row_scanner(rows).scan(dst)
    }

    /// Scans exactly one row into `dst`.
    ///
    /// Fails with `NotFound` when the result is empty and with
    /// `MultipleRowsReturned` when it has more than one row. The cursor is
    /// closed on every path.
    pub fn scan_one<T: Scannable, R: Rows + ?Sized>(&self, dst: &mut T, rows: &mut R) -> ScanResult<()> {
        let mut guard = RowsGuard::new(rows);
        if !guard.advance()? {
            guard.check_err()?;
            return Err(ScanError::NotFound);
        }

        let plan = self.resolve::<T>(&guard.column_names()?)?;
        bind(&plan, guard.values(), dst)?;

        if guard.advance()? {
            return Err(ScanError::MultipleRowsReturned);
        }
        guard.check_err()?;
        guard.close()
    }

    /// Scans every row into `dst`, which is emptied first.
    ///
    /// The plan is resolved on the first row and reused for the rest. An
    /// empty result leaves `dst` empty and is not an error. The cursor is
    /// closed on every path.
    pub fn scan_all<T, R>(&self, dst: &mut Vec<T>, rows: &mut R) -> ScanResult<()>
    where
        T: Scannable + Default,
        R: Rows + ?Sized,
    {
        dst.clear();
        let mut guard = RowsGuard::new(rows);
        let mut plan: Option<Arc<BindingPlan<T>>> = None;

        while guard.advance()? {
            let current = match plan.clone() {
                Some(plan) => plan,
                None => {
                    let resolved = self.resolve::<T>(&guard.column_names()?)?;
                    plan = Some(Arc::clone(&resolved));
                    resolved
                }
            };

            let mut element = T::default();
            bind(&current, guard.values(), &mut element)?;
            dst.push(element);
        }

        guard.check_err()?;
        guard.close()?;
        trace!(destination = type_name::<T>(), rows = dst.len(), "scanned all rows");
        Ok(())
    }

    /// Runs `query` and scans all of its rows into `dst`.
    pub fn query_all<T, Q>(
        &self,
        ctx: &QueryContext,
        dst: &mut Vec<T>,
        querier: &Q,
        query: &str,
        params: &[Value],
    ) -> ScanResult<()>
    where
        T: Scannable + Default,
        Q: Querier + ?Sized,
    {
        let mut rows = querier
            .query(ctx, query, params)
            .map_err(|err| ScanError::Query(err).context("query multiple result rows"))?;
        self.scan_all(dst, &mut rows)
            .map_err(|err| err.context("query multiple result rows"))
    }

    /// Runs `query` and scans its single row into `dst`.
    pub fn query_one<T, Q>(
        &self,
        ctx: &QueryContext,
        dst: &mut T,
        querier: &Q,
        query: &str,
        params: &[Value],
    ) -> ScanResult<()>
    where
        T: Scannable,
        Q: Querier + ?Sized,
    {
        let mut rows = querier
            .query(ctx, query, params)
            .map_err(|err| ScanError::Query(err).context("query one result row"))?;
        self.scan_one(dst, &mut rows)
            .map_err(|err| err.context("query one result row"))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
