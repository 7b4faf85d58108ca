//! Process-lifetime cache of destination shapes and binding plans.
//!
//! Shapes are keyed by destination type; plans by destination type and the
//! exact column-name list they were resolved against. Entries are never
//! evicted: the number of distinct (type, columns) pairs a program scans is
//! bounded by its source code.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dest::{Scannable, Shape};
use crate::error::ScanResult;

use super::BindingPlan;

type Entry = Arc<dyn Any + Send + Sync>;

/// Counters describing how much resolution work the cache has saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Shapes built by calling `Scannable::shape`.
    pub shape_builds: u64,
    /// Plans built by matching columns against a shape.
    pub plan_builds: u64,
    /// Plan lookups answered from the cache.
    pub plan_hits: u64,
}

/// Concurrent cache of shapes and plans.
///
/// Readers never block each other. Two threads racing to fill the same key
/// may both build a plan; the first one inserted wins and is returned to both.
#[derive(Default)]
pub struct PlanCache {
    shapes: RwLock<HashMap<TypeId, Entry>>,
    plans: RwLock<HashMap<TypeId, HashMap<Vec<String>, Entry>>>,
    shape_builds: AtomicU64,
    plan_builds: AtomicU64,
    plan_hits: AtomicU64,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shape of `T`, building it on first use.
    pub fn shape<T: Scannable>(&self) -> Arc<Shape<T>> {
        let type_id = TypeId::of::<T>();
        if let Some(shape) = self.shapes.read().get(&type_id).cloned().and_then(downcast) {
            return shape;
        }

        let built: Entry = Arc::new(T::shape());
        self.shape_builds.fetch_add(1, Ordering::Relaxed);
        let entry = self.shapes.write().entry(type_id).or_insert(built).clone();
        downcast(entry).unwrap_or_else(|| Arc::new(T::shape()))
    }

    /// Returns the plan of `T` for `columns`, calling `build` on a miss.
    pub fn plan<T, F>(&self, columns: &[String], build: F) -> ScanResult<Arc<BindingPlan<T>>>
    where
        T: Scannable,
        F: FnOnce(&Shape<T>) -> ScanResult<BindingPlan<T>>,
    {
        let type_id = TypeId::of::<T>();
        let cached = self
            .plans
            .read()
            .get(&type_id)
            .and_then(|plans| plans.get(columns))
            .cloned()
            .and_then(downcast);
        if let Some(plan) = cached {
            self.plan_hits.fetch_add(1, Ordering::Relaxed);
            trace!(destination = std::any::type_name::<T>(), "binding plan cache hit");
            return Ok(plan);
        }

        let shape = self.shape::<T>();
        let built = Arc::new(build(&shape)?);
        self.plan_builds.fetch_add(1, Ordering::Relaxed);
        debug!(
            destination = built.destination(),
            columns = ?columns,
            bindings = built.len(),
            "resolved binding plan"
        );

        let entry = self
            .plans
            .write()
            .entry(type_id)
            .or_default()
            .entry(columns.to_vec())
            .or_insert_with(|| Arc::clone(&built) as Entry)
            .clone();
        Ok(downcast(entry).unwrap_or(built))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            shape_builds: self.shape_builds.load(Ordering::Relaxed),
            plan_builds: self.plan_builds.load(Ordering::Relaxed),
            plan_hits: self.plan_hits.load(Ordering::Relaxed),
        }
    }

    /// Number of cached plans across all destination types.
    pub fn plan_count(&self) -> usize {
        self.plans.read().values().map(HashMap::len).sum()
    }

    /// Drops every cached shape and plan. Statistics are kept.
    pub fn clear(&self) {
        self.shapes.write().clear();
        self.plans.write().clear();
    }
}

fn downcast<X: Any + Send + Sync>(entry: Entry) -> Option<Arc<X>> {
    entry.downcast::<X>().ok()
}
