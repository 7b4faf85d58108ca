use std::fmt;

use crate::dest::shape::{Inserter, Setter};
use crate::error::ConvertError;
use crate::value::Value;

/// Where one column's value goes in the destination.
pub enum Target<T> {
    /// A struct field, addressed by its destination path.
    Field { path: String, setter: Setter<T> },
    /// A map entry under `key`.
    Key { key: String, insert: Inserter<T> },
    /// The destination itself.
    Whole { setter: Setter<T> },
}

impl<T> Target<T> {
    /// Destination path used in error messages.
    pub fn path(&self) -> &str {
        match self {
            Target::Field { path, .. } => path,
            Target::Key { key, .. } => key,
            Target::Whole { .. } => "<value>",
        }
    }

    pub(crate) fn apply(&self, dst: &mut T, value: &Value) -> Result<(), ConvertError> {
        match self {
            Target::Field { setter, .. } | Target::Whole { setter } => setter(dst, value),
            Target::Key { key, insert } => insert(dst, key, value),
        }
    }
}

impl<T> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Field { path, .. } => write!(f, "field {}", path),
            Target::Key { key, .. } => write!(f, "key {}", key),
            Target::Whole { .. } => write!(f, "whole"),
        }
    }
}

pub struct Binding<T> {
    column_index: usize,
    column: String,
    target: Target<T>,
}

impl<T> Binding<T> {
    pub fn new(column_index: usize, column: impl Into<String>, target: Target<T>) -> Self {
        Binding {
            column_index,
            column: column.into(),
            target,
        }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn target(&self) -> &Target<T> {
        &self.target
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} -> {:?}", self.column_index, self.column, self.target)
    }
}

/// Column-to-accessor mapping for one destination type and one column list.
/// Immutable once built; shared between scans through the plan cache.
pub struct BindingPlan<T> {
    destination: &'static str,
    column_count: usize,
    bindings: Vec<Binding<T>>,
}

impl<T> BindingPlan<T> {
    pub(crate) fn new(destination: &'static str, column_count: usize, bindings: Vec<Binding<T>>) -> Self {
        BindingPlan {
            destination,
            column_count,
            bindings,
        }
    }

    /// Type name of the destination the plan was resolved for.
    pub fn destination(&self) -> &'static str {
        self.destination
    }

    /// Number of columns of the result set the plan was resolved against.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Bindings in column order.
    pub fn bindings(&self) -> &[Binding<T>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `(column index, target path)` pairs, for comparing plans.
    pub fn summary(&self) -> Vec<(usize, String)> {
        self.bindings
            .iter()
            .map(|b| (b.column_index, b.target.path().to_string()))
            .collect()
    }
}

impl<T> fmt::Debug for BindingPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingPlan")
            .field("destination", &self.destination)
            .field("column_count", &self.column_count)
            .field("bindings", &self.bindings)
            .finish()
    }
}
