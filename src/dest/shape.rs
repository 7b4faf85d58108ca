use std::sync::Arc;

use crate::error::ConvertError;
use crate::value::{FromValue, Value};

use super::StructDescriptor;

pub type Setter<T> =
    Arc<dyn Fn(&mut T, &Value) -> Result<(), ConvertError> + Send + Sync>;
pub type Inserter<T> =
    Arc<dyn Fn(&mut T, &str, &Value) -> Result<(), ConvertError> + Send + Sync>;

/// A type that rows can be scanned into.
///
/// The shape is requested once per engine and cached by type identity, so
/// `shape` may do arbitrary work.
pub trait Scannable: Sized + 'static {
    fn shape() -> Shape<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Struct,
    Map,
    Scalar,
}

/// Structural description of a scan destination.
pub enum Shape<T> {
    /// Named fields, matched to columns by name.
    Struct(StructDescriptor<T>),
    /// Every column becomes one entry keyed by its normalized name.
    Map(MapDescriptor<T>),
    /// The whole destination is filled from a single column.
    Scalar(ScalarDescriptor<T>),
}

impl<T: 'static> Shape<T> {
    pub fn map(
        insert: impl Fn(&mut T, &str, &Value) -> Result<(), ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Shape::Map(MapDescriptor {
            insert: Arc::new(insert),
        })
    }

    pub fn scalar(
        set: impl Fn(&mut T, &Value) -> Result<(), ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Shape::Scalar(ScalarDescriptor { set: Arc::new(set) })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Struct(_) => ShapeKind::Struct,
            Shape::Map(_) => ShapeKind::Map,
            Shape::Scalar(_) => ShapeKind::Scalar,
        }
    }
}

impl<T: FromValue + 'static> Shape<T> {
    /// Scalar shape that converts the single column with `T::from_value`.
    pub fn from_value() -> Self {
        Shape::scalar(|dst: &mut T, value: &Value| {
            *dst = T::from_value(value)?;
            Ok(())
        })
    }
}

pub struct MapDescriptor<T> {
    insert: Inserter<T>,
}

impl<T> MapDescriptor<T> {
    pub(crate) fn inserter(&self) -> &Inserter<T> {
        &self.insert
    }
}

pub struct ScalarDescriptor<T> {
    set: Setter<T>,
}

impl<T> ScalarDescriptor<T> {
    pub(crate) fn setter(&self) -> &Setter<T> {
        &self.set
    }
}
