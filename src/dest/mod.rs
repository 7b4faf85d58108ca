pub mod impls;
pub mod shape;
pub mod structure;

pub use shape::{MapDescriptor, ScalarDescriptor, Scannable, Shape, ShapeKind};
pub use structure::{FieldEntry, StructBuilder, StructDescriptor};
