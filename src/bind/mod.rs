pub mod binder;

pub use binder::bind;
