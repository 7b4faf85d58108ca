pub mod context;
pub mod querier;

pub use context::{ContextError, QueryContext};
pub use querier::Querier;
