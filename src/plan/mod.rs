pub mod binding_plan;
pub mod cache;
pub mod name;
pub mod resolver;

pub use binding_plan::{Binding, BindingPlan, Target};
pub use cache::{CacheStats, PlanCache};
pub use name::{NameMapping, snake_case};
pub use resolver::resolve;
