pub mod guard;
pub mod rows;

pub use guard::RowsGuard;
pub use rows::Rows;
