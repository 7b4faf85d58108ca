pub mod config;
pub mod engine;
pub mod row_scanner;

pub use config::ScanConfig;
pub use engine::Engine;
pub use row_scanner::RowScanner;
