pub mod convert;
pub mod encoded;
pub mod value;

pub use convert::FromValue;
pub use encoded::Bincode;
pub use value::Value;
