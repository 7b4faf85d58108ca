use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ConvertError;

use super::{FromValue, Value};

/// A bytes column holding a bincode-encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bincode<T>(pub T);

impl<T> Bincode<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> Bincode<T> {
    /// Encodes the wrapped value into a bytes column value.
    pub fn encode(&self) -> Result<Value, ConvertError> {
        Ok(Value::Bytes(bincode::serialize(&self.0)?))
    }
}

impl<T: DeserializeOwned> FromValue for Bincode<T> {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bytes(bytes) => Ok(Bincode(bincode::deserialize(bytes)?)),
            Value::Null => Err(ConvertError::UnexpectedNull),
            other => Err(ConvertError::Mismatch {
                expected: "bincode bytes",
                found: other.type_name(),
            }),
        }
    }
}

impl<T> Deref for Bincode<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Bincode<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Settings {
        theme: String,
        retries: u32,
    }

    #[test]
    fn test_decode_bytes_column() -> Result<(), ConvertError> {
        let settings = Settings {
            theme: "dark".to_string(),
            retries: 3,
        };
        let column = Bincode(settings.clone()).encode()?;
        assert!(matches!(column, Value::Bytes(_)));

        let decoded = Bincode::<Settings>::from_value(&column)?;
        assert_eq!(decoded.into_inner(), settings);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_other_values() {
        assert!(matches!(
            Bincode::<Settings>::from_value(&Value::Null),
            Err(ConvertError::UnexpectedNull)
        ));
        assert!(matches!(
            Bincode::<Settings>::from_value(&Value::text("x")),
            Err(ConvertError::Mismatch { found: "text", .. })
        ));
        assert!(matches!(
            Bincode::<Settings>::from_value(&Value::bytes(vec![1])),
            Err(ConvertError::Decode(_))
        ));
    }
}
