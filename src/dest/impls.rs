use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::de::DeserializeOwned;

use crate::error::ConvertError;
use crate::value::{Bincode, FromValue, Value};

use super::{Scannable, Shape};

macro_rules! impl_scannable_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scannable for $t {
                fn shape() -> Shape<Self> {
                    Shape::from_value()
                }
            }
        )*
    };
}

impl_scannable_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, String,
    Vec<u8>, Value,
);

impl<T: FromValue + 'static> Scannable for Option<T> {
    fn shape() -> Shape<Self> {
        Shape::from_value()
    }
}

impl<T: DeserializeOwned + 'static> Scannable for Bincode<T> {
    fn shape() -> Shape<Self> {
        Shape::from_value()
    }
}

impl<V, S> Scannable for HashMap<String, V, S>
where
    V: FromValue + 'static,
    S: BuildHasher + Default + 'static,
{
    fn shape() -> Shape<Self> {
        Shape::map(|map: &mut Self, key: &str, value: &Value| {
            map.insert(key.to_string(), V::from_value(value)?);
            Ok::<(), ConvertError>(())
        })
    }
}

impl<V: FromValue + 'static> Scannable for BTreeMap<String, V> {
    fn shape() -> Shape<Self> {
        Shape::map(|map: &mut Self, key: &str, value: &Value| {
            map.insert(key.to_string(), V::from_value(value)?);
            Ok::<(), ConvertError>(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dest::ShapeKind;

    #[test]
    fn test_shape_kinds() {
        assert_eq!(i32::shape().kind(), ShapeKind::Scalar);
        assert_eq!(Option::<String>::shape().kind(), ShapeKind::Scalar);
        assert_eq!(Bincode::<Vec<u32>>::shape().kind(), ShapeKind::Scalar);
        assert_eq!(HashMap::<String, Value>::shape().kind(), ShapeKind::Map);
        assert_eq!(BTreeMap::<String, i64>::shape().kind(), ShapeKind::Map);
    }

    #[test]
    fn test_map_inserter() {
        let Shape::Map(descriptor) = BTreeMap::<String, i64>::shape() else {
            panic!("expected a map shape");
        };
        let mut map = BTreeMap::new();
        (descriptor.inserter())(&mut map, "id", &Value::Int(4)).unwrap();
        assert_eq!(map.get("id"), Some(&4));
        assert!((descriptor.inserter())(&mut map, "id", &Value::Null).is_err());
    }
}
