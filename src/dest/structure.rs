use std::any::type_name;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::plan::NameMapping;
use crate::value::{FromValue, Value};

use super::shape::Setter;
use super::{Scannable, Shape};

/// One leaf field of a flattened struct descriptor.
pub struct FieldEntry<T> {
    name: String,
    renamed: bool,
    prefixes: Vec<String>,
    path: String,
    setter: Setter<T>,
}

impl<T> FieldEntry<T> {
    /// Destination path of the field, e.g. `address.city`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Column name this field answers to. Explicitly renamed fields bypass
    /// the name mapping; nested prefixes are joined with `separator`.
    pub fn column_name(&self, mapping: NameMapping, separator: &str) -> String {
        let leaf = if self.renamed {
            self.name.clone()
        } else {
            mapping.apply(&self.name)
        };
        if self.prefixes.is_empty() {
            return leaf;
        }

        let mut name = self.prefixes.join(separator);
        name.push_str(separator);
        name.push_str(&leaf);
        name
    }

    pub(crate) fn setter(&self) -> &Setter<T> {
        &self.setter
    }
}

/// Flattened description of a struct destination, in declaration order.
pub struct StructDescriptor<T> {
    fields: Vec<FieldEntry<T>>,
    defects: Vec<String>,
}

impl<T> StructDescriptor<T> {
    pub fn fields(&self) -> &[FieldEntry<T>] {
        &self.fields
    }

    /// Problems found while flattening, reported when a plan is resolved.
    pub fn defects(&self) -> &[String] {
        &self.defects
    }
}

/// Declares the named accessors of a struct destination.
///
/// ```
/// use rowscan::{Scannable, Shape, StructBuilder};
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Scannable for User {
///     fn shape() -> Shape<Self> {
///         StructBuilder::<Self>::new()
///             .field("id", |u| &mut u.id)
///             .field("name", |u| &mut u.name)
///             .build()
///     }
/// }
/// ```
pub struct StructBuilder<T> {
    fields: Vec<FieldEntry<T>>,
    defects: Vec<String>,
}

impl<T: 'static> StructBuilder<T> {
    pub fn new() -> Self {
        StructBuilder {
            fields: Vec::new(),
            defects: Vec::new(),
        }
    }

    /// A field whose column name is derived from `name` by the name mapping.
    pub fn field<F: FromValue + 'static>(self, name: &str, access: fn(&mut T) -> &mut F) -> Self {
        let setter: Setter<T> = Arc::new(move |dst: &mut T, value: &Value| -> Result<(), ConvertError> {
            *access(dst) = F::from_value(value)?;
            Ok(())
        });
        self.leaf(name, None, setter)
    }

    /// A field bound to an explicit column name.
    pub fn field_as<F: FromValue + 'static>(
        self,
        name: &str,
        column: &str,
        access: fn(&mut T) -> &mut F,
    ) -> Self {
        let setter: Setter<T> = Arc::new(move |dst: &mut T, value: &Value| -> Result<(), ConvertError> {
            *access(dst) = F::from_value(value)?;
            Ok(())
        });
        self.leaf(name, Some(column), setter)
    }

    /// A field that takes its default value when the column is NULL.
    pub fn field_or_default<F: FromValue + Default + 'static>(
        self,
        name: &str,
        access: fn(&mut T) -> &mut F,
    ) -> Self {
        let setter: Setter<T> = Arc::new(move |dst: &mut T, value: &Value| -> Result<(), ConvertError> {
            *access(dst) = match value {
                Value::Null => F::default(),
                other => F::from_value(other)?,
            };
            Ok(())
        });
        self.leaf(name, None, setter)
    }

    /// Promotes the fields of an embedded struct, without a prefix.
    pub fn embed<U: Scannable>(self, access: fn(&mut T) -> &mut U) -> Self {
        self.flatten::<U>(None, move |inner: Setter<U>| -> Setter<T> {
            Arc::new(move |dst: &mut T, value: &Value| inner(access(dst), value))
        })
    }

    /// Flattens a nested struct whose columns are named `prefix<sep>field`.
    ///
    /// `U` must itself be struct-shaped; see [`StructBuilder::nested_option`]
    /// for an optional nested struct.
    pub fn nested<U: Scannable>(self, prefix: &str, access: fn(&mut T) -> &mut U) -> Self {
        self.flatten::<U>(Some(prefix), move |inner: Setter<U>| -> Setter<T> {
            Arc::new(move |dst: &mut T, value: &Value| inner(access(dst), value))
        })
    }

    /// Like [`StructBuilder::nested`], for a struct that may be absent, such as
    /// the right side of a LEFT JOIN.
    ///
    /// The option is set to `U::default()` as soon as one of its columns is
    /// bound, NULL or not. Fields of `U` that can be NULL must therefore be
    /// `Option`s or declared with `field_or_default`.
    pub fn nested_option<U: Scannable + Default>(
        self,
        prefix: &str,
        access: fn(&mut T) -> &mut Option<U>,
    ) -> Self {
        self.flatten::<U>(Some(prefix), move |inner: Setter<U>| -> Setter<T> {
            Arc::new(move |dst: &mut T, value: &Value| {
                inner(access(dst).get_or_insert_with(U::default), value)
            })
        })
    }

    pub fn build(self) -> Shape<T> {
        Shape::Struct(StructDescriptor {
            fields: self.fields,
            defects: self.defects,
        })
    }

    fn leaf(mut self, name: &str, column: Option<&str>, setter: Setter<T>) -> Self {
        self.fields.push(FieldEntry {
            name: column.unwrap_or(name).to_string(),
            renamed: column.is_some(),
            prefixes: Vec::new(),
            path: name.to_string(),
            setter,
        });
        self
    }

    /// Appends the fields of struct `U`, each setter lifted onto `T` by `lift`.
    fn flatten<U: Scannable>(
        mut self,
        prefix: Option<&str>,
        lift: impl Fn(Setter<U>) -> Setter<T>,
    ) -> Self {
        let descriptor = match U::shape() {
            Shape::Struct(descriptor) => descriptor,
            other => {
                self.defects.push(format!(
                    "{} is a {:?} shape and cannot be {}",
                    type_name::<U>(),
                    other.kind(),
                    match prefix {
                        Some(prefix) => format!("nested as '{}'", prefix),
                        None => "embedded".to_string(),
                    }
                ));
                return self;
            }
        };

        self.defects.extend(descriptor.defects);
        for entry in descriptor.fields {
            let mut prefixes: Vec<String> = prefix.map(str::to_string).into_iter().collect();
            prefixes.extend(entry.prefixes);
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, entry.path),
                None => entry.path,
            };

            self.fields.push(FieldEntry {
                name: entry.name,
                renamed: entry.renamed,
                prefixes,
                path,
                setter: lift(entry.setter),
            });
        }
        self
    }
}

impl<T: 'static> Default for StructBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
