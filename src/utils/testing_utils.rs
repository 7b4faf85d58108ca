use crate::dest::{Scannable, Shape, StructBuilder};
use crate::mem::MemRows;
use crate::value::Value;

/// Destination shared by the engine tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: &str) -> Self {
        User {
            id,
            name: name.to_string(),
        }
    }
}

impl Scannable for User {
    fn shape() -> Shape<Self> {
        StructBuilder::<Self>::new()
            .field("id", |u| &mut u.id)
            .field("name", |u| &mut u.name)
            .build()
    }
}

/// A cursor over `users` with columns `id, name`.
pub fn user_rows(users: &[(i64, &str)]) -> MemRows {
    MemRows::new(
        ["id", "name"],
        users
            .iter()
            .map(|&(id, name)| vec![Value::Int(id), Value::text(name)])
            .collect(),
    )
}
