#![allow(dead_code)]

use std::error::Error;

use rowscan::{Bincode, MemDb, MemRows, Scannable, Shape, StructBuilder, Value};
use serde::{Deserialize, Serialize};

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

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Timestamps {
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Scannable for Timestamps {
    fn shape() -> Shape<Self> {
        StructBuilder::<Self>::new()
            .field("created_at", |t| &mut t.created_at)
            .field("updated_at", |t| &mut t.updated_at)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

impl Scannable for Address {
    fn shape() -> Shape<Self> {
        StructBuilder::<Self>::new()
            .field("street", |a| &mut a.street)
            .field("city", |a| &mut a.city)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    pub tags: Vec<String>,
}

/// A destination with an embedded struct, a nested struct under the
/// `shipping` prefix, a bincode column and a NULL-tolerant counter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Account {
    pub account_id: i64,
    pub display_name: String,
    pub logins: u32,
    pub timestamps: Timestamps,
    pub shipping: Address,
    pub preferences: Bincode<Preferences>,
}

impl Scannable for Account {
    fn shape() -> Shape<Self> {
        StructBuilder::<Self>::new()
            .field("accountId", |a| &mut a.account_id)
            .field_as("display_name", "name", |a| &mut a.display_name)
            .field_or_default("logins", |a| &mut a.logins)
            .embed(|a| &mut a.timestamps)
            .nested("shipping", |a| &mut a.shipping)
            .field("preferences", |a| &mut a.preferences)
            .build()
    }
}

pub const ACCOUNT_COLUMNS: [&str; 8] = [
    "account_id",
    "name",
    "logins",
    "created_at",
    "updated_at",
    "shipping.street",
    "shipping.city",
    "preferences",
];

pub fn account() -> Account {
    Account {
        account_id: 42,
        display_name: "Ada".to_string(),
        logins: 0,
        timestamps: Timestamps {
            created_at: 1_700_000_000,
            updated_at: None,
        },
        shipping: Address {
            street: "12 Analytical Row".to_string(),
            city: "London".to_string(),
        },
        preferences: Bincode(Preferences {
            theme: "dark".to_string(),
            tags: vec!["math".to_string(), "engines".to_string()],
        }),
    }
}

/// Raw values of [`account`], in [`ACCOUNT_COLUMNS`] order. `logins` is NULL.
pub fn account_values() -> Vec<Value> {
    let account = account();
    vec![
        Value::Int(account.account_id),
        Value::text(account.display_name),
        Value::Null,
        Value::Int(account.timestamps.created_at),
        Value::Null,
        Value::text(account.shipping.street),
        Value::text(account.shipping.city),
        account.preferences.encode().expect("preferences encode"),
    ]
}

pub fn user_rows(users: &[(i64, &str)]) -> MemRows {
    MemRows::new(
        ["id", "name"],
        users
            .iter()
            .map(|&(id, name)| vec![Value::Int(id), Value::text(name)])
            .collect(),
    )
}

pub fn users_db() -> MemDb {
    let db = MemDb::new();
    db.execute("CREATE TABLE users (id INT, name VARCHAR(20), team VARCHAR(20))", &[])
        .expect("create users");
    db.execute(
        "INSERT INTO users (id, name, team) VALUES (1, 'alice', 'core'), (2, 'bob', 'core'), (3, 'carol', 'web')",
        &[],
    )
    .expect("insert users");
    db
}

/// Messages of `err` and of every error below it in the `source()` chain.
pub fn error_chain(err: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = Some(err);
    while let Some(e) = current {
        messages.push(e.to_string());
        current = e.source();
    }
    messages
}
