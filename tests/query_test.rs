mod common;

use std::error::Error;
use std::fmt;

use rowscan::{Engine, ErrorKind, QueryContext, ScanError, ScanResult, Value};

use common::{User, error_chain, users_db};

#[test]
fn test_query_all_with_parameters() -> ScanResult<()> {
    let db = users_db();
    let ctx = QueryContext::background();

    let mut users: Vec<User> = Vec::new();
    rowscan::query_all(
        &ctx,
        &mut users,
        &db,
        "SELECT id, name FROM users WHERE team = ?",
        &[Value::text("core")],
    )?;
    assert_eq!(users, vec![User::new(1, "alice"), User::new(2, "bob")]);

    rowscan::query_all(&ctx, &mut users, &db, "SELECT id, name FROM users WHERE team = 'ops'", &[])?;
    assert!(users.is_empty());
    Ok(())
}

#[test]
fn test_query_one() -> ScanResult<()> {
    let db = users_db();
    let ctx = QueryContext::background();

    let mut user = User::default();
    rowscan::query_one(&ctx, &mut user, &db, "SELECT id, name FROM users WHERE id = $1", &[Value::Int(3)])?;
    assert_eq!(user, User::new(3, "carol"));

    let err = rowscan::query_one(&ctx, &mut user, &db, "SELECT id, name FROM users", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MultipleRowsReturned);
    assert!(err.to_string().starts_with("query one result row: "));
    Ok(())
}

/// An application error wrapping a scan failure, as a service layer would.
#[derive(Debug)]
struct LookupError {
    user_id: i64,
    source: ScanError,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "looking up user {}", self.user_id)
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

fn lookup(db: &rowscan::MemDb, user_id: i64) -> Result<User, LookupError> {
    let mut user = User::default();
    rowscan::query_one(
        &QueryContext::background(),
        &mut user,
        db,
        "SELECT id, name FROM users WHERE id = ?",
        &[Value::Int(user_id)],
    )
    .map_err(|source| LookupError { user_id, source })?;
    Ok(user)
}

#[test]
fn test_not_found_is_classified_through_wrappers() {
    let db = users_db();

    let err = lookup(&db, 99).unwrap_err();
    assert!(rowscan::is_not_found(&err));
    assert_eq!(rowscan::error_kind(&err), Some(ErrorKind::NotFound));
    assert!(err.source.to_string().contains("no rows in result set"));

    let wrapped = err.source.context("loading profile");
    assert!(wrapped.is_not_found());
    assert_eq!(wrapped.to_string(), "loading profile: query one result row: no rows in result set");

    assert!(lookup(&db, 1).is_ok());
}

#[test]
fn test_query_errors_carry_the_stage_label() {
    let db = users_db();
    let ctx = QueryContext::background();

    let mut users: Vec<User> = Vec::new();
    let err = rowscan::query_all(&ctx, &mut users, &db, "SELECT id FROM missing", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
    assert!(err.to_string().starts_with("query multiple result rows: "));
    assert!(!rowscan::is_not_found(&err));

    let err = rowscan::query_all(&ctx, &mut users, &db, "SELECT id, name, team FROM users", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownColumn);
    assert!(err.to_string().starts_with("query multiple result rows: "));
}

#[test]
fn test_cancelled_context_fails_the_query() {
    let db = users_db();
    let ctx = QueryContext::background();
    let engine = Engine::new();

    ctx.cancel();
    let mut users: Vec<User> = Vec::new();
    let err = engine
        .query_all(&ctx, &mut users, &db, "SELECT id, name FROM users", &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(
        error_chain(&err),
        vec!["query multiple result rows: query error", "query error", "context cancelled"]
    );
}

#[test]
fn test_cancellation_mid_scan() -> ScanResult<()> {
    use rowscan::Querier;

    let db = users_db();
    let ctx = QueryContext::background();
    let mut rows = db
        .query(&ctx, "SELECT id, name FROM users", &[])
        .map_err(ScanError::Query)?;

    let mut scanner = Engine::global().row_scanner(&mut rows);
    assert!(scanner.next()?);
    ctx.cancel();

    let err = scanner.next().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(error_chain(&err), vec!["cursor error", "context cancelled"]);
    Ok(())
}
