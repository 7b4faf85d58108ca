use std::error::Error;

use rowscan::{Engine, MemDb, QueryContext, ScanConfig, ScanResult, Scannable, Shape, StructBuilder, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Employee {
    id: i64,
    full_name: String,
    manager_id: Option<i64>,
}

impl Scannable for Employee {
    fn shape() -> Shape<Self> {
        StructBuilder::<Self>::new()
            .field("id", |e| &mut e.id)
            .field("full_name", |e| &mut e.full_name)
            .field("manager_id", |e| &mut e.manager_id)
            .build()
    }
}

fn seed() -> Result<MemDb, rowscan::BoxError> {
    let db = MemDb::new();
    db.execute("CREATE TABLE employees (id INT, full_name VARCHAR(40), manager_id INT)", &[])?;
    db.execute(
        "INSERT INTO employees (id, full_name, manager_id) VALUES (1, 'Ada Lovelace', NULL), (2, 'Alan Turing', 1), (3, 'Grace Hopper', 1)",
        &[],
    )?;
    Ok(db)
}

fn report(engine: &Engine, db: &MemDb) -> ScanResult<()> {
    let ctx = QueryContext::background();

    let mut reports: Vec<Employee> = Vec::new();
    engine.query_all(
        &ctx,
        &mut reports,
        db,
        "SELECT id, full_name, manager_id FROM employees WHERE manager_id = $1",
        &[Value::Int(1)],
    )?;
    for employee in &reports {
        info!(id = employee.id, name = %employee.full_name, manager = ?employee.manager_id, "direct report");
    }

    let mut head = Employee::default();
    engine.query_one(&ctx, &mut head, db, "SELECT * FROM employees WHERE manager_id IS NULL", &[])?;
    info!(id = head.id, name = %head.full_name, "head of staff");

    let mut missing = Employee::default();
    match engine.query_one(&ctx, &mut missing, db, "SELECT * FROM employees WHERE id = ?", &[Value::Int(42)]) {
        Err(err) if err.is_not_found() => info!(error = %err, "no employee 42"),
        other => other?,
    }

    info!(stats = ?engine.stats(), "plan cache");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rowscan=info")))
        .init();

    let engine = Engine::with_config(ScanConfig::new());
    let result = seed().and_then(|db| report(&engine, &db).map_err(Into::into));
    if let Err(err) = result {
        eprintln!("rowscan demo failed: {err}");
        let mut cause = err.source();
        while let Some(inner) = cause {
            eprintln!("  caused by: {inner}");
            cause = inner.source();
        }
        std::process::exit(1);
    }
}
