//! Free functions running on [`Engine::global`].

use crate::dest::Scannable;
use crate::engine::{Engine, RowScanner};
use crate::error::ScanResult;
use crate::query::{Querier, QueryContext};
use crate::rows::Rows;
use crate::value::Value;

pub fn scan_all<T, R>(dst: &mut Vec<T>, rows: &mut R) -> ScanResult<()>
where
    T: Scannable + Default,
    R: Rows + ?Sized,
{
    Engine::global().scan_all(dst, rows)
}

pub fn scan_one<T: Scannable, R: Rows + ?Sized>(dst: &mut T, rows: &mut R) -> ScanResult<()> {
    Engine::global().scan_one(dst, rows)
}

pub fn scan_row<T: Scannable, R: Rows + ?Sized>(dst: &mut T, rows: &mut R) -> ScanResult<()> {
    Engine::global().scan_row(dst, rows)
}

pub fn row_scanner<R: Rows + ?Sized>(rows: &mut R) -> RowScanner<'_, R> {
    Engine::global().row_scanner(rows)
}

/// Runs `query` through `querier` and scans every row into `dst`.
///
/// ```
/// use rowscan::{MemDb, QueryContext, Scannable, Shape, StructBuilder, Value};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Book {
///     title: String,
///     pages: u32,
/// }
///
/// impl Scannable for Book {
///     fn shape() -> Shape<Self> {
///         StructBuilder::<Self>::new()
///             .field("title", |b| &mut b.title)
///             .field("pages", |b| &mut b.pages)
///             .build()
///     }
/// }
///
/// let db = MemDb::new();
/// db.execute("CREATE TABLE books (title VARCHAR(40), pages INT)", &[]).unwrap();
/// db.execute("INSERT INTO books (title, pages) VALUES ('Dune', 412), ('Emma', 474)", &[]).unwrap();
///
/// let mut books: Vec<Book> = Vec::new();
/// rowscan::query_all(
///     &QueryContext::background(),
///     &mut books,
///     &db,
///     "SELECT title, pages FROM books WHERE pages = $1",
///     &[Value::Int(412)],
/// )
/// .unwrap();
/// assert_eq!(books, vec![Book { title: "Dune".to_string(), pages: 412 }]);
/// ```
pub fn query_all<T, Q>(
    ctx: &QueryContext,
    dst: &mut Vec<T>,
    querier: &Q,
    query: &str,
    params: &[Value],
) -> ScanResult<()>
where
    T: Scannable + Default,
    Q: Querier + ?Sized,
{
    Engine::global().query_all(ctx, dst, querier, query, params)
}

pub fn query_one<T, Q>(ctx: &QueryContext, dst: &mut T, querier: &Q, query: &str, params: &[Value]) -> ScanResult<()>
where
    T: Scannable,
    Q: Querier + ?Sized,
{
    Engine::global().query_one(ctx, dst, querier, query, params)
}
