use crate::error::BoxError;
use crate::rows::Rows;
use crate::value::Value;

use super::QueryContext;

/// Something that executes a query and hands back a cursor over its result,
/// e.g. a connection, a pool or a transaction of some driver.
pub trait Querier {
    type Rows: Rows;

    fn query(&self, ctx: &QueryContext, query: &str, params: &[Value]) -> Result<Self::Rows, BoxError>;
}

impl<Q: Querier + ?Sized> Querier for &Q {
    type Rows = Q::Rows;

    fn query(&self, ctx: &QueryContext, query: &str, params: &[Value]) -> Result<Self::Rows, BoxError> {
        (**self).query(ctx, query, params)
    }
}
