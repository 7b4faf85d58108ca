use std::vec;

use crate::error::BoxError;
use crate::query::QueryContext;
use crate::rows::Rows;
use crate::value::Value;

use super::MemError;

/// Cursor over rows held in memory.
///
/// Once closed, every further `next` fails. A context attached with
/// [`MemRows::with_context`] is checked on each advance, and
/// [`MemRows::fail_after`] makes the cursor fail after delivering a given
/// number of rows.
#[derive(Debug)]
pub struct MemRows {
    columns: Vec<String>,
    rows: vec::IntoIter<Vec<Value>>,
    current: Vec<Value>,
    delivered: usize,
    ctx: Option<QueryContext>,
    failure: Option<(usize, String)>,
    closed: bool,
}

impl MemRows {
    pub fn new<I>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        MemRows {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter(),
            current: Vec::new(),
            delivered: 0,
            ctx: None,
            failure: None,
            closed: false,
        }
    }

    pub fn with_context(mut self, ctx: QueryContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Makes `next` fail with `message` once `rows` rows have been delivered.
    pub fn fail_after(mut self, rows: usize, message: impl Into<String>) -> Self {
        self.failure = Some((rows, message.into()));
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Rows not yet delivered.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Rows for MemRows {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        if self.closed {
            return Err(MemError::Closed.into());
        }
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> Result<bool, BoxError> {
        if self.closed {
            return Err(MemError::Closed.into());
        }
        if let Some(ctx) = &self.ctx {
            ctx.check().map_err(MemError::from)?;
        }
        if let Some((after, message)) = &self.failure {
            if self.delivered == *after {
                return Err(MemError::Injected(message.clone()).into());
            }
        }

        match self.rows.next() {
            Some(row) => {
                self.current = row;
                self.delivered += 1;
                Ok(true)
            }
            None => {
                self.current.clear();
                Ok(false)
            }
        }
    }

    fn values(&self) -> &[Value] {
        &self.current
    }

    fn close(&mut self) -> Result<(), BoxError> {
        self.closed = true;
        self.rows = Vec::new().into_iter();
        self.current.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rows() -> MemRows {
        MemRows::new(
            ["a"],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        )
    }

    #[test]
    fn test_iterate_and_close() -> Result<(), BoxError> {
        let mut rows = two_rows();
        assert_eq!(rows.columns()?, vec!["a"]);

        assert!(rows.next()?);
        assert_eq!(rows.values(), &[Value::Int(1)]);
        assert!(rows.next()?);
        assert_eq!(rows.values(), &[Value::Int(2)]);
        assert!(!rows.next()?);
        assert!(rows.values().is_empty());

        rows.close()?;
        assert!(rows.is_closed());
        assert!(rows.next().is_err());
        assert!(rows.columns().is_err());
        Ok(())
    }

    #[test]
    fn test_injected_failure() -> Result<(), BoxError> {
        let mut rows = two_rows().fail_after(1, "boom");
        assert!(rows.next()?);
        let err = rows.next().unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(rows.remaining(), 1);
        Ok(())
    }

    #[test]
    fn test_cancelled_context() {
        let ctx = QueryContext::background();
        let mut rows = two_rows().with_context(ctx.clone());
        ctx.cancel();
        let err = rows.next().unwrap_err();
        assert_eq!(err.to_string(), "context cancelled");
    }
}
