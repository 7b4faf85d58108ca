use crate::error::BoxError;
use crate::value::Value;

/// The `Rows` trait is the cursor capability a transport presents to the scanning engine.
///
/// A cursor is single-pass and single-consumer. Column names are stable for
/// its whole lifetime.
pub trait Rows {
    /// Column names of the result set, in result order.
    fn columns(&self) -> Result<Vec<String>, BoxError>;

    /// Advances to the next row. Returns `false` once the rows are exhausted.
    fn next(&mut self) -> Result<bool, BoxError>;

    /// Raw values of the current row, valid until the next call to `next`.
    fn values(&self) -> &[Value];

    fn close(&mut self) -> Result<(), BoxError>;

    /// Takes the last error the cursor hit outside of `next`, if any.
    fn err(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<R: Rows + ?Sized> Rows for &mut R {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        (**self).columns()
    }

    fn next(&mut self) -> Result<bool, BoxError> {
        (**self).next()
    }

    fn values(&self) -> &[Value] {
        (**self).values()
    }

    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }

    fn err(&mut self) -> Result<(), BoxError> {
        (**self).err()
    }
}

impl<R: Rows + ?Sized> Rows for Box<R> {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        (**self).columns()
    }

    fn next(&mut self) -> Result<bool, BoxError> {
        (**self).next()
    }

    fn values(&self) -> &[Value] {
        (**self).values()
    }

    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }

    fn err(&mut self) -> Result<(), BoxError> {
        (**self).err()
    }
}
