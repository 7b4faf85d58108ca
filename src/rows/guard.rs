use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::error::{ScanError, ScanResult};

use super::Rows;

/// Borrows a cursor for the duration of a scan and closes it on every exit
/// path, including early returns and unwinding.
pub struct RowsGuard<'r, R: Rows + ?Sized> {
    rows: &'r mut R,
    closed: bool,
}

impl<'r, R: Rows + ?Sized> RowsGuard<'r, R> {
    pub fn new(rows: &'r mut R) -> Self {
        RowsGuard {
            rows,
            closed: false,
        }
    }

    /// Advances the cursor, surfacing cursor failures as `Io` errors.
    pub fn advance(&mut self) -> ScanResult<bool> {
        self.rows.next().map_err(ScanError::Io)
    }

    pub fn column_names(&self) -> ScanResult<Vec<String>> {
        self.rows.columns().map_err(ScanError::Io)
    }

    /// Checks the deferred cursor error after iteration stopped.
    pub fn check_err(&mut self) -> ScanResult<()> {
        self.rows.err().map_err(ScanError::Io)
    }

    /// Closes the cursor and reports the close failure, if any.
    pub fn close(mut self) -> ScanResult<()> {
        self.closed = true;
        self.rows.close().map_err(ScanError::Io)
    }
}

impl<R: Rows + ?Sized> Deref for RowsGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.rows
    }
}

impl<R: Rows + ?Sized> DerefMut for RowsGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.rows
    }
}

impl<R: Rows + ?Sized> Drop for RowsGuard<'_, R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.rows.close() {
            warn!(error = %err, "failed to close rows after an interrupted scan");
        }
    }
}
