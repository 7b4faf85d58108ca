use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error produced by a cursor or a query executor.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classification of a [`ScanError`], independent of how many context layers wrap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Query,
    NotFound,
    MultipleRowsReturned,
    ShapeConflict,
    UnknownColumn,
    ColumnCountMismatch,
    InvalidDestination,
    Conversion,
    NullIntoNonNullable,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cursor error")]
    Io(#[source] BoxError),

    #[error("query error")]
    Query(#[source] BoxError),

    #[error("no rows in result set")]
    NotFound,

    #[error("expected exactly one row, got more")]
    MultipleRowsReturned,

    #[error("column '{column}' is ambiguous: {detail}")]
    ShapeConflict { column: String, detail: String },

    #[error("column '{column}' has no corresponding field in {destination}")]
    UnknownColumn {
        column: String,
        destination: &'static str,
    },

    #[error("{destination}: expected {expected} columns, got {actual}")]
    ColumnCountMismatch {
        destination: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid destination {destination}: {detail}")]
    InvalidDestination {
        destination: &'static str,
        detail: String,
    },

    #[error("column '{column}' into '{path}': {source}")]
    Conversion {
        column: String,
        path: String,
        #[source]
        source: ConvertError,
    },

    #[error("column '{column}' is NULL but '{path}' is not nullable")]
    NullIntoNonNullable { column: String, path: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ScanError>,
    },
}

impl ScanError {
    /// Wraps the error with a context label. The kind is preserved.
    pub fn context(self, context: impl Into<String>) -> Self {
        ScanError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Io(_) => ErrorKind::Io,
            ScanError::Query(_) => ErrorKind::Query,
            ScanError::NotFound => ErrorKind::NotFound,
            ScanError::MultipleRowsReturned => ErrorKind::MultipleRowsReturned,
            ScanError::ShapeConflict { .. } => ErrorKind::ShapeConflict,
            ScanError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            ScanError::ColumnCountMismatch { .. } => ErrorKind::ColumnCountMismatch,
            ScanError::InvalidDestination { .. } => ErrorKind::InvalidDestination,
            ScanError::Conversion { .. } => ErrorKind::Conversion,
            ScanError::NullIntoNonNullable { .. } => ErrorKind::NullIntoNonNullable,
            ScanError::Context { source, .. } => source.kind(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Failure to convert one raw column value into a Rust value.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unexpected NULL")]
    UnexpectedNull,

    #[error("cannot convert {found} into {expected}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for {expected}")]
    OutOfRange { expected: &'static str, value: String },

    #[error("cannot parse '{text}' as {expected}")]
    Parse { expected: &'static str, text: String },

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("cannot decode bytes: {0}")]
    Decode(#[from] bincode::Error),
}

/// Finds the kind of the first [`ScanError`] in the cause chain of `err`.
///
/// The chain is walked through `source()`, so foreign wrappers around a
/// `ScanError` are seen through as well.
pub fn error_kind(err: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(scan_err) = err.downcast_ref::<ScanError>() {
            return Some(scan_err.kind());
        }
        // A boxed ScanError forwards `source()` past itself.
        if let Some(scan_err) = err.downcast_ref::<Box<ScanError>>() {
            return Some(scan_err.kind());
        }
        current = err.source();
    }
    None
}

/// Reports whether `err` is, or wraps, the zero-rows outcome of a scan-one.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    error_kind(err) == Some(ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("service failed: {source}")]
    struct ServiceError {
        #[source]
        source: ScanError,
    }

    #[derive(Error, Debug)]
    #[error("repository failed")]
    struct RepoError {
        #[source]
        source: Box<ScanError>,
    }

    #[test]
    fn test_not_found_through_boxed_errors() {
        let boxed = Box::new(ScanError::NotFound.context("query one result row"));
        assert!(is_not_found(&boxed));

        let err = RepoError {
            source: Box::new(ScanError::NotFound),
        };
        assert!(is_not_found(&err));
        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));

        let err = RepoError {
            source: Box::new(ScanError::MultipleRowsReturned),
        };
        assert!(!is_not_found(&err));
        assert_eq!(error_kind(&err), Some(ErrorKind::MultipleRowsReturned));
    }

    #[test]
    fn test_not_found_through_context() {
        let err = ScanError::NotFound
            .context("query one result row")
            .context("load user");

        assert!(err.is_not_found());
        assert!(is_not_found(&err));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "load user: query one result row: no rows in result set"
        );
    }

    #[test]
    fn test_not_found_through_foreign_wrapper() {
        let err = ServiceError {
            source: ScanError::NotFound.context("query one result row"),
        };
        assert!(is_not_found(&err));
        assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_cause_is_reported_once_in_the_chain() {
        let err = ScanError::Io("connection reset".into()).context("query one result row");

        let mut messages = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = Some(&err);
        while let Some(e) = current {
            messages.push(e.to_string());
            current = e.source();
        }
        assert_eq!(
            messages,
            vec!["query one result row: cursor error", "cursor error", "connection reset"]
        );
    }

    #[test]
    fn test_other_kinds_are_not_not_found() {
        let errors = vec![
            ScanError::MultipleRowsReturned,
            ScanError::Io("broken pipe".into()),
            ScanError::Query("syntax error".into()),
            ScanError::UnknownColumn {
                column: "age".to_string(),
                destination: "User",
            },
            ScanError::NullIntoNonNullable {
                column: "id".to_string(),
                path: "id".to_string(),
            }
            .context("query one result row"),
        ];

        for err in errors {
            assert!(!is_not_found(&err), "{err} must not be classified as not found");
        }

        let io: BoxError = "not a scan error".into();
        assert!(!is_not_found(io.as_ref()));
        assert_eq!(error_kind(io.as_ref()), None);
    }
}
