use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::MalformedDocument {
                context: context.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn missing_field(field: impl Into<String>) -> Error {
        Error(
            ErrorKind::MissingField {
                field: field.into(),
            }
            .into(),
        )
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::TypeMismatch {
                field: field.into(),
                expected: expected.into(),
                found: found.into(),
            }
            .into(),
        )
    }

    pub fn conflicting_selectors(selectors: &[&str]) -> Error {
        Error(
            ErrorKind::ConflictingSelectors {
                selectors: selectors.iter().map(|s| s.to_string()).collect(),
            }
            .into(),
        )
    }

    pub fn duplicate_partition_boundary(
        begin: i64,
        first_key: impl Into<String>,
        second_key: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::DuplicatePartitionBoundary {
                begin,
                first_key: first_key.into(),
                second_key: second_key.into(),
            }
            .into(),
        )
    }

    pub fn rank_out_of_range(field: impl Into<String>, rank: usize, len: usize) -> Error {
        Error(
            ErrorKind::RankOutOfRange {
                field: field.into(),
                rank,
                len,
            }
            .into(),
        )
    }

    pub fn missing_required(field: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::MissingRequiredField {
                field: field.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn selection_too_large(field: impl Into<String>, rank: usize, len: u64) -> Error {
        Error(
            ErrorKind::SelectionTooLarge {
                field: field.into(),
                rank,
                len,
            }
            .into(),
        )
    }

    /// Returns `true` for errors caused by the calling rank rather than by the document.
    pub fn is_rank_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::RankOutOfRange { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("malformed configuration document '{context}': {message}")]
    MalformedDocument { context: String, message: String },

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("type mismatch for '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("conflicting column selectors: {}", selectors.join(", "))]
    ConflictingSelectors { selectors: Vec<String> },

    #[error(
        "column partitions '{first_key}' and '{second_key}' share the same begin value {begin}"
    )]
    DuplicatePartitionBoundary {
        begin: i64,
        first_key: String,
        second_key: String,
    },

    #[error("rank {rank} is out of range for '{field}' ({len} entries)")]
    RankOutOfRange {
        field: String,
        rank: usize,
        len: usize,
    },

    #[error("'{field}' selects {len} positions for rank {rank}, which cannot be materialized")]
    SelectionTooLarge {
        field: String,
        rank: usize,
        len: u64,
    },

    #[error("required field '{field}' is not usable: {message}")]
    MissingRequiredField { field: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return Error::io("json stream", e.into());
        }
        Error::malformed(
            format!("line {} column {}", e.line(), e.column()),
            e.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::rank_out_of_range("workspace", 3, 2);
        assert_eq!(
            e.to_string(),
            "rank 3 is out of range for 'workspace' (2 entries)"
        );
        assert!(e.is_rank_error());

        let e = Error::conflicting_selectors(&["scan_full", "column_partitions"]);
        assert_eq!(
            e.to_string(),
            "conflicting column selectors: scan_full, column_partitions"
        );
        assert!(!e.is_rank_error());

        let e = Error::selection_too_large("query_row_ranges", 1, u64::MAX);
        assert!(e.to_string().starts_with("'query_row_ranges' selects"));
        assert!(!e.is_rank_error());
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{ \"a\": ").unwrap_err();
        let e: Error = err.into();
        assert!(matches!(e.kind(), ErrorKind::MalformedDocument { .. }));
    }

    #[test]
    fn test_into_kind() {
        let e = Error::duplicate_partition_boundary(10, "0", "1");
        match e.into_kind() {
            ErrorKind::DuplicatePartitionBoundary {
                begin,
                first_key,
                second_key,
            } => {
                assert_eq!(begin, 10);
                assert_eq!(first_key, "0");
                assert_eq!(second_key, "1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
