use std::path::PathBuf;

use thiserror::Error;

use crate::types::ExpenseId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("expense with ID {0} not found")]
    NotFound(ExpenseId),

    #[error("cannot access {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: StorageSource,
    },

    #[error("{} is corrupt at line {line}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("total is too large to represent")]
    Overflow,

    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn storage(path: impl Into<PathBuf>, source: impl Into<StorageSource>) -> Self {
        Error::Storage {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for the kinds that come from the data file rather than user input.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Corrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(Error::NotFound(7).to_string(), "expense with ID 7 not found");
        assert_eq!(
            Error::validation("month must be between 1 and 12").to_string(),
            "invalid input: month must be between 1 and 12"
        );

        let err = Error::Corrupt {
            path: PathBuf::from("expenses.csv"),
            line: 3,
            reason: "missing amount".into(),
        };
        assert_eq!(err.to_string(), "expenses.csv is corrupt at line 3: missing amount");
        assert!(err.is_storage());
    }

    #[test]
    fn storage_wraps_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::storage("/tmp/x.csv", io);
        assert!(err.is_storage());
        assert!(err.to_string().starts_with("cannot access /tmp/x.csv: "));
        assert!(!Error::NotFound(1).is_storage());
    }
}
