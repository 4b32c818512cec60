//! Top-level error type.

use thiserror::Error;

use crate::board::BoardError;
use crate::project::ProjectError;

/// Result alias for application-level operations.
pub type TilerResult<T> = Result<T, TilerError>;

/// Any error the application surface can return.
#[derive(Debug, Error)]
pub enum TilerError {
    /// A board operation was rejected.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Project persistence failed.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// A bank index was out of range.
    #[error("no bank entry at index {0}")]
    BankIndexOutOfRange(usize),
}
