// src/error.rs

use thiserror::Error;

/// Hard failures of the inventory and dispatch engines.
///
/// Business outcomes such as a stock shortfall or an overloaded courier pool
/// are NOT errors. They are reported through return values.
#[derive(Debug, Error)]
pub enum PharmaError {
    /// A SKU (or matcher) with no counterpart in the catalog.
    #[error("unknown SKU: {0}")]
    UnknownSku(String),

    /// Internal bookkeeping no longer agrees with the held stock.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PharmaResult<T> = Result<T, PharmaError>;
