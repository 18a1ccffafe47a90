use thiserror::Error;

/// Errors raised by the execution layer.
///
/// `TransactionAborted` and `Storage` originate in child iterators and are passed
/// through untouched. The remaining variants report misuse of the iterator
/// contract or an invalid operator configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DBError {
    #[error("Iterator already open")]
    AlreadyOpen,
    #[error("Iterator not open")]
    NotOpen,
    #[error("No tuple pending: next() called past the end of the iterator")]
    NoSuchElement,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Tuple error: {0}")]
    Tuple(#[from] TupleError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TupleError {
    #[error("Buffer too small for serialized tuple")]
    BufferTooSmall,
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Decoded {actual} slots but schema has {expected} columns")]
    SchemaMismatch { expected: usize, actual: usize },
}
