//! Pool error types

use crate::key::{PoolKey, TypeKey};
use thiserror::Error;

/// Errors raised by pool lookup, checkout and initialization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No pool is registered under the requested key
    #[error("Pool {key} does not exist")]
    PoolNotFound {
        /// The key that was looked up
        key: PoolKey,
    },

    /// The pool exists but holds a different payload type
    #[error("Pool {key} holds {actual}, not {expected}")]
    TypeMismatch {
        /// The key that was looked up
        key: PoolKey,
        /// Payload type the caller asked for
        expected: TypeKey,
        /// Payload type the pool was registered with
        actual: TypeKey,
    },

    /// A descriptor claimed a key that is already registered
    #[error("Pool {key} already exists, descriptor #{index} was dropped")]
    DuplicateKey {
        /// The contested key
        key: PoolKey,
        /// Position of the dropped descriptor in the descriptor set
        index: usize,
    },

    /// A descriptor failed validation
    #[error("Invalid pool descriptor: {reason}")]
    InvalidDescriptor {
        /// What was wrong with it
        reason: String,
    },
}

/// Result alias for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
