//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// The environment simulates several episodes at once.
    #[error("Batched environments cannot be converted to dm environments")]
    BatchedEnvironment,

    /// A timestep carries a step type code that is neither first, mid nor last.
    #[error("Invalid step type: {0}")]
    InvalidStepType(i32),

    /// Inconsistent shape, dtype or bounds given to a spec constructor.
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// The environment does not implement an optional operation.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// A value does not conform to a spec.
    #[error("Value out of spec: {0}")]
    ValueOutOfSpec(String),

    /// Two nests do not have the same structure.
    #[error("Nests do not have the same structure")]
    StructureMismatch,
}
