//! Define error types for target-source emission.
//!
//! These errors represent *backend emission* failures (as opposed to type checking). Most of them are constructs the
//! checker accepts but generation cannot express.

use crate::frontend::diagnostics::{CompileError, ErrorKind, errors};

/// Error during emission.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("multi '{multi}' has more than 1 default branch (has {count})")]
    MultipleDefaults { multi: String, count: usize },
    #[error("class '{class}' has multiple initializers taking {arity} arguments")]
    InitializerCollision { class: String, arity: usize },
    #[error("no type information for {0}; was the program type checked?")]
    MissingTypeInfo(String),
    #[error("implementation '{implementor}' of multi '{multi}' is not declared in the same block")]
    MissingImplementor { multi: String, implementor: String },
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("failed to encode string literal: {0}")]
    Literal(#[from] serde_json::Error),
}

impl From<EmitError> for CompileError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::MultipleDefaults { multi, count } => errors::multiple_defaults(&multi, count),
            EmitError::InitializerCollision { class, arity } => CompileError::unlocated(
                ErrorKind::InitializerCollision,
                format!("Class '{}' has more than one initializer taking {} arguments", class, arity),
            ),
            EmitError::Unsupported(what) => CompileError::unlocated(ErrorKind::InvalidStatement, what),
            other => CompileError::internal(other.to_string()),
        }
    }
}
