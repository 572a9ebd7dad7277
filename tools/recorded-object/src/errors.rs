use crate::binding::arg_count;
use crate::types::RecordedCall;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by a real target while a recorded call is replayed onto it.
pub type TargetError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{class} already has attribute {attribute}")]
    AttributeCollision { class: String, attribute: String },
    #[error("{class} is already bound to {target}")]
    AlreadyBound { class: String, target: String },
    #[error("{target}.{attribute} is not an operation")]
    NotCallable { target: String, attribute: String },
    #[error(
        "{target}.{operation} declares {num_defaults} defaults for {num_named} named parameters"
    )]
    InvalidSignature {
        target: String,
        operation: String,
        num_defaults: usize,
        num_named: usize,
    },
}

/// Raised synchronously when a call is offered to a recorded object. The call
/// is not recorded and the instance is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("{operation}() got multiple values for keyword argument '{keyword}'")]
    DuplicateKeyword { operation: String, keyword: String },
    #[error("{operation}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { operation: String, keyword: String },
    #[error("{operation}() takes exactly {} ({given} given)", arg_count(*.expected, false))]
    ArityMismatch {
        operation: String,
        expected: usize,
        given: usize,
    },
    #[error("{operation}() takes at least {} ({given} given)", arg_count(*.minimum, *.non_keyword))]
    TooFewArguments {
        operation: String,
        minimum: usize,
        given: usize,
        non_keyword: bool,
    },
    #[error("{operation}() takes at most {} ({given} given)", arg_count(*.maximum, false))]
    TooManyArguments {
        operation: String,
        maximum: usize,
        given: usize,
    },
    #[error("{class} has no operation '{operation}'")]
    UnknownOperation { class: String, operation: String },
    #[error("{operation}(): {reason}")]
    Rejected { operation: String, reason: String },
}

impl CallError {
    pub fn operation(&self) -> &str {
        match self {
            Self::DuplicateKeyword { operation, .. }
            | Self::UnexpectedKeyword { operation, .. }
            | Self::ArityMismatch { operation, .. }
            | Self::TooFewArguments { operation, .. }
            | Self::TooManyArguments { operation, .. }
            | Self::UnknownOperation { operation, .. }
            | Self::Rejected { operation, .. } => operation,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateKeyword { .. } => "duplicate_keyword",
            Self::UnexpectedKeyword { .. } => "unexpected_keyword",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::TooFewArguments { .. } => "too_few_arguments",
            Self::TooManyArguments { .. } => "too_many_arguments",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// A replayed call failed on the real target. Calls after `index` were not
/// attempted; the target keeps the effects of every call before it.
#[derive(Debug, Error)]
#[error("replay failed on {}() (call #{index}): {source}", .call.operation)]
pub struct ReplayError {
    pub index: usize,
    pub call: Arc<RecordedCall>,
    pub source: TargetError,
}

impl ReplayError {
    pub fn operation(&self) -> &str {
        &self.call.operation
    }
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Call(#[from] CallError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
