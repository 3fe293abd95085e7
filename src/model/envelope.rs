use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Machine-readable reason attached to every failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MethodNotFound,
    InvalidArguments,
    HandlerError,
    InternalError,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::MethodNotFound => "method_not_found",
            FailureKind::InvalidArguments => "invalid_arguments",
            FailureKind::HandlerError => "handler_error",
            FailureKind::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single reply produced for every dispatched call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseEnvelope {
    Success { value: Value },
    Failure { kind: FailureKind, message: String },
}

impl ResponseEnvelope {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}
