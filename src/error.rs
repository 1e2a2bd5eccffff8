//! Error types for rpc-service-map.

use thiserror::Error;

/// Main error type for registration, resolution and dispatch.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A namespace segment or terminal service collides with an existing node.
    #[error("service already defined: {0:?}")]
    DuplicateService(String),

    /// Derived service name is not exported, or an explicit segment is empty.
    #[error("invalid service name: {0:?}")]
    InvalidServiceName(String),

    /// The handler declares no method matching the calling convention.
    #[error("{0:?} has no exported methods of suitable type")]
    NoSuitableMethods(String),

    /// Resolution input has no `.` separating service and method.
    #[error("service/method request ill-formed: {0:?}")]
    MalformedName(String),

    /// Namespace walk found no node for the requested service path.
    #[error("can't find service {0:?}")]
    ServiceNotFound(String),

    /// The service exists but has no method with the requested name.
    #[error("can't find method {0:?}")]
    MethodNotFound(String),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// JSON serialization error (schema export only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The invoked handler method returned an error.
    #[error("call failed: {0}")]
    Call(#[from] CallError),
}

/// Error-like result type of every callable handler method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// Application-level failure reported by the handler.
    #[error("{0}")]
    Failed(String),

    /// A type-erased slot held a value of the wrong type.
    #[error("type mismatch: expected {expected}")]
    TypeMismatch {
        /// Name of the type the invoker expected.
        expected: &'static str,
    },
}

impl CallError {
    /// Build an application failure from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub(crate) fn mismatch<T: ?Sized>() -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<T>(),
        }
    }
}

/// Result type alias using RegistryError.
pub type Result<T> = std::result::Result<T, RegistryError>;
