//! Registry configuration.

use crate::error::CallError;
use crate::handler::{RequestContext, TypeTag};

/// Calling-convention markers and namespace policy for a [`ServiceMap`].
///
/// [`ServiceMap`]: super::ServiceMap
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Type a method's context parameter must reference.
    pub context_type: TypeTag,
    /// Type a method's single result must have.
    pub error_type: TypeTag,
    /// Reuse existing intermediate segments instead of rejecting them.
    ///
    /// When `false` any already-present segment fails registration with
    /// `DuplicateService`. When `true` only a terminal node that already
    /// carries a handler collides.
    pub shared_namespaces: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            context_type: TypeTag::of::<RequestContext>(),
            error_type: TypeTag::of::<CallError>(),
            shared_namespaces: false,
        }
    }
}
