//! Default request context passed to handler methods.
//!
//! The registry is configured with a context type (see
//! [`RegistryConfig`](crate::registry::RegistryConfig)); unless overridden it
//! is [`RequestContext`]. The hosting transport builds one per inbound request
//! and hands it to [`ServiceMap::dispatch`](crate::ServiceMap::dispatch) or
//! [`MethodDescriptor::invoke`](super::MethodDescriptor::invoke).
//!
//! # Example
//!
//! ```
//! use rpc_service_map::RequestContext;
//!
//! let ctx = RequestContext::new("Math.Add", 7).with_metadata("peer", "10.0.0.3");
//! assert_eq!(ctx.method(), "Math.Add");
//! assert_eq!(ctx.metadata("peer"), Some("10.0.0.3"));
//! ```

use std::collections::HashMap;

/// Per-request information visible to handler methods.
///
/// `RequestContext` is `Clone` and `Send + Sync`; handlers only ever see it by
/// shared reference.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Full dotted name taken from the wire request.
    method: String,
    /// Transport-assigned request ID (0 = notification).
    request_id: u32,
    /// Transport headers or other key/value metadata.
    metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Create a context for the given method and request ID.
    pub fn new(method: impl Into<String>, request_id: u32) -> Self {
        Self {
            method: method.into(),
            request_id,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Full dotted method name.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request ID.
    #[inline]
    pub fn request_id(&self) -> u32 {
        self.request_id
    }

    /// True when the caller expects no reply.
    #[inline]
    pub fn is_notification(&self) -> bool {
        self.request_id == 0
    }

    /// Look up a metadata value.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = RequestContext::new("Math.Add", 42);
        assert_eq!(ctx.method(), "Math.Add");
        assert_eq!(ctx.request_id(), 42);
        assert!(!ctx.is_notification());
        assert!(ctx.metadata("missing").is_none());
    }

    #[test]
    fn test_notification() {
        assert!(RequestContext::new("Log.Write", 0).is_notification());
    }

    #[test]
    fn test_context_is_clone() {
        let ctx = RequestContext::new("A.B", 1).with_metadata("k", "v");
        let ctx2 = ctx.clone();

        assert_eq!(ctx.method(), ctx2.method());
        assert_eq!(ctx2.metadata("k"), Some("v"));
    }
}
