//! Handler module - capability tables, signatures and invocation.
//!
//! Provides:
//! - [`Service`] - implemented by handler objects to expose their methods
//! - [`MethodSpec`] - one entry of a handler's capability table
//! - [`Signature`] / [`TypeTag`] - declared call shape and the convention check
//! - [`MethodDescriptor`] - resolved method bound to its codec and invoker
//! - [`RequestContext`] - default per-request context
//!
//! # Example
//!
//! ```
//! use rpc_service_map::handler::{CallError, CallResult, MethodSpec, Param, Service, Signature, TypeTag};
//! use rpc_service_map::RequestContext;
//!
//! struct Counter;
//!
//! impl Counter {
//!     fn incr(&self, _ctx: &RequestContext, by: &u32, total: &mut u32) -> CallResult {
//!         *total = by.checked_add(1).ok_or_else(|| CallError::failed("overflow"))?;
//!         Ok(())
//!     }
//! }
//!
//! impl Service for Counter {
//!     fn methods(&self) -> Vec<MethodSpec> {
//!         vec![
//!             MethodSpec::method("Incr", Counter::incr),
//!             // Visible for introspection, filtered out at registration.
//!             MethodSpec::declared(
//!                 "Reset",
//!                 Signature::new().returns(TypeTag::of::<()>()),
//!             ),
//!         ]
//!     }
//! }
//! # let _ = Param::by_ref::<u32>();
//! ```

mod context;
mod method;
mod signature;

pub use crate::error::CallError;
pub use context::RequestContext;
pub use method::{
    CallResult, Callable, HandlerRef, MethodDescriptor, MethodSpec, Service, TypedMethod,
};
pub use signature::{
    is_exported, simple_type_name, Conforming, Param, ParamKind, Signature, SignatureMismatch,
    TypeTag, METHOD_ARITY,
};
