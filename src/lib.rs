//! # rpc-service-map
//!
//! Hierarchical service/method registry and resolver for an RPC dispatch
//! layer.
//!
//! Handler objects are registered under dotted namespace paths (`"Billing.Invoices"`).
//! Each handler publishes a capability table; only methods matching the
//! calling convention
//!
//! ```text
//! fn(&self, ctx: &RequestContext, args: &Args, reply: &mut Reply) -> Result<(), CallError>
//! ```
//!
//! are kept. At request time the transport resolves the dotted
//! `"service.path.Method"` string from the wire to a [`MethodDescriptor`] and
//! the owning handler, or lets [`ServiceMap::dispatch`] decode, invoke and
//! encode in one step.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rpc_service_map::handler::{CallResult, MethodSpec, Service};
//! use rpc_service_map::{RequestContext, ServiceMap};
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn hello(&self, _ctx: &RequestContext, name: &String, reply: &mut String) -> CallResult {
//!         *reply = format!("hello, {name}");
//!         Ok(())
//!     }
//! }
//!
//! impl Service for Greeter {
//!     fn methods(&self) -> Vec<MethodSpec> {
//!         vec![MethodSpec::method("Hello", Greeter::hello)]
//!     }
//! }
//!
//! let map = ServiceMap::new();
//! map.register(Arc::new(Greeter), "Greeter").unwrap();
//!
//! let (method, handler) = map.resolve("Greeter.Hello").unwrap();
//! let mut reply = String::new();
//! method
//!     .invoke(&handler, &RequestContext::new("Greeter.Hello", 1), &"ada".to_string(), &mut reply)
//!     .unwrap();
//! assert_eq!(reply, "hello, ada");
//! ```

pub mod codec;
pub mod error;
pub mod handler;
pub mod registry;

pub use error::{CallError, RegistryError, Result};
pub use handler::{HandlerRef, MethodDescriptor, MethodSpec, RequestContext, Service};
pub use registry::{RegistryConfig, ServiceMap, ServiceMapBuilder};
