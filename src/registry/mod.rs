//! Service map - hierarchical registration and method resolution.
//!
//! Handlers are registered under dotted namespace paths. Each registration
//! filters the handler's capability table against the calling convention and
//! attaches the surviving methods to the terminal node of the path. Requests
//! name a method as `"service.path.Method"` and are resolved by walking the
//! tree.
//!
//! # Locking
//!
//! The whole tree sits behind one `RwLock`. A registration holds the write
//! guard for its entire walk and splice; a resolution holds the read guard for
//! its walk and the final method lookup. Guards are scoped, so every exit path
//! releases them. Handlers are validated before the lock is taken and the tree
//! is only mutated once the path is known to be free: failed registrations
//! leave no trace.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rpc_service_map::handler::{CallResult, MethodSpec, Service};
//! use rpc_service_map::{RequestContext, ServiceMap};
//!
//! struct Clock;
//!
//! impl Clock {
//!     fn now(&self, _ctx: &RequestContext, _args: &(), reply: &mut u64) -> CallResult {
//!         *reply = 1_700_000_000;
//!         Ok(())
//!     }
//! }
//!
//! impl Service for Clock {
//!     fn methods(&self) -> Vec<MethodSpec> {
//!         vec![MethodSpec::method("Now", Clock::now)]
//!     }
//! }
//!
//! let map = ServiceMap::new();
//! map.register(Arc::new(Clock), "Time.Clock").unwrap();
//!
//! let (method, _handler) = map.resolve("Time.Clock.Now").unwrap();
//! assert_eq!(method.name(), "Now");
//! ```

mod config;
mod node;
mod schema;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{RegistryError, Result};
use crate::handler::{is_exported, HandlerRef, MethodDescriptor, MethodSpec, Service, TypeTag};

pub use config::RegistryConfig;
pub use schema::{MethodSchema, SchemaEntry, ServiceSchema, SCHEMA_VERSION};

use node::{NamespaceNode, ServiceEntry};

/// Builder for configuring a [`ServiceMap`].
#[derive(Debug, Clone, Default)]
pub struct ServiceMapBuilder {
    config: RegistryConfig,
}

impl ServiceMapBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context type methods must take by reference.
    ///
    /// Default: [`RequestContext`](crate::RequestContext)
    pub fn context_type<C: ?Sized + 'static>(mut self) -> Self {
        self.config.context_type = TypeTag::of::<C>();
        self
    }

    /// Set the type a method's single result must have.
    ///
    /// Only methods whose error type is exactly `E` are accepted. Their errors
    /// reach callers converted into [`CallError`](crate::CallError).
    ///
    /// Default: [`CallError`](crate::CallError)
    pub fn error_type<E: ?Sized + 'static>(mut self) -> Self {
        self.config.error_type = TypeTag::of::<E>();
        self
    }

    /// Allow registrations to share intermediate namespace segments.
    ///
    /// Default: false
    pub fn shared_namespaces(mut self, enabled: bool) -> Self {
        self.config.shared_namespaces = enabled;
        self
    }

    /// Build the service map.
    pub fn build(self) -> ServiceMap {
        ServiceMap::with_config(self.config)
    }
}

/// Thread-safe registry of services, shared between setup and dispatch.
pub struct ServiceMap {
    config: RegistryConfig,
    root: RwLock<NamespaceNode>,
}

impl ServiceMap {
    /// Create an empty map with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty map with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            root: RwLock::new(NamespaceNode::root()),
        }
    }

    /// Create a new builder.
    pub fn builder() -> ServiceMapBuilder {
        ServiceMapBuilder::new()
    }

    /// Get the active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register `handler` under the dotted `path`.
    ///
    /// An empty path registers under the handler's
    /// [`service_name`](Service::service_name), which must be exported and
    /// must be a single segment.
    ///
    /// # Errors
    ///
    /// - `InvalidServiceName` - empty segment, or a derived name that is
    ///   unexported or dotted
    /// - `NoSuitableMethods` - no method matches the calling convention
    /// - `DuplicateService` - the path collides with a registered node
    pub fn register<S: Service>(&self, handler: Arc<S>, path: &str) -> Result<()> {
        let derived;
        let segments: Vec<&str> = if path.is_empty() {
            derived = handler.service_name();
            if derived.contains('.') || !is_exported(&derived) {
                tracing::warn!("Refusing to register under derived name {:?}", derived);
                return Err(RegistryError::InvalidServiceName(derived));
            }
            vec![derived.as_str()]
        } else {
            path.split('.').collect()
        };

        if segments.iter().any(|s| s.is_empty()) {
            tracing::warn!("Refusing to register empty path segment in {:?}", path);
            return Err(RegistryError::InvalidServiceName(path.to_string()));
        }

        let label = segments.join(".");
        let methods = self.accept_methods(&label, handler.methods());
        if methods.is_empty() {
            tracing::warn!("Service {:?} has no suitable methods", label);
            return Err(RegistryError::NoSuitableMethods(label));
        }

        let count = methods.len();
        let entry = ServiceEntry {
            handler,
            methods,
        };

        self.root
            .write()
            .insert(&segments, entry, self.config.shared_namespaces)
            .inspect_err(|e| tracing::warn!("Registration of {:?} failed: {}", label, e))?;

        tracing::info!("Registered service {:?} with {} methods", label, count);
        Ok(())
    }

    /// Register `handler` under its derived service name.
    pub fn register_default<S: Service>(&self, handler: Arc<S>) -> Result<()> {
        self.register(handler, "")
    }

    /// Filter a capability table down to the methods callable over RPC.
    fn accept_methods(
        &self,
        service: &str,
        specs: Vec<MethodSpec>,
    ) -> HashMap<String, MethodDescriptor> {
        let mut accepted = HashMap::with_capacity(specs.len());

        for spec in specs {
            if !is_exported(spec.name()) {
                tracing::debug!("{}.{}: skipped, not exported", service, spec.name());
                continue;
            }

            let bound = match spec
                .signature()
                .check(self.config.context_type, self.config.error_type)
            {
                Ok(bound) => bound,
                Err(reason) => {
                    tracing::debug!("{}.{}: skipped, {}", service, spec.name(), reason);
                    continue;
                }
            };

            let Some(callable) = spec.callable() else {
                tracing::debug!("{}.{}: skipped, declared without a body", service, spec.name());
                continue;
            };

            if accepted.contains_key(spec.name()) {
                tracing::warn!("{}.{}: duplicate method ignored", service, spec.name());
                continue;
            }

            let descriptor =
                MethodDescriptor::new(spec.name(), bound.args, bound.reply, callable.clone());
            accepted.insert(spec.name().to_string(), descriptor);
        }

        accepted
    }

    /// Resolve `"service.path.Method"` to its descriptor and owning handler.
    ///
    /// # Errors
    ///
    /// - `MalformedName` - no `.` in `full_name`
    /// - `ServiceNotFound` - a namespace segment is not registered
    /// - `MethodNotFound` - the service has no such method
    pub fn resolve(&self, full_name: &str) -> Result<(MethodDescriptor, HandlerRef)> {
        let Some((service, method)) = full_name.rsplit_once('.') else {
            tracing::debug!("Malformed method name {:?}", full_name);
            return Err(RegistryError::MalformedName(full_name.to_string()));
        };

        let root = self.root.read();

        let Some(node) = root.find(service.split('.')) else {
            tracing::debug!("No service for {:?}", full_name);
            return Err(RegistryError::ServiceNotFound(full_name.to_string()));
        };

        match (node.method(method), node.handler()) {
            (Some(descriptor), Some(handler)) => Ok((descriptor.clone(), handler.clone())),
            _ => {
                tracing::debug!("No method for {:?}", full_name);
                Err(RegistryError::MethodNotFound(full_name.to_string()))
            }
        }
    }

    /// Resolve, decode args, invoke and encode the reply.
    ///
    /// The tree lock is released before the handler runs.
    ///
    /// # Arguments
    ///
    /// * `full_name` - Dotted method name from the wire request
    /// * `ctx` - Request context, of the configured context type
    /// * `payload` - MsgPack-encoded args
    pub fn dispatch<C: Any>(&self, full_name: &str, ctx: &C, payload: &[u8]) -> Result<Bytes> {
        let (method, handler) = self.resolve(full_name)?;

        let args = method.decode_args(payload)?;
        let mut reply = method.new_reply();

        method.invoke(&handler, ctx, &*args, &mut *reply)?;

        Ok(Bytes::from(method.encode_reply(&*reply)?))
    }

    /// Check whether a namespace node exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.root.read().find(path.split('.')).is_some()
    }

    /// Sorted method names of the service at `path`.
    pub fn methods_of(&self, path: &str) -> Option<Vec<String>> {
        let root = self.root.read();
        let node = root.find(path.split('.'))?;
        node.handler()?;

        let mut names: Vec<String> = node.methods().map(|m| m.name().to_string()).collect();
        names.sort();
        Some(names)
    }

    /// Number of registered services (nodes carrying a handler).
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.root.read().for_each_service("", &mut |_, _| count += 1);
        count
    }

    /// Check if no service is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every registered service and its methods.
    pub fn schema(&self) -> ServiceSchema {
        ServiceSchema::collect(&self.root.read())
    }

    /// The [`schema`](Self::schema) serialized as JSON.
    pub fn schema_json(&self) -> Result<String> {
        self.schema().to_json()
    }
}

impl Default for ServiceMap {
    fn default() -> Self {
        Self::new()
    }
}
