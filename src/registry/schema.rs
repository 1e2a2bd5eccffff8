//! Introspection snapshot of the registered services.
//!
//! Hosting servers expose this to clients for discovery.
//!
//! # Example
//!
//! ```
//! use rpc_service_map::registry::{MethodSchema, ServiceSchema, SchemaEntry};
//!
//! let schema = ServiceSchema {
//!     version: rpc_service_map::registry::SCHEMA_VERSION,
//!     services: vec![SchemaEntry {
//!         path: "Math".to_string(),
//!         methods: vec![MethodSchema {
//!             name: "Add".to_string(),
//!             args: "Operands".to_string(),
//!             reply: "i64".to_string(),
//!         }],
//!     }],
//! };
//! let json = schema.to_json().unwrap();
//! assert!(json.contains("\"Math\""));
//! ```

use serde::Serialize;

use super::node::NamespaceNode;
use crate::error::Result;

/// Schema format version.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// One exposed method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSchema {
    /// Method name.
    pub name: String,
    /// Simple name of the args type.
    pub args: String,
    /// Simple name of the reply type.
    pub reply: String,
}

/// One registered service and its methods, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    /// Dotted namespace path.
    pub path: String,
    /// Exposed methods.
    pub methods: Vec<MethodSchema>,
}

/// Every registered service, sorted by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSchema {
    /// Schema format version, [`SCHEMA_VERSION`].
    pub version: &'static str,
    /// Registered services, sorted by path.
    pub services: Vec<SchemaEntry>,
}

impl ServiceSchema {
    pub(crate) fn collect(root: &NamespaceNode) -> Self {
        let mut services = Vec::new();

        root.for_each_service("", &mut |path, node| {
            let mut methods: Vec<MethodSchema> = node
                .methods()
                .map(|m| MethodSchema {
                    name: m.name().to_string(),
                    args: m.arg_type().simple_name().to_string(),
                    reply: m.reply_type().simple_name().to_string(),
                })
                .collect();
            methods.sort_by(|a, b| a.name.cmp(&b.name));

            services.push(SchemaEntry {
                path: path.to_string(),
                methods,
            });
        });
        services.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            version: SCHEMA_VERSION,
            services,
        }
    }

    /// Get a service entry by dotted path.
    pub fn get(&self, path: &str) -> Option<&SchemaEntry> {
        self.services.iter().find(|s| s.path == path)
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if schema is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
