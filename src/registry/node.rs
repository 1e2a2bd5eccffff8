//! Namespace tree nodes.
//!
//! Nodes are only ever added. A registration validates the whole path before
//! touching the tree and then splices a freshly built chain in with a single
//! insert, so a failed call never leaves partial nodes behind.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{RegistryError, Result};
use crate::handler::{HandlerRef, MethodDescriptor};

/// Handler plus its filtered method table, ready to attach to a terminal node.
pub(crate) struct ServiceEntry {
    pub handler: HandlerRef,
    pub methods: HashMap<String, MethodDescriptor>,
}

#[derive(Default)]
pub(crate) struct NamespaceNode {
    name: String,
    handler: Option<HandlerRef>,
    methods: HashMap<String, MethodDescriptor>,
    children: HashMap<String, NamespaceNode>,
}

impl NamespaceNode {
    /// The unnamed root.
    pub fn root() -> Self {
        Self::default()
    }

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Build the chain `name.rest[0]...rest[n]` with `entry` on its last node.
    fn staged(name: &str, rest: &[&str], entry: ServiceEntry) -> Self {
        let mut node = Self::named(name);
        match rest.split_first() {
            Some((next, tail)) => {
                node.children
                    .insert((*next).to_string(), Self::staged(next, tail, entry));
            }
            None => node.attach(entry),
        }
        node
    }

    fn attach(&mut self, entry: ServiceEntry) {
        self.handler = Some(entry.handler);
        self.methods = entry.methods;
    }

    /// Insert `entry` at `segments` below this node.
    ///
    /// With `shared` unset, any existing segment is a collision. With it set,
    /// existing segments are descended into and only a terminal that already
    /// has a handler collides. Nothing is mutated on failure.
    pub fn insert(&mut self, segments: &[&str], entry: ServiceEntry, shared: bool) -> Result<()> {
        let mut node = self;
        let mut built = String::new();

        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 {
                built.push('.');
            }
            built.push_str(segment);

            match node.children.entry((*segment).to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(Self::staged(segment, &segments[depth + 1..], entry));
                    return Ok(());
                }
                Entry::Occupied(_) if !shared => {
                    return Err(RegistryError::DuplicateService(built));
                }
                Entry::Occupied(slot) => node = slot.into_mut(),
            }
        }

        if node.handler.is_some() {
            return Err(RegistryError::DuplicateService(built));
        }
        node.attach(entry);
        Ok(())
    }

    /// Walk `segments` below this node.
    pub fn find<'a, I>(&self, segments: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    #[inline]
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    #[inline]
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    #[inline]
    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values()
    }

    /// Visit every node carrying a handler, depth first, with its dotted path.
    pub fn for_each_service<F>(&self, prefix: &str, f: &mut F)
    where
        F: FnMut(&str, &NamespaceNode),
    {
        for child in self.children.values() {
            let path = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{}.{}", prefix, child.name)
            };
            if child.handler.is_some() {
                f(&path, child);
            }
            child.for_each_service(&path, f);
        }
    }
}
