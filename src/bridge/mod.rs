//! Remote Property Bridge
//!
//! Exposes a tree to a remote peer through four operations: `get`, `get_all`,
//! `set`, and a `values_changed` notification. Values travel as JSON text and
//! nodes are addressed by path. The transport is supplied by the host; change
//! notifications leave through a [`SignalSink`].
//!
//! Calls are synchronous and expect exclusive access to the root. The access
//! filter, the set hook and the signal sink run inline and must not call back
//! into the bridge for the same root.

mod values;

use crate::codec::{decode, encode};
use crate::diagnostics::Diagnostics;
use crate::error::BridgeError;
use crate::tree::node::Node;
use crate::tree::path::{resolve, resolve_mut};
use crate::tree::walker::path_to;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use values::ValuesBuilder;

/// Kind of access checked by the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    Read,
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => f.write_str("read"),
            AccessType::Write => f.write_str("write"),
        }
    }
}

/// Path -> JSON text
pub type ValueMap = BTreeMap<String, String>;

/// Returns true when `access` to the path is allowed.
pub type AccessFilter = Arc<dyn Fn(&str, AccessType) -> bool + Send + Sync>;

type SetHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Receiver for `values_changed` events
pub trait SignalSink: Send + Sync {
    fn values_changed(&self, values: &ValueMap);
}

impl<F> SignalSink for F
where
    F: Fn(&ValueMap) + Send + Sync,
{
    fn values_changed(&self, values: &ValueMap) {
        self(values)
    }
}

/// Property access over one tree root
#[derive(Clone, Default)]
pub struct Bridge {
    filter: Option<AccessFilter>,
    on_set: Option<SetHook>,
    signal: Option<Arc<dyn SignalSink>>,
    diagnostics: Diagnostics,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, AccessType) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Run `hook` with the path after every successful `set`.
    pub fn on_set<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_set = Some(Arc::new(hook));
        self
    }

    pub fn with_signal<S>(mut self, sink: S) -> Self
    where
        S: SignalSink + 'static,
    {
        self.signal = Some(Arc::new(sink));
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    fn allowed(&self, path: &str, access: AccessType) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(path, access))
    }

    fn check(&self, path: &str, access: AccessType) -> Result<(), BridgeError> {
        if self.allowed(path, access) {
            Ok(())
        } else {
            Err(BridgeError::AccessDenied {
                path: path.to_string(),
                access,
            })
        }
    }

    /// JSON text of the node at `path`, with every field included.
    pub fn get(&self, root: &dyn Node, path: &str) -> Result<String, BridgeError> {
        let mut text = None;
        let found = resolve(root, path, &mut |node| {
            text = Some(
                self.check(path, AccessType::Read)
                    .map(|()| encode(node, false, &self.diagnostics).to_string()),
            );
        })?;

        match text {
            Some(text) if found => text,
            _ => Err(BridgeError::NotFound(path.to_string())),
        }
    }

    /// Every published value of the tree.
    pub fn get_all(&self, root: &dyn Node) -> ValueMap {
        let mut builder = ValuesBuilder::new(self.filter.as_ref(), &self.diagnostics);
        builder.collect("", root);
        builder.finish()
    }

    /// Decode JSON `text` into the node at `path`.
    ///
    /// Missing association keys along the path are inserted. The access
    /// filter is consulted first, so a denied call never modifies the tree.
    /// The caller persists the change if needed.
    pub fn set(&self, root: &mut dyn Node, path: &str, text: &str) -> Result<(), BridgeError> {
        self.check(path, AccessType::Write)?;

        let value: Value = serde_json::from_str(text)
            .map_err(|e| BridgeError::InvalidArgument(format!("JSON parse error: {}", e)))?;

        let mut outcome = Ok(());
        let found = resolve_mut(root, path, true, &mut |node| {
            if let Err(err) = decode(&value, node, &self.diagnostics) {
                outcome = Err(BridgeError::InvalidArgument(err.to_string()));
            }
        })?;

        if !found {
            return Err(BridgeError::NotFound(path.to_string()));
        }
        outcome?;

        debug!(path, "Property set");
        if let Some(hook) = &self.on_set {
            hook(path);
        }
        Ok(())
    }

    /// Publish the given nodes, located in `root` by identity.
    ///
    /// Fails without emitting anything if a node is not part of the tree.
    pub fn values_changed(
        &self,
        root: &dyn Node,
        nodes: &[&dyn Node],
    ) -> Result<ValueMap, BridgeError> {
        let mut builder = ValuesBuilder::new(self.filter.as_ref(), &self.diagnostics);
        for node in nodes {
            let path =
                path_to(root, *node).ok_or_else(|| BridgeError::NodeNotInTree(node.type_name()))?;
            builder.collect(&path, *node);
        }
        let values = builder.finish();
        self.emit(&values);
        Ok(values)
    }

    /// Publish the nodes at the given paths.
    pub fn values_changed_at(
        &self,
        root: &dyn Node,
        paths: &[&str],
    ) -> Result<ValueMap, BridgeError> {
        let mut builder = ValuesBuilder::new(self.filter.as_ref(), &self.diagnostics);
        for path in paths {
            let found = resolve(root, path, &mut |node| builder.collect(path, node))?;
            if !found {
                return Err(BridgeError::NotFound(path.to_string()));
            }
        }
        let values = builder.finish();
        self.emit(&values);
        Ok(values)
    }

    fn emit(&self, values: &ValueMap) {
        if values.is_empty() {
            return;
        }
        debug!(count = values.len(), "Emitting values_changed");
        if let Some(signal) = &self.signal {
            signal.values_changed(values);
        }
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("filter", &self.filter.is_some())
            .field("on_set", &self.on_set.is_some())
            .field("signal", &self.signal.is_some())
            .finish()
    }
}
