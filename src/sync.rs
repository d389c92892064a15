//! Shared access to a store and its bridge
//!
//! The store and bridge assume a single caller. `SharedStore` serialises
//! every operation behind one mutex for hosts that dispatch bridge calls on
//! a different thread than the one mutating the root.

use crate::bridge::{Bridge, ValueMap};
use crate::error::BridgeError;
use crate::store::{DocumentSink, FileSink, SaveOutcome, Store};
use crate::tree::node::Node;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

pub struct SharedStore<T: Node + Default, S: DocumentSink = FileSink> {
    store: Arc<Mutex<Store<T, S>>>,
    bridge: Arc<Bridge>,
}

impl<T: Node + Default, S: DocumentSink> Clone for SharedStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<T: Node + Default, S: DocumentSink> SharedStore<T, S> {
    pub fn new(store: Store<T, S>, bridge: Bridge) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            bridge: Arc::new(bridge),
        }
    }

    /// Exclusive access to the store for direct mutation.
    pub fn lock(&self) -> MutexGuard<'_, Store<T, S>> {
        self.store.lock()
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn get(&self, path: &str) -> Result<String, BridgeError> {
        let store = self.store.lock();
        self.bridge.get(store.root(), path)
    }

    pub fn get_all(&self) -> ValueMap {
        let store = self.store.lock();
        self.bridge.get_all(store.root())
    }

    pub fn set(&self, path: &str, text: &str) -> Result<(), BridgeError> {
        let mut store = self.store.lock();
        self.bridge.set(store.root_mut(), path, text)
    }

    /// Set a value and persist the store under the same lock.
    pub fn set_and_save(&self, path: &str, text: &str) -> Result<SaveOutcome, BridgeError> {
        let mut store = self.store.lock();
        self.bridge.set(store.root_mut(), path, text)?;
        Ok(store.save()?)
    }

    pub fn values_changed_at(&self, paths: &[&str]) -> Result<ValueMap, BridgeError> {
        let store = self.store.lock();
        self.bridge.values_changed_at(store.root(), paths)
    }
}
