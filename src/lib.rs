//! Treestore: Durable, Path-Addressable Typed Trees
//!
//! Maps native Rust values (records, sequences, associations and scalars) to
//! and from JSON documents, addresses any node by a slash-delimited path,
//! persists a root tree atomically with default-value diffing, and exposes
//! it to remote peers through get/set/enumerate/change-notify operations.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod store;
pub mod sync;
pub mod tree;

pub use bridge::{AccessType, Bridge, SignalSink, ValueMap};
pub use codec::{decode, encode, Encoded};
pub use diagnostics::Diagnostics;
pub use error::{BridgeError, CodecError, ConfigError, PathError, StoreError};
pub use store::{SaveOutcome, Store, StoreOptions, StoreState};
pub use sync::SharedStore;
pub use tree::{Category, Node};

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
