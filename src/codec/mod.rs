//! Codec between typed trees and JSON documents
//!
//! Encoding walks a node by category and produces a `serde_json::Value`;
//! decoding applies a value onto an existing node. Records diff against their
//! canonical defaults so that only overridden fields are persisted, and
//! encoding merges into a previous document so keys the current types do not
//! know about survive a round trip.

pub mod decode;
pub mod encode;

pub use decode::{decode, decode_new};
pub use encode::{encode, encode_into, Encoded};

use crate::diagnostics::Diagnostics;
use crate::error::CodecError;
use crate::tree::node::Node;

/// Encode `node` in full and render it as compact JSON text.
pub fn to_json_string(node: &dyn Node, diag: &Diagnostics) -> String {
    encode(node, false, diag).to_string()
}

/// Parse `text` and decode it into `node`.
///
/// Parse errors are reported as [`CodecError::Scalar`] against the node's
/// type, since no structure could be matched.
pub fn from_json_str(text: &str, node: &mut dyn Node, diag: &Diagnostics) -> Result<(), CodecError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CodecError::Scalar {
            type_name: node.type_name(),
            reason: format!("JSON parse error: {}", e),
        })?;
    decode(&value, node, diag)
}
