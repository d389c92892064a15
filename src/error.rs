//! Error types for the treestore persistence and bridge layers.

use crate::bridge::AccessType;
use std::path::PathBuf;
use thiserror::Error;

/// Path addressing errors
///
/// Every variant is an invalid-argument condition: the path text itself is
/// malformed for the node it addresses. A well-formed path that simply does
/// not exist is reported as `Ok(false)` by the resolver, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed array index in path segment: '{0}'")]
    MalformedIndex(String),

    #[error("malformed map key in path segment: '{segment}' ({reason})")]
    MalformedKey { segment: String, reason: String },

    #[error("empty map key not supported")]
    EmptyKey,

    #[error("unreachable path segment: '{path}' ({type_name} is not a container)")]
    Unreachable {
        path: String,
        type_name: &'static str,
    },

    #[error("trailing '/' in path segment: '{0}'")]
    TrailingSlash(String),
}

/// Codec errors for a single node
///
/// Raised for the node whose own shape did not match the document. Mismatches
/// deeper in the tree go to the diagnostic channel instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("failed to deserialize '{type_name}': JSON type is {found}")]
    Mismatch {
        type_name: &'static str,
        found: &'static str,
    },

    #[error("failed to deserialize '{type_name}': {reason}")]
    Scalar {
        type_name: &'static str,
        reason: String,
    },

    #[error("failed to serialize {type_name}: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },
}

/// Durable store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render document for {path:?}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Remote property bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown item: {0}")]
    NotFound(String),

    #[error("no {access} access: {path}")]
    AccessDenied { path: String, access: AccessType },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0} node is not in the tree")]
    NodeNotInTree(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PathError> for BridgeError {
    fn from(err: PathError) -> Self {
        BridgeError::InvalidArgument(err.to_string())
    }
}

impl From<CodecError> for BridgeError {
    fn from(err: CodecError) -> Self {
        BridgeError::InvalidArgument(err.to_string())
    }
}
