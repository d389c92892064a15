//! Integration tests for treestore

mod codec_scenarios;
mod config_integration;
mod store_integration;
mod test_utils;
mod tree_paths;
