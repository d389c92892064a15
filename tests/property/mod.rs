//! Property-based tests for codec and path invariants

mod roundtrip;
