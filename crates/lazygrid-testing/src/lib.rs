//! Testing infrastructure for lazygrid integration tests.
//!
//! This crate provides utilities for writing deterministic tests against the
//! grid runtime:
//! - `records`: a sample record type and a fixed fixture dataset
//! - `source`: page sources with scripted behavior: an immediate in-memory
//!   source with failure injection, and a manual source whose responses are
//!   released explicitly for supersession and cancellation scenarios
//! - `support`: polling helpers for asserting on asynchronous completions

pub mod records;
pub mod source;
pub mod support;

pub use records::{sample_records, SampleRecord, FIXTURE_RECORDS};
pub use source::{FixtureSource, ManualSource, PendingFetch};
pub use support::eventually;
