//! Deterministic, pure workflow status logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod completion;
pub mod registry;
pub mod snapshot;
pub mod status;
pub mod types;
pub mod value;
