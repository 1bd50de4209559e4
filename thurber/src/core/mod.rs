//! Deterministic, pure logic shared by the session core.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod goals;
pub mod history;
pub mod invariants;
pub mod problem;
pub mod router;
pub mod steps;
