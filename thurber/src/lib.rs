//! Interactive reasoning loop over a local chat-completion model.
//!
//! The operator poses problems and registers long-term goals. Problems are
//! decomposed into ordered steps that are executed one per idle interval;
//! when no problem step is pending, idle time is spent pondering each goal.
//!
//! - **[`core`]**: Pure, deterministic logic (routing, step parsing, state
//!   transitions, invariants). No I/O.
//! - **[`io`]**: Side effects (config, durable records, HTTP completion client,
//!   line input, prompt rendering).
//! - **[`agents`]**: The completion-backed delegates: decomposer, executor, ponderer.
//!
//! [`scheduler`] drives a [`session::Session`] from input and idle timeouts.

pub mod agents;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
