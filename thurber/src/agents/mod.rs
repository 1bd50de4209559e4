//! Completion-backed delegates of the scheduler.
//!
//! Each delegate sends the session's conversation history plus its own prompt to a
//! [`crate::io::completion::CompletionClient`], applies the reply to session state, and
//! persists what it changed. A failed completion leaves state untouched.

pub mod decomposer;
pub mod executor;
pub mod ponderer;
