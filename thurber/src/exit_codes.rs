//! Stable exit codes for thurber CLI commands.

/// Command succeeded, or the operator ended the session.
pub const OK: i32 = 0;
/// Invalid config/arguments or any other startup failure.
pub const INVALID: i32 = 1;
