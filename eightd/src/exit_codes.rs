//! Stable exit codes for eightd commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid config, answers file or arguments, or any other error.
pub const INVALID: i32 = 1;
/// `eightd status` found missing steps with none available to start.
pub const STALLED: i32 = 2;
/// Input ended while the wizard was waiting for an answer.
pub const ABORTED: i32 = 130;
