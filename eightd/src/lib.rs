//! Customer feedback intake wizard and 8D remediation status engine.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (value model, completeness rules,
//!   step registry, status computation). No I/O.
//! - **[`io`]**: Side-effecting operations (answers file, config, feedback log,
//!   terminal prompts).
//!
//! [`session`] coordinates the two to run the wizard, and [`report`] renders
//! its outcome.

pub mod core;
pub mod exit_codes;
pub mod intake;
pub mod io;
pub mod logging;
pub mod report;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
