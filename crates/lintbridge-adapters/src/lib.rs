//! The adapter contract and the adapters that implement it.
//!
//! An adapter wraps one external tool: it checks the tool is installed, runs it against a
//! directory, and turns its machine-readable output into a [`LintResult`]. Adapters are
//! zero-sized values; everything they touch is passed in per call.
//!
//! [`LintResult`]: lintbridge_types::LintResult

#![forbid(unsafe_code)]

mod adapter;
mod error;
mod registry;
mod security_checker;

pub use adapter::{join_command, AdapterWarning, LintRun, ToolAdapter};
pub use error::AdapterError;
pub use registry::AdapterRegistry;
pub use security_checker::SecurityChecker;
