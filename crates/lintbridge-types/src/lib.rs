//! Stable DTOs shared across the lintbridge workspace.
//!
//! This crate is intentionally boring:
//! - the invocation request an adapter receives and the raw output it hands back
//! - normalized findings and the severity-bucketed result
//! - the report envelope written by the CLI

#![forbid(unsafe_code)]

pub mod finding;
pub mod ids;
pub mod invocation;
pub mod report;

pub use finding::{Finding, LineMarker, LintResult, Severity};
pub use invocation::{InvocationRequest, RawOutput, ToolIdentity};
pub use report::{
    AdapterReport, AdapterStatus, LintbridgeData, LintbridgeReport, ReportedFinding, ToolMeta,
    Verdict, SCHEMA_REPORT_V1,
};
