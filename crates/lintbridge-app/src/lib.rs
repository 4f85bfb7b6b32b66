//! Use case orchestration for lintbridge.
//!
//! This crate is the host side of the adapter contract: it resolves which adapters run, drives
//! each through setup, lint, and parse, and assembles the report. Rendering is delegated to
//! `lintbridge-render`.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod render;
mod report;
mod run;

pub use render::{render_annotations, render_markdown};
pub use report::{
    EXIT_FAIL, fingerprint_for_finding, parse_report_json, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
pub use run::{run_lint, RunInput, RunOutput};
