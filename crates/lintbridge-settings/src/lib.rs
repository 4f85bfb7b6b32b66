//! Config parsing and per-adapter plan resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{AdapterConfig, LintbridgeConfigV1};
pub use resolve::{AdapterPlan, FailurePolicy, Overrides, ResolvedConfig};

use camino::Utf8Path;

/// Parse `lintbridge.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LintbridgeConfigV1> {
    let cfg: LintbridgeConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve which adapters run and with what invocation request (config + overrides).
///
/// `known_adapters` is the set of names the host can actually run; anything else is an error.
pub fn resolve_config(
    cfg: LintbridgeConfigV1,
    overrides: Overrides,
    root: &Utf8Path,
    known_adapters: &[&str],
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides, root, known_adapters)
}
