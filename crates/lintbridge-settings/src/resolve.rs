use crate::model::{AdapterConfig, LintbridgeConfigV1};
use anyhow::Context;
use camino::Utf8Path;
use lintbridge_types::{ids, InvocationRequest};

/// What the host does when an adapter fails setup, execution, or parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure in the adapter's report entry and keep going.
    #[default]
    Continue,
    /// Turn the whole run into an error.
    Abort,
}

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Run only these adapters (in this order), even if disabled in config.
    pub adapters: Vec<String>,
    /// Request auto-fix for every selected adapter.
    pub fix: bool,
    pub prefix: Option<String>,
    pub args: Option<String>,
    pub on_adapter_error: Option<String>,
}

/// One adapter to run and the request to run it with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterPlan {
    pub adapter: String,
    pub request: InvocationRequest,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub plans: Vec<AdapterPlan>,
    pub on_adapter_error: FailurePolicy,
}

pub fn resolve_config(
    cfg: LintbridgeConfigV1,
    overrides: Overrides,
    root: &Utf8Path,
    known_adapters: &[&str],
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != ids::SCHEMA_CONFIG_V1
    {
        anyhow::bail!(
            "unsupported config schema: {schema} (expected {})",
            ids::SCHEMA_CONFIG_V1
        );
    }

    for name in cfg.adapters.keys() {
        ensure_known(name, known_adapters).context("invalid [adapters] table")?;
    }

    let selected: Vec<String> = if !overrides.adapters.is_empty() {
        let mut names: Vec<String> = Vec::new();
        for name in &overrides.adapters {
            ensure_known(name, known_adapters)?;
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    } else if !cfg.adapters.is_empty() {
        cfg.adapters
            .iter()
            .filter(|(_, ac)| ac.enabled != Some(false))
            .map(|(name, _)| name.clone())
            .collect()
    } else {
        known_adapters.iter().map(|s| s.to_string()).collect()
    };

    let default_cfg = AdapterConfig::default();
    let plans = selected
        .into_iter()
        .map(|adapter| {
            let ac = cfg.adapters.get(&adapter).unwrap_or(&default_cfg);
            let request = build_request(ac, &overrides, root);
            AdapterPlan { adapter, request }
        })
        .collect();

    let on_adapter_error = match overrides
        .on_adapter_error
        .as_deref()
        .or(cfg.on_adapter_error.as_deref())
    {
        Some(v) => parse_failure_policy(v)?,
        None => FailurePolicy::default(),
    };

    Ok(ResolvedConfig {
        plans,
        on_adapter_error,
    })
}

fn build_request(ac: &AdapterConfig, overrides: &Overrides, root: &Utf8Path) -> InvocationRequest {
    let dir = match ac.dir.as_deref().map(str::trim) {
        None | Some("") | Some(".") => root.to_path_buf(),
        Some(rel) => root.join(rel),
    };

    InvocationRequest {
        dir,
        extensions: ac.extensions.clone(),
        args: overrides
            .args
            .clone()
            .or_else(|| ac.args.clone())
            .unwrap_or_default(),
        fix: overrides.fix || ac.fix.unwrap_or(false),
        prefix: overrides.prefix.clone().or_else(|| ac.prefix.clone()),
    }
}

fn ensure_known(name: &str, known_adapters: &[&str]) -> anyhow::Result<()> {
    if known_adapters.contains(&name) {
        Ok(())
    } else {
        anyhow::bail!(
            "unknown adapter: {name} (known: {})",
            known_adapters.join(", ")
        )
    }
}

fn parse_failure_policy(v: &str) -> anyhow::Result<FailurePolicy> {
    match v {
        "continue" => Ok(FailurePolicy::Continue),
        "abort" => Ok(FailurePolicy::Abort),
        other => anyhow::bail!("unknown on_adapter_error: {other} (expected continue|abort)"),
    }
}
