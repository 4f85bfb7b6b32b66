use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `lintbridge.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LintbridgeConfigV1 {
    /// Optional schema string for tooling (`lintbridge.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// What a failing adapter does to the run: `continue` (default) or `abort`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_adapter_error: Option<String>,

    /// Map of adapter name -> config.
    #[serde(default)]
    pub adapters: BTreeMap<String, AdapterConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Directory to run the tool in, relative to the repo root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// File extensions relevant to the tool.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Extra arguments appended to the tool's command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,

    /// Command placed in front of the tool (e.g. `php`, `docker compose exec app`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<bool>,
}
