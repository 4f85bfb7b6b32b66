use crate::{Finding, LineMarker, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for lintbridge reports.
pub const SCHEMA_REPORT_V1: &str = "lintbridge.report.v1";

/// Overall run outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// How far an adapter got before the report was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdapterStatus {
    Completed,
    SetupFailed,
    ExecutionFailed,
    ParseFailed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// A normalized finding as persisted in a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportedFinding {
    pub path: String,
    pub first_line: LineMarker,
    pub last_line: LineMarker,
    pub message: String,
    /// Stable identifier intended for dedup and trending: a hash of
    /// `adapter + severity + path + first_line + last_line + message`.
    pub fingerprint: String,
}

impl ReportedFinding {
    pub fn into_finding(self) -> Finding {
        Finding {
            path: self.path,
            first_line: self.first_line,
            last_line: self.last_line,
            message: self.message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AdapterReport {
    pub adapter: String,
    pub status: AdapterStatus,
    pub is_success: bool,
    #[serde(default)]
    pub error: Vec<ReportedFinding>,
    #[serde(default)]
    pub warning: Vec<ReportedFinding>,
    #[serde(default)]
    pub notice: Vec<ReportedFinding>,
    /// Non-fatal adapter warnings (e.g. auto-fix requested but unsupported).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Failure description when `status` is not `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl AdapterReport {
    pub fn bucket(&self, severity: Severity) -> &[ReportedFinding] {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
            Severity::Notice => &self.notice,
        }
    }

    pub fn findings_total(&self) -> usize {
        self.error.len() + self.warning.len() + self.notice.len()
    }
}

/// Run summary payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintbridgeData {
    pub adapters_run: u32,
    pub adapters_failed: u32,
    pub findings_total: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LintbridgeReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub adapters: Vec<AdapterReport>,
    pub data: LintbridgeData,
    /// Set when the host itself failed before or while running adapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_error: Option<String>,
}
