use anyhow::Context;
use lintbridge_render::{
    RenderableAdapter, RenderableData, RenderableFinding, RenderableMarker, RenderableReport,
    RenderableSeverity, RenderableVerdict,
};
use lintbridge_types::{
    ids, AdapterReport, Finding, LineMarker, LintbridgeData, LintbridgeReport, ReportedFinding,
    Severity, ToolMeta, Verdict, SCHEMA_REPORT_V1,
};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Exit code for a run whose verdict is `fail`.
pub const EXIT_FAIL: i32 = 2;

/// Stable fingerprint for a normalized finding.
///
/// SHA-256 over `adapter|severity|path|first_line|last_line|message`, hex encoded.
pub fn fingerprint_for_finding(adapter: &str, severity: Severity, finding: &Finding) -> String {
    let first = finding.first_line.to_string();
    let last = finding.last_line.to_string();
    let canonical = [
        adapter,
        severity.as_str(),
        finding.path.as_str(),
        first.as_str(),
        last.as_str(),
        finding.message.as_str(),
    ]
    .join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn parse_report_json(text: &str) -> anyhow::Result<LintbridgeReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse lintbridge report")
}

pub fn serialize_report(report: &LintbridgeReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// A report recording that the host failed before it could run adapters.
pub fn runtime_error_report(message: &str) -> LintbridgeReport {
    let now = OffsetDateTime::now_utc();
    LintbridgeReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        adapters: Vec::new(),
        data: LintbridgeData::default(),
        runtime_error: Some(message.to_string()),
    }
}

pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => EXIT_FAIL,
    }
}

pub fn to_renderable(report: &LintbridgeReport) -> RenderableReport {
    let mut findings = Vec::new();
    for adapter in &report.adapters {
        for severity in Severity::ALL {
            findings.extend(
                adapter
                    .bucket(severity)
                    .iter()
                    .map(|f| renderable_finding(&adapter.adapter, severity, f)),
            );
        }
    }

    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        adapters: report.adapters.iter().map(renderable_adapter).collect(),
        findings,
        data: RenderableData {
            adapters_run: report.data.adapters_run,
            adapters_failed: report.data.adapters_failed,
            findings_total: report.data.findings_total,
        },
    }
}

fn renderable_adapter(a: &AdapterReport) -> RenderableAdapter {
    let status = serde_json::to_value(a.status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    RenderableAdapter {
        name: a.adapter.clone(),
        status,
        is_success: a.is_success,
        errors: a.error.len() as u32,
        warnings: a.warning.len() as u32,
        notices: a.notice.len() as u32,
        notes: a.warnings.clone(),
        failure: a.failure.clone(),
    }
}

fn renderable_finding(adapter: &str, severity: Severity, f: &ReportedFinding) -> RenderableFinding {
    RenderableFinding {
        severity: match severity {
            Severity::Error => RenderableSeverity::Error,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Notice => RenderableSeverity::Notice,
        },
        adapter: adapter.to_string(),
        path: f.path.clone(),
        first_line: renderable_marker(&f.first_line),
        last_line: renderable_marker(&f.last_line),
        message: f.message.clone(),
    }
}

fn renderable_marker(m: &LineMarker) -> RenderableMarker {
    match m {
        LineMarker::Line(n) => RenderableMarker::Line(*n),
        LineMarker::Id(id) => RenderableMarker::Id(id.clone()),
    }
}
