//! The `run` use case: resolve adapters, drive each through its contract, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use lintbridge_adapters::{AdapterError, AdapterRegistry, ToolAdapter};
use lintbridge_exec::{CommandRunner, PrerequisiteProbe};
use lintbridge_settings::{AdapterPlan, FailurePolicy, Overrides, ResolvedConfig};
use lintbridge_types::{
    ids, AdapterReport, AdapterStatus, LintResult, LintbridgeData, LintbridgeReport,
    ReportedFinding, Severity, ToolMeta, Verdict, SCHEMA_REPORT_V1,
};
use rayon::prelude::*;
use time::OffsetDateTime;

use crate::report::fingerprint_for_finding;

/// Input for the run use case.
#[derive(Clone, Debug)]
pub struct RunInput<'a> {
    /// Repository root; adapter directories resolve relative to it.
    pub root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the run use case.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub report: LintbridgeReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run every selected adapter and assemble a report.
///
/// Adapters run concurrently; report entries keep plan order. Each adapter is set up before it
/// lints, and a setup failure skips its `lint` call. With [`FailurePolicy::Abort`] the first
/// failing adapter in plan order becomes the returned error.
pub fn run_lint(
    input: RunInput<'_>,
    registry: &AdapterRegistry,
    runner: &dyn CommandRunner,
    probe: &dyn PrerequisiteProbe,
) -> anyhow::Result<RunOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        lintbridge_settings::LintbridgeConfigV1::default()
    } else {
        lintbridge_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        lintbridge_settings::resolve_config(cfg, input.overrides, input.root, &registry.names())
            .context("resolve config")?;

    let jobs = resolved
        .plans
        .iter()
        .map(|plan| {
            registry
                .get(&plan.adapter)
                .map(|adapter| (adapter, plan))
                .with_context(|| format!("adapter not registered: {}", plan.adapter))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outcomes: Vec<(AdapterReport, Option<AdapterError>)> = jobs
        .par_iter()
        .map(|(adapter, plan)| run_adapter(*adapter, plan, runner, probe))
        .collect();

    let mut adapters = Vec::with_capacity(outcomes.len());
    for (entry, error) in outcomes {
        if let Some(err) = error {
            if resolved.on_adapter_error == FailurePolicy::Abort {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("adapter {} failed", entry.adapter));
            }
            tracing::warn!(adapter = %entry.adapter, status = ?entry.status, "adapter failed; continuing");
        }
        adapters.push(entry);
    }

    let data = LintbridgeData {
        adapters_run: adapters.len() as u32,
        adapters_failed: adapters
            .iter()
            .filter(|a| a.status != AdapterStatus::Completed)
            .count() as u32,
        findings_total: adapters.iter().map(|a| a.findings_total() as u32).sum(),
    };

    let report = LintbridgeReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: compute_verdict(&adapters),
        adapters,
        data,
        runtime_error: None,
    };

    Ok(RunOutput {
        report,
        resolved_config: resolved,
    })
}

fn run_adapter(
    adapter: &dyn ToolAdapter,
    plan: &AdapterPlan,
    runner: &dyn CommandRunner,
    probe: &dyn PrerequisiteProbe,
) -> (AdapterReport, Option<AdapterError>) {
    let name = adapter.identity();
    let request = &plan.request;
    tracing::info!(adapter = %name, dir = %request.dir, "running adapter");

    if let Err(err) = adapter.verify_setup(probe, runner, request.dir(), request.prefix()) {
        return (failed_entry(name.as_str(), &err, Vec::new()), Some(err));
    }

    let run = match adapter.lint(runner, request) {
        Ok(run) => run,
        Err(err) => return (failed_entry(name.as_str(), &err, Vec::new()), Some(err)),
    };
    let warnings: Vec<String> = run.warnings.iter().map(ToString::to_string).collect();

    match adapter.parse_output(request.dir(), &run.output) {
        Ok(result) => {
            tracing::info!(
                adapter = %name,
                is_success = result.is_success,
                findings = result.findings_total(),
                "adapter finished"
            );
            (completed_entry(name.as_str(), result, warnings), None)
        }
        Err(err) => (failed_entry(name.as_str(), &err, warnings), Some(err)),
    }
}

fn completed_entry(adapter: &str, result: LintResult, warnings: Vec<String>) -> AdapterReport {
    let reported = |severity: Severity| -> Vec<ReportedFinding> {
        result
            .bucket(severity)
            .iter()
            .map(|f| ReportedFinding {
                fingerprint: fingerprint_for_finding(adapter, severity, f),
                path: f.path.clone(),
                first_line: f.first_line.clone(),
                last_line: f.last_line.clone(),
                message: f.message.clone(),
            })
            .collect()
    };

    AdapterReport {
        adapter: adapter.to_string(),
        status: AdapterStatus::Completed,
        is_success: result.is_success,
        error: reported(Severity::Error),
        warning: reported(Severity::Warning),
        notice: reported(Severity::Notice),
        warnings,
        failure: None,
    }
}

fn failed_entry(adapter: &str, err: &AdapterError, warnings: Vec<String>) -> AdapterReport {
    let status = match err {
        AdapterError::PrerequisiteMissing { .. } | AdapterError::ToolNotInstalled { .. } => {
            AdapterStatus::SetupFailed
        }
        AdapterError::Execution { .. } => AdapterStatus::ExecutionFailed,
        AdapterError::OutputParseError { .. } => AdapterStatus::ParseFailed,
    };

    AdapterReport {
        adapter: adapter.to_string(),
        status,
        is_success: false,
        error: Vec::new(),
        warning: Vec::new(),
        notice: Vec::new(),
        warnings,
        failure: Some(error_chain(err)),
    }
}

/// `err: source: source...`, the same shape `anyhow` prints with `{:#}`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn compute_verdict(adapters: &[AdapterReport]) -> Verdict {
    let all_clean = adapters.iter().all(|a| {
        a.status == AdapterStatus::Completed && a.is_success && a.error.is_empty()
    });
    if all_clean { Verdict::Pass } else { Verdict::Fail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintbridge_test_util::{ScriptedRunner, StaticProbe};
    use lintbridge_types::{LineMarker, RawOutput};

    const GUZZLE: &str = r#"{"guzzlehttp/guzzle": {"version": "6.2.0", "advisories": [
        {"cve": "CVE-2016-5385", "link": "https://x", "title": "Proxy header vuln"}
    ]}}"#;

    fn input<'a>(config_text: &'a str, overrides: Overrides) -> RunInput<'a> {
        RunInput {
            root: Utf8Path::new("/repo"),
            config_text,
            overrides,
        }
    }

    #[test]
    fn advisories_fail_the_run() {
        let runner = ScriptedRunner::new()
            .with_output(RawOutput::new(0, "v6", ""))
            .with_output(RawOutput::new(1, GUZZLE, ""));
        let probe = StaticProbe::with(["php"]);

        let out = run_lint(
            input("", Overrides::default()),
            &AdapterRegistry::builtin(),
            &runner,
            &probe,
        )
        .expect("run");

        let report = out.report;
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.data.adapters_run, 1);
        assert_eq!(report.data.adapters_failed, 0);
        assert_eq!(report.data.findings_total, 1);

        let entry = &report.adapters[0];
        assert_eq!(entry.status, AdapterStatus::Completed);
        assert!(!entry.is_success);
        assert_eq!(entry.error[0].first_line, LineMarker::Id("CVE-2016-5385".to_string()));
        assert_eq!(entry.error[0].fingerprint.len(), 64);
    }

    #[test]
    fn clean_successful_run_passes() {
        let runner = ScriptedRunner::new()
            .with_output(RawOutput::new(0, "v6", ""))
            .with_output(RawOutput::new(0, "{}", ""));
        let out = run_lint(
            input("", Overrides::default()),
            &AdapterRegistry::builtin(),
            &runner,
            &StaticProbe::with(["php"]),
        )
        .expect("run");
        assert_eq!(out.report.verdict, Verdict::Pass);
        assert!(out.report.runtime_error.is_none());
    }

    #[test]
    fn setup_failure_is_recorded_and_lint_is_skipped() {
        let runner = ScriptedRunner::new();
        let out = run_lint(
            input("", Overrides::default()),
            &AdapterRegistry::builtin(),
            &runner,
            &StaticProbe::empty(),
        )
        .expect("continue policy records failure");

        let entry = &out.report.adapters[0];
        assert_eq!(entry.status, AdapterStatus::SetupFailed);
        assert_eq!(
            entry.failure.as_deref(),
            Some("security-checker: php is not installed")
        );
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.adapters_failed, 1);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn abort_policy_turns_failure_into_error() {
        let runner = ScriptedRunner::new()
            .with_output(RawOutput::new(0, "v6", ""))
            .with_output(RawOutput::new(1, "PHP Fatal error", ""));
        let err = run_lint(
            input("on_adapter_error = \"abort\"\n", Overrides::default()),
            &AdapterRegistry::builtin(),
            &runner,
            &StaticProbe::with(["php"]),
        )
        .expect_err("abort");

        let text = format!("{err:#}");
        assert!(text.starts_with("adapter security-checker failed: "));
        assert!(text.contains("PHP Fatal error"));
    }

    #[test]
    fn parse_failure_keeps_payload_and_fix_warning() {
        let runner = ScriptedRunner::new()
            .with_output(RawOutput::new(0, "v6", ""))
            .with_output(RawOutput::new(255, "not json", ""));
        let overrides = Overrides {
            fix: true,
            ..Overrides::default()
        };
        let out = run_lint(
            input("", overrides),
            &AdapterRegistry::builtin(),
            &runner,
            &StaticProbe::with(["php"]),
        )
        .expect("run");

        let entry = &out.report.adapters[0];
        assert_eq!(entry.status, AdapterStatus::ParseFailed);
        assert!(entry.failure.as_deref().is_some_and(|f| f.contains("not json")));
        assert_eq!(entry.warnings.len(), 1);
        assert!(entry.warnings[0].contains("does not support auto-fixing"));
    }

    #[test]
    fn bad_config_is_a_runtime_error() {
        let err = run_lint(
            input("[adapters.eslint]\n", Overrides::default()),
            &AdapterRegistry::builtin(),
            &ScriptedRunner::new(),
            &StaticProbe::empty(),
        )
        .expect_err("unknown adapter");
        assert!(format!("{err:#}").contains("unknown adapter: eslint"));
    }

    #[test]
    fn error_chain_walks_sources() {
        let err = AdapterError::ToolNotInstalled {
            adapter: lintbridge_adapters::SecurityChecker::IDENTITY,
            source: lintbridge_exec::ExecError::NonZeroExit {
                command: "security-checker --version".to_string(),
                status: 127,
                stderr: "not found".to_string(),
            },
        };
        assert_eq!(
            error_chain(&err),
            "security-checker is not installed: `security-checker --version` exited with status 127: not found"
        );
    }
}
