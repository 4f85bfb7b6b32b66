//! Adapter for `security-checker`, which audits `composer.lock` against a PHP advisory database.
//!
//! Wire format (`security:check --format=json`):
//!
//! ```json
//! {
//!   "guzzlehttp/guzzle": {
//!     "version": "6.2.0",
//!     "advisories": [
//!       { "cve": "CVE-2016-5385", "link": "https://...", "title": "..." }
//!     ]
//!   }
//! }
//! ```

use crate::adapter::{join_command, AdapterWarning, LintRun, ToolAdapter};
use crate::AdapterError;
use camino::Utf8Path;
use indexmap::IndexMap;
use lintbridge_exec::{CommandRunner, ExitMode, PrerequisiteProbe};
use lintbridge_types::{
    ids, Finding, InvocationRequest, LineMarker, LintResult, RawOutput, Severity, ToolIdentity,
};
use serde::Deserialize;

const IDENTITY: ToolIdentity = ToolIdentity::new(ids::ADAPTER_SECURITY_CHECKER);
const PREREQUISITE: &str = "php";
const BINARY: &str = "security-checker";
const CHECK_ARGS: &str = "security:check --format=json";
const SUCCESS_STATUS: i32 = 0;

#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityChecker;

/// Keyed by dependency name; `IndexMap` keeps document order.
type AuditReport = IndexMap<String, DependencyAudit>;

#[derive(Debug, Deserialize)]
struct DependencyAudit {
    version: String,
    advisories: Vec<Advisory>,
}

#[derive(Debug, Deserialize)]
struct Advisory {
    cve: String,
    link: String,
    title: String,
}

impl SecurityChecker {
    pub const IDENTITY: ToolIdentity = IDENTITY;
}

impl ToolAdapter for SecurityChecker {
    fn identity(&self) -> ToolIdentity {
        IDENTITY
    }

    fn prerequisite(&self) -> &'static str {
        PREREQUISITE
    }

    fn verify_setup(
        &self,
        probe: &dyn PrerequisiteProbe,
        runner: &dyn CommandRunner,
        dir: &Utf8Path,
        prefix: Option<&str>,
    ) -> Result<(), AdapterError> {
        if !probe.exists(PREREQUISITE) {
            return Err(AdapterError::PrerequisiteMissing {
                adapter: IDENTITY,
                prerequisite: PREREQUISITE,
            });
        }

        let command = join_command([prefix.unwrap_or(""), BINARY, "--version"]);
        runner
            .run(&command, dir, ExitMode::Raise)
            .map_err(|source| AdapterError::ToolNotInstalled {
                adapter: IDENTITY,
                source,
            })?;

        Ok(())
    }

    fn command_line(&self, request: &InvocationRequest) -> String {
        join_command([
            request.prefix().unwrap_or(""),
            BINARY,
            CHECK_ARGS,
            request.args.as_str(),
        ])
    }

    fn lint(
        &self,
        runner: &dyn CommandRunner,
        request: &InvocationRequest,
    ) -> Result<LintRun, AdapterError> {
        let mut warnings = Vec::new();
        if request.fix {
            let warning = AdapterWarning::AutoFixUnsupported {
                adapter: IDENTITY,
                extensions: request.extensions.clone(),
            };
            tracing::warn!(adapter = %IDENTITY, "{warning}");
            warnings.push(warning);
        }

        let command = self.command_line(request);
        tracing::debug!(adapter = %IDENTITY, %command, dir = %request.dir, "linting");

        let output = runner
            .run(&command, request.dir(), ExitMode::Capture)
            .map_err(|source| AdapterError::Execution {
                adapter: IDENTITY,
                command: command.clone(),
                source,
            })?;

        Ok(LintRun { output, warnings })
    }

    fn parse_output(&self, _dir: &Utf8Path, output: &RawOutput) -> Result<LintResult, AdapterError> {
        let mut result = LintResult::new(output.status == SUCCESS_STATUS);

        let report: AuditReport =
            serde_json::from_str(&output.stdout).map_err(|err| AdapterError::OutputParseError {
                adapter: IDENTITY,
                message: err.to_string(),
                stdout: output.stdout.clone(),
            })?;

        for (dependency, audit) in &report {
            for advisory in &audit.advisories {
                result.push(
                    Severity::Error,
                    Finding {
                        // Trailing space is part of the path.
                        path: format!("{dependency} version: {} ", audit.version),
                        first_line: LineMarker::Id(advisory.cve.clone()),
                        last_line: LineMarker::Id(advisory.cve.clone()),
                        message: format!("{} ({})", advisory.title, advisory.link),
                    },
                );
            }
        }

        tracing::debug!(
            adapter = %IDENTITY,
            status = output.status,
            findings = result.findings_total(),
            "parsed output"
        );
        Ok(result)
    }
}
