//! End-to-end CLI runs against fake `php` and `security-checker` scripts on `PATH`.
//!
//! Each test builds a throwaway project directory plus a `bin/` directory of shell scripts, then
//! runs the real binary with `PATH` pointing at those scripts. Exit codes: 0 pass, 2 fail,
//! 1 runtime error.

#![cfg(unix)]

use assert_cmd::Command;
use lintbridge_test_util::normalize_nondeterministic;
use predicates::prelude::*;
use serde_json::Value;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VULNERABLE: &str = include_str!("../../../tests/fixtures/security_checker/vulnerable.json");
const CLEAN: &str = include_str!("../../../tests/fixtures/security_checker/clean.json");

#[allow(deprecated)]
fn lintbridge_cmd() -> Command {
    Command::cargo_bin("lintbridge").expect("lintbridge binary not found")
}

struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    /// A project dir and a `bin/` dir whose `security-checker` prints `audit` and exits `status`.
    fn new(audit: &str, status: i32, with_php: bool) -> Self {
        let tmp = TempDir::new().expect("temp dir");
        let bin = tmp.path().join("bin");
        std::fs::create_dir_all(&bin).expect("bin dir");
        std::fs::create_dir_all(tmp.path().join("project")).expect("project dir");

        let audit_path = tmp.path().join("audit.json");
        std::fs::write(&audit_path, audit).expect("write audit");

        write_script(
            &bin.join("security-checker"),
            &format!(
                "#!/bin/sh\n\
                 if [ \"$1\" = \"--version\" ]; then echo \"Security Checker v6.0.3\"; exit 0; fi\n\
                 echo \"$@\" > \"{args}\"\n\
                 cat \"{audit}\"\n\
                 exit {status}\n",
                args = tmp.path().join("args.txt").display(),
                audit = audit_path.display(),
            ),
        );
        if with_php {
            write_script(&bin.join("php"), "#!/bin/sh\nexit 0\n");
        }

        Self { tmp }
    }

    fn project(&self) -> PathBuf {
        self.tmp.path().join("project")
    }

    fn report_path(&self) -> PathBuf {
        self.tmp.path().join("out").join("report.json")
    }

    fn path_env(&self) -> String {
        let bin = self.tmp.path().join("bin");
        match std::env::var("PATH") {
            Ok(existing) => format!("{}:{}", bin.display(), existing),
            Err(_) => bin.display().to_string(),
        }
    }

    fn run(&self, extra: &[&str]) -> assert_cmd::assert::Assert {
        lintbridge_cmd()
            .env("PATH", self.path_env())
            .env_remove("LINTBRIDGE_LOG")
            .arg("--root")
            .arg(self.project())
            .arg("run")
            .arg("--report-out")
            .arg(self.report_path())
            .args(extra)
            .assert()
    }

    fn report(&self) -> Value {
        let text = std::fs::read_to_string(self.report_path()).expect("read report");
        normalize_nondeterministic(serde_json::from_str(&text).expect("report json"))
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write script");
    let mut perms = std::fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("chmod");
}

#[test]
fn vulnerable_dependencies_fail_with_exit_code_2() {
    let sandbox = Sandbox::new(VULNERABLE, 1, true);
    sandbox.run(&[]).code(2);

    let report = sandbox.report();
    assert_eq!(report["schema"], "lintbridge.report.v1");
    assert_eq!(report["verdict"], "fail");
    assert_eq!(report["started_at"], "__TIMESTAMP__");
    assert_eq!(report["data"]["findings_total"], 3);

    let adapter = &report["adapters"][0];
    assert_eq!(adapter["adapter"], "security-checker");
    assert_eq!(adapter["status"], "completed");
    assert_eq!(adapter["is_success"], false);
    assert_eq!(adapter["error"][2]["path"], "guzzlehttp/guzzle version: 6.2.0 ");
    assert_eq!(adapter["error"][2]["first_line"], "CVE-2016-5385");
    assert_eq!(
        adapter["error"][2]["message"],
        "HTTP Proxy header vulnerability (https://github.com/guzzle/guzzle/releases/tag/6.2.1)"
    );
    assert_eq!(adapter["warning"], Value::Array(Vec::new()));
}

#[test]
fn rendered_views_come_from_the_written_report() {
    let sandbox = Sandbox::new(VULNERABLE, 1, true);
    sandbox.run(&[]).code(2);

    lintbridge_cmd()
        .arg("md")
        .arg("--report")
        .arg(sandbox.report_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- Verdict: **FAIL**"))
        .stdout(predicate::str::contains("## security-checker"));

    let output = lintbridge_cmd()
        .arg("annotations")
        .arg("--report")
        .arg(sandbox.report_path())
        .args(["--max", "2"])
        .output()
        .expect("annotations");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("::error file=symfony/http-kernel version%3A v4.2.6 ,title=CVE-2019-10909::"));
}

#[test]
fn clean_audit_passes_and_fix_is_ignored_with_a_warning() {
    let sandbox = Sandbox::new(CLEAN, 0, true);
    sandbox
        .run(&["--fix", "--args", "--end-point=http://mirror"])
        .success();

    let report = sandbox.report();
    assert_eq!(report["verdict"], "pass");
    let warnings = report["adapters"][0]["warnings"].as_array().expect("warnings");
    assert_eq!(warnings.len(), 1);
    assert!(
        warnings[0]
            .as_str()
            .is_some_and(|w| w.contains("does not support auto-fixing"))
    );

    let args = std::fs::read_to_string(sandbox.tmp.path().join("args.txt")).expect("args");
    assert_eq!(args.trim(), "security:check --format=json --end-point=http://mirror");
}

#[test]
fn missing_php_is_recorded_as_setup_failure() {
    let sandbox = Sandbox::new(CLEAN, 0, false);
    lintbridge_cmd()
        .env("PATH", sandbox.tmp.path().join("bin"))
        .arg("--root")
        .arg(sandbox.project())
        .arg("run")
        .arg("--report-out")
        .arg(sandbox.report_path())
        .assert()
        .code(2);

    let report = sandbox.report();
    let adapter = &report["adapters"][0];
    assert_eq!(adapter["status"], "setup_failed");
    assert_eq!(adapter["failure"], "security-checker: php is not installed");
    assert_eq!(report["data"]["adapters_failed"], 1);
}

#[test]
fn abort_policy_turns_adapter_failure_into_runtime_error() {
    let sandbox = Sandbox::new("PHP Fatal error: out of memory", 255, true);
    sandbox
        .run(&["--on-adapter-error", "abort"])
        .code(1)
        .stderr(predicate::str::contains("lintbridge error: adapter security-checker failed"));

    let report = sandbox.report();
    assert_eq!(report["verdict"], "fail");
    assert!(
        report["runtime_error"]
            .as_str()
            .is_some_and(|e| e.contains("error parsing output"))
    );
}

#[test]
fn unknown_adapter_is_a_runtime_error() {
    let sandbox = Sandbox::new(CLEAN, 0, true);
    sandbox
        .run(&["--adapter", "eslint"])
        .code(1)
        .stderr(predicate::str::contains("unknown adapter: eslint"));

    let report = sandbox.report();
    assert_eq!(report["adapters"], Value::Array(Vec::new()));
}

#[test]
fn config_prefix_wraps_the_tool_command() {
    let sandbox = Sandbox::new(CLEAN, 0, true);
    std::fs::create_dir_all(sandbox.project().join("backend")).expect("backend dir");
    std::fs::write(
        sandbox.project().join("lintbridge.toml"),
        "schema = \"lintbridge.config.v1\"\n\n[adapters.security-checker]\ndir = \"backend\"\nprefix = \"php\"\n",
    )
    .expect("write config");

    sandbox.run(&[]).code(2);

    // `php` is a no-op script here, so the checker never ran and produced no JSON.
    assert!(!sandbox.tmp.path().join("args.txt").exists());
    let report = sandbox.report();
    assert_eq!(report["adapters"][0]["status"], "parse_failed");
}
