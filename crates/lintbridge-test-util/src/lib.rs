//! Shared test utilities for the lintbridge workspace.
//!
//! Adapter, app, and CLI tests all need the same fakes for the process and probe collaborators,
//! so they live in one crate instead of a `#[cfg(test)]` module per crate.

use camino::{Utf8Path, Utf8PathBuf};
use lintbridge_exec::{CommandRunner, ExecError, ExitMode, PrerequisiteProbe};
use lintbridge_types::RawOutput;
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

/// One call observed by [`ScriptedRunner`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub dir: Utf8PathBuf,
    pub mode: ExitMode,
}

enum Scripted {
    Output(RawOutput),
    Error(ExecError),
}

/// A [`CommandRunner`] that replays queued responses in order and records every call.
///
/// Queued outputs honour [`ExitMode::Raise`] the way a real runner would: a non-zero status
/// becomes [`ExecError::NonZeroExit`]. An exhausted queue answers with a spawn error.
#[derive(Default)]
pub struct ScriptedRunner {
    queue: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(self, output: RawOutput) -> Self {
        self.push_output(output);
        self
    }

    pub fn with_error(self, error: ExecError) -> Self {
        self.push_error(error);
        self
    }

    pub fn push_output(&self, output: RawOutput) {
        self.queue
            .lock()
            .expect("runner queue poisoned")
            .push_back(Scripted::Output(output));
    }

    pub fn push_error(&self, error: ExecError) {
        self.queue
            .lock()
            .expect("runner queue poisoned")
            .push_back(Scripted::Error(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("runner calls poisoned").clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str, dir: &Utf8Path, mode: ExitMode) -> Result<RawOutput, ExecError> {
        self.calls
            .lock()
            .expect("runner calls poisoned")
            .push(RecordedCall {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                mode,
            });

        let next = self.queue.lock().expect("runner queue poisoned").pop_front();
        match next {
            Some(Scripted::Output(out)) if mode == ExitMode::Raise && out.status != 0 => {
                Err(ExecError::NonZeroExit {
                    command: command.to_string(),
                    status: out.status,
                    stderr: out.stderr,
                })
            }
            Some(Scripted::Output(out)) => Ok(out),
            Some(Scripted::Error(err)) => Err(err),
            None => Err(spawn_error(command)),
        }
    }
}

/// A spawn failure shaped like the one a missing shell or binary produces.
pub fn spawn_error(command: &str) -> ExecError {
    ExecError::Spawn {
        command: command.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

/// A [`PrerequisiteProbe`] answering from a fixed set of binary names.
#[derive(Default)]
pub struct StaticProbe {
    present: BTreeSet<String>,
    probed: Mutex<Vec<String>>,
}

impl StaticProbe {
    pub fn with<I, S>(binaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            present: binaries.into_iter().map(Into::into).collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().expect("probe log poisoned").clone()
    }
}

impl PrerequisiteProbe for StaticProbe {
    fn exists(&self, binary: &str) -> bool {
        self.probed
            .lock()
            .expect("probe log poisoned")
            .push(binary.to_string());
        self.present.contains(binary)
    }
}

/// Normalize non-deterministic report fields for golden-file comparison.
///
/// - `tool.version` becomes `"__VERSION__"` when the root object is a report envelope
///   (has `schema`, `tool`, `verdict`, and `adapters`).
/// - `started_at` / `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("verdict")
            && obj.contains_key("adapters");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scripted_runner_replays_in_order_and_records() {
        let runner = ScriptedRunner::new()
            .with_output(RawOutput::new(0, "first", ""))
            .with_output(RawOutput::new(1, "second", ""));
        let dir = Utf8Path::new("/work");

        let a = runner.run("a", dir, ExitMode::Capture).expect("first");
        let b = runner.run("b", dir, ExitMode::Capture).expect("second");
        let c = runner.run("c", dir, ExitMode::Capture);

        assert_eq!(a.stdout, "first");
        assert_eq!(b.status, 1);
        assert!(matches!(c, Err(ExecError::Spawn { .. })));
        assert_eq!(runner.commands(), vec!["a", "b", "c"]);
    }

    #[test]
    fn scripted_runner_raises_on_nonzero_in_raise_mode() {
        let runner = ScriptedRunner::new().with_output(RawOutput::new(127, "", "missing"));
        let err = runner
            .run("tool --version", Utf8Path::new("."), ExitMode::Raise)
            .expect_err("raise mode");
        assert!(matches!(err, ExecError::NonZeroExit { status: 127, .. }));
    }

    #[test]
    fn static_probe_answers_from_set() {
        let probe = StaticProbe::with(["php"]);
        assert!(probe.exists("php"));
        assert!(!probe.exists("node"));
        assert_eq!(probe.probed(), vec!["php", "node"]);
    }

    #[test]
    fn normalizes_envelope_version_and_nested_timestamps() {
        let report = json!({
            "schema": "lintbridge.report.v1",
            "tool": {"name": "lintbridge", "version": "1.2.3"},
            "started_at": "2024-01-01T00:00:00Z",
            "finished_at": "2024-01-01T00:00:01Z",
            "verdict": "pass",
            "adapters": [{"started_at": "x"}]
        });
        let normalized = normalize_nondeterministic(report);
        assert_eq!(normalized["tool"]["version"], "__VERSION__");
        assert_eq!(normalized["started_at"], "__TIMESTAMP__");
        assert_eq!(normalized["finished_at"], "__TIMESTAMP__");
        assert_eq!(normalized["adapters"][0]["started_at"], "__TIMESTAMP__");
    }

    #[test]
    fn leaves_non_envelope_version_alone() {
        let value = json!({"tool": {"version": "1.0"}});
        let normalized = normalize_nondeterministic(value);
        assert_eq!(normalized["tool"]["version"], "1.0");
    }
}
