use crate::AdapterError;
use camino::Utf8Path;
use lintbridge_exec::{CommandRunner, PrerequisiteProbe};
use lintbridge_types::{InvocationRequest, LintResult, RawOutput, ToolIdentity};
use std::fmt;

/// Non-fatal conditions an adapter reports while still running its tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdapterWarning {
    /// The host asked for auto-fix but the tool cannot fix anything.
    AutoFixUnsupported {
        adapter: ToolIdentity,
        extensions: Vec<String>,
    },
}

impl fmt::Display for AdapterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterWarning::AutoFixUnsupported {
                adapter,
                extensions,
            } => write!(
                f,
                "{adapter} does not support auto-fixing; ignoring fix request for extensions [{}]",
                extensions.join(", ")
            ),
        }
    }
}

/// What `lint` hands back: the untouched tool output plus any warnings raised on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintRun {
    pub output: RawOutput,
    pub warnings: Vec<AdapterWarning>,
}

/// One external tool, wrapped.
///
/// Hosts call [`verify_setup`](ToolAdapter::verify_setup) once, then
/// [`lint`](ToolAdapter::lint) and [`parse_output`](ToolAdapter::parse_output) per pass.
/// `verify_setup` and `lint` block on a subprocess and carry no timeout of their own.
pub trait ToolAdapter: Send + Sync {
    fn identity(&self) -> ToolIdentity;

    /// Binary that must be resolvable before the tool itself can run.
    fn prerequisite(&self) -> &'static str;

    /// Confirm the prerequisite and the tool are present. Installs nothing.
    ///
    /// A missing prerequisite short-circuits: the runner is not called.
    fn verify_setup(
        &self,
        probe: &dyn PrerequisiteProbe,
        runner: &dyn CommandRunner,
        dir: &Utf8Path,
        prefix: Option<&str>,
    ) -> Result<(), AdapterError>;

    /// The exact shell command `lint` would run for `request`.
    fn command_line(&self, request: &InvocationRequest) -> String;

    /// Run the tool, capturing any exit status as data.
    fn lint(
        &self,
        runner: &dyn CommandRunner,
        request: &InvocationRequest,
    ) -> Result<LintRun, AdapterError>;

    /// Translate raw tool output into a normalized result. Pure.
    fn parse_output(&self, dir: &Utf8Path, output: &RawOutput) -> Result<LintResult, AdapterError>;
}

/// Join command fragments with single spaces, skipping blank ones.
pub fn join_command<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
