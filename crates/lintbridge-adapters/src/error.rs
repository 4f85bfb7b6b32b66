use lintbridge_exec::ExecError;
use lintbridge_types::ToolIdentity;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The runtime the tool needs (an interpreter, a platform binary) is not on the path.
    #[error("{adapter}: {prerequisite} is not installed")]
    PrerequisiteMissing {
        adapter: ToolIdentity,
        prerequisite: &'static str,
    },

    /// The tool's version check could not be run or failed.
    #[error("{adapter} is not installed")]
    ToolNotInstalled {
        adapter: ToolIdentity,
        #[source]
        source: ExecError,
    },

    /// The lint command could not be started at all.
    #[error("{adapter}: failed to run `{command}`")]
    Execution {
        adapter: ToolIdentity,
        command: String,
        #[source]
        source: ExecError,
    },

    /// The tool's stdout did not match its documented format. `stdout` is kept verbatim.
    #[error("{adapter}: error parsing output: {message}\n{stdout}")]
    OutputParseError {
        adapter: ToolIdentity,
        message: String,
        stdout: String,
    },
}

impl AdapterError {
    pub fn adapter(&self) -> ToolIdentity {
        match self {
            AdapterError::PrerequisiteMissing { adapter, .. }
            | AdapterError::ToolNotInstalled { adapter, .. }
            | AdapterError::Execution { adapter, .. }
            | AdapterError::OutputParseError { adapter, .. } => *adapter,
        }
    }

    /// Setup errors mean `lint` must not run for this adapter.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            AdapterError::PrerequisiteMissing { .. } | AdapterError::ToolNotInstalled { .. }
        )
    }
}
