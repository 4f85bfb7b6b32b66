//! Collaborators adapters consume but do not own: running a command and probing for binaries.
//!
//! Adapters only see the [`CommandRunner`] and [`PrerequisiteProbe`] traits. [`ShellRunner`] and
//! [`PathProbe`] are the production implementations; tests substitute scripted ones.

#![forbid(unsafe_code)]

mod probe;
mod runner;

pub use probe::{PathProbe, PrerequisiteProbe};
pub use runner::{CommandRunner, ExecError, ExitMode, ShellRunner};
