use camino::{Utf8Path, Utf8PathBuf};
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Stable adapter name used for registry keys and log/error prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolIdentity(&'static str);

impl ToolIdentity {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ToolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// Ordering and hashing are derived from the inner `&str`, so lookups by `&str` stay consistent.
impl Borrow<str> for ToolIdentity {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl Serialize for ToolIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Everything an adapter needs to run its tool once.
///
/// Built by the host per invocation; adapters only read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Directory the tool runs in.
    pub dir: Utf8PathBuf,
    /// File extensions the host considers relevant for this tool.
    pub extensions: Vec<String>,
    /// Extra arguments appended verbatim to the command line.
    pub args: String,
    /// Whether the host asked for auto-fix.
    pub fix: bool,
    /// Wrapper placed in front of the tool (e.g. `php`, `docker run ...`).
    pub prefix: Option<String>,
}

impl InvocationRequest {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: Vec::new(),
            args: String::new(),
            fix: false,
            prefix: None,
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Captured result of one subprocess.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit status; `-1` when the process was terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    pub fn new(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prefix_is_treated_as_absent() {
        let mut req = InvocationRequest::new(".");
        req.prefix = Some("  ".to_string());
        assert_eq!(req.prefix(), None);

        req.prefix = Some("php".to_string());
        assert_eq!(req.prefix(), Some("php"));
    }

    #[test]
    fn identity_serializes_as_plain_string() {
        let id = ToolIdentity::new("security-checker");
        assert_eq!(
            serde_json::to_string(&id).expect("serialize"),
            "\"security-checker\""
        );
        assert_eq!(id.to_string(), "security-checker");
    }
}
