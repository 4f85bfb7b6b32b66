use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three buckets a normalized result partitions findings into.
///
/// Names follow GitHub workflow command levels so they map 1:1 onto annotations.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Notice];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
        }
    }
}

/// Start/end position of a finding.
///
/// Tools without a line concept (dependency audits) put an identifier such as a CVE id here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LineMarker {
    Line(u32),
    Id(String),
}

impl LineMarker {
    pub fn line(&self) -> Option<u32> {
        match self {
            LineMarker::Line(n) => Some(*n),
            LineMarker::Id(_) => None,
        }
    }
}

impl fmt::Display for LineMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineMarker::Line(n) => write!(f, "{n}"),
            LineMarker::Id(id) => f.write_str(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub path: String,
    pub first_line: LineMarker,
    pub last_line: LineMarker,
    pub message: String,
}

/// Normalized outcome of one adapter invocation.
///
/// `is_success` reflects the tool's exit status only; a tool may report findings and still succeed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintResult {
    pub is_success: bool,
    #[serde(default)]
    pub error: Vec<Finding>,
    #[serde(default)]
    pub warning: Vec<Finding>,
    #[serde(default)]
    pub notice: Vec<Finding>,
}

impl LintResult {
    /// Empty result with all three buckets present.
    pub fn new(is_success: bool) -> Self {
        Self {
            is_success,
            error: Vec::new(),
            warning: Vec::new(),
            notice: Vec::new(),
        }
    }

    pub fn push(&mut self, severity: Severity, finding: Finding) {
        match severity {
            Severity::Error => self.error.push(finding),
            Severity::Warning => self.warning.push(finding),
            Severity::Notice => self.notice.push(finding),
        }
    }

    pub fn bucket(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
            Severity::Notice => &self.notice,
        }
    }

    pub fn findings_total(&self) -> usize {
        self.error.len() + self.warning.len() + self.notice.len()
    }

    /// All findings, error bucket first, each bucket in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Severity, &Finding)> {
        Severity::ALL
            .into_iter()
            .flat_map(move |sev| self.bucket(sev).iter().map(move |f| (sev, f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(path: &str) -> Finding {
        Finding {
            path: path.to_string(),
            first_line: LineMarker::Line(1),
            last_line: LineMarker::Line(1),
            message: "m".to_string(),
        }
    }

    #[test]
    fn push_routes_into_matching_bucket() {
        let mut result = LintResult::new(true);
        result.push(Severity::Notice, finding("c"));
        result.push(Severity::Error, finding("a"));
        result.push(Severity::Warning, finding("b"));
        result.push(Severity::Error, finding("d"));

        assert_eq!(result.bucket(Severity::Error).len(), 2);
        assert_eq!(result.bucket(Severity::Warning).len(), 1);
        assert_eq!(result.bucket(Severity::Notice).len(), 1);
        assert_eq!(result.findings_total(), 4);

        let order: Vec<&str> = result.iter().map(|(_, f)| f.path.as_str()).collect();
        assert_eq!(order, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn line_marker_is_untagged_on_the_wire() {
        let line = serde_json::to_value(LineMarker::Line(7)).expect("serialize");
        let id = serde_json::to_value(LineMarker::Id("CVE-1".to_string())).expect("serialize");
        assert_eq!(line, serde_json::json!(7));
        assert_eq!(id, serde_json::json!("CVE-1"));

        let back: LineMarker = serde_json::from_value(serde_json::json!("CVE-1")).expect("parse");
        assert_eq!(back, LineMarker::Id("CVE-1".to_string()));
        assert_eq!(back.line(), None);
    }
}
