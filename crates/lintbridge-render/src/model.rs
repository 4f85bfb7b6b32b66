#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Error,
    Warning,
    Notice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderableMarker {
    Line(u32),
    Id(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub adapter: String,
    pub path: String,
    pub first_line: RenderableMarker,
    pub last_line: RenderableMarker,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableAdapter {
    pub name: String,
    /// Snake-case adapter status (`completed`, `setup_failed`, ...).
    pub status: String,
    pub is_success: bool,
    pub errors: u32,
    pub warnings: u32,
    pub notices: u32,
    pub notes: Vec<String>,
    pub failure: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub adapters_run: u32,
    pub adapters_failed: u32,
    pub findings_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub adapters: Vec<RenderableAdapter>,
    /// Findings across all adapters, in report order.
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}
