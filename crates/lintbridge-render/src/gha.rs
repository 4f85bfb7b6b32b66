use crate::{RenderableMarker, RenderableReport, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path}[,line={n},endLine={m}][,title={id}]::[{adapter}] {message}`
///
/// Numeric markers become `line`/`endLine`; identifier markers (e.g. CVE ids) become `title`.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Notice => "notice",
        };

        let mut props = vec![format!("file={}", escape_property(&f.path))];
        match (&f.first_line, &f.last_line) {
            (RenderableMarker::Line(start), RenderableMarker::Line(end)) => {
                props.push(format!("line={start}"));
                props.push(format!("endLine={end}"));
            }
            (RenderableMarker::Line(start), RenderableMarker::Id(_)) => {
                props.push(format!("line={start}"));
            }
            (RenderableMarker::Id(id), _) if !id.is_empty() => {
                props.push(format!("title={}", escape_property(id)));
            }
            (RenderableMarker::Id(_), _) => {}
        }

        let message = escape_data(&format!("[{}] {}", f.adapter, f.message));
        out.push(format!("::{} {}::{}", level, props.join(","), message));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
