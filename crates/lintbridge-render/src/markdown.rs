use crate::{RenderableMarker, RenderableReport, RenderableSeverity, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Lintbridge report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Adapters: {} run / {} failed\n- Findings: {}\n",
        verdict, report.data.adapters_run, report.data.adapters_failed, report.data.findings_total
    ));

    if report.adapters.is_empty() {
        out.push_str("\nNo adapters ran.\n");
        return out;
    }

    for adapter in &report.adapters {
        out.push_str(&format!("\n## {}\n\n", adapter.name));
        out.push_str(&format!(
            "- Status: {} (tool exit: {})\n- Findings: {} error / {} warning / {} notice\n",
            adapter.status,
            if adapter.is_success { "success" } else { "failure" },
            adapter.errors,
            adapter.warnings,
            adapter.notices
        ));
        for note in &adapter.notes {
            out.push_str(&format!("- Note: {}\n", note));
        }

        if let Some(failure) = &adapter.failure {
            out.push_str("\n```text\n");
            out.push_str(failure.trim_end());
            out.push_str("\n```\n");
        }

        let findings: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.adapter == adapter.name)
            .collect();
        if findings.is_empty() {
            continue;
        }

        out.push('\n');
        for f in findings {
            let sev = match f.severity {
                RenderableSeverity::Error => "ERROR",
                RenderableSeverity::Warning => "WARN",
                RenderableSeverity::Notice => "NOTICE",
            };
            out.push_str(&format!(
                "- [{}] `{}` ({}): {}\n",
                sev,
                f.path.trim_end(),
                marker_range(&f.first_line, &f.last_line),
                f.message
            ));
        }
    }

    out
}

fn marker_range(first: &RenderableMarker, last: &RenderableMarker) -> String {
    let show = |m: &RenderableMarker| match m {
        RenderableMarker::Line(n) => format!("line {n}"),
        RenderableMarker::Id(id) => id.clone(),
    };
    if first == last {
        show(first)
    } else {
        format!("{}..{}", show(first), show(last))
    }
}
