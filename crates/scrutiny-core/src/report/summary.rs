//! Markdown summary renderer for verification reports.

use crate::report::buckets::{extract_buckets, fast_summary, sections_issues_first};
use crate::report::model::{Report, SectionReport};
use crate::severity::Severity;

/// Escapes table-breaking characters in a cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn render_section(out: &mut String, name: &str, section: &SectionReport, report: &Report) {
    out.push_str(&format!("### {} ({})\n\n", name, section.result));
    out.push_str(&fast_summary(&section.stats));
    out.push_str("\n\n");

    let buckets = extract_buckets(section);
    if buckets.is_empty() {
        out.push_str("_No differences._\n\n");
        return;
    }

    if !buckets.missing_rows.is_empty() {
        out.push_str(&format!("#### Missing on {}\n\n", report.profile_name));
        for row in &buckets.missing_rows {
            out.push_str(&format!("- **{}**: {}\n", row.item, row.detail));
        }
        out.push('\n');
    }

    if !buckets.extra_rows.is_empty() {
        out.push_str(&format!("#### Extra on {}\n\n", report.profile_name));
        for row in &buckets.extra_rows {
            out.push_str(&format!("- **{}**: {}\n", row.item, row.detail));
        }
        out.push('\n');
    }

    if !buckets.boolean_rows.is_empty() {
        out.push_str("#### Support changes\n\n");
        out.push_str(&format!(
            "| Item | {} | {} |\n|---|---|---|\n",
            cell(&report.reference_name),
            cell(&report.profile_name)
        ));
        for row in &buckets.boolean_rows {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&row.item),
                row.reference.as_str(),
                row.test.as_str()
            ));
        }
        out.push('\n');
    }

    if !buckets.value_rows.is_empty() {
        out.push_str("#### Value changes\n\n");
        if buckets.include_field_column {
            out.push_str(&format!(
                "| Item | Field | {} | {} |\n|---|---|---|---|\n",
                cell(&report.reference_name),
                cell(&report.profile_name)
            ));
            for row in &buckets.value_rows {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    cell(&row.item),
                    cell(&row.field),
                    cell(&row.reference),
                    cell(&row.test)
                ));
            }
        } else {
            out.push_str(&format!(
                "| Item | {} | {} |\n|---|---|---|\n",
                cell(&report.reference_name),
                cell(&report.profile_name)
            ));
            for row in &buckets.value_rows {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    cell(&row.item),
                    cell(&row.reference),
                    cell(&row.test)
                ));
            }
        }
        out.push('\n');
    }
}

/// Render a Markdown summary of a [`Report`].
///
/// Sections with issues come first. Informational only; the JSON report is
/// the authoritative output.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();

    match &report.meta.schema_title {
        Some(title) => out.push_str(&format!("## Verification Summary: {}\n\n", title)),
        None => out.push_str("## Verification Summary\n\n"),
    }

    out.push_str(&format!(
        "**Reference**: {}  \n**Profile**: {}  \n**Overall**: {}\n\n",
        report.reference_name, report.profile_name, report.overall
    ));

    let counts = &report.dashboard.overall_state_counts;
    out.push_str("| State | Sections |\n|---|---|\n");
    for severity in Severity::ALL {
        out.push_str(&format!("| {} | {} |\n", severity, counts.get(severity)));
    }
    out.push_str(&format!("| TOTAL | {} |\n\n", counts.total));

    for (name, section) in sections_issues_first(report) {
        render_section(&mut out, name, section, report);
    }

    out
}
