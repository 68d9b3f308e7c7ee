// HTML pages: templates under web/ with {{name}} placeholders

use crate::audit::AuditReport;

const INDEX_TEMPLATE: &str = include_str!("../../web/index.html");
const RESULTS_TEMPLATE: &str = include_str!("../../web/results.html");

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Values are inserted verbatim; escape them first.
/// One left-to-right pass, so inserted text is never substituted again.
/// Unknown placeholders are kept as-is.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn index_page(columns: &[String]) -> String {
    let options: String = columns
        .iter()
        .map(|c| format!("<option value=\"{0}\">{0}</option>", escape(c)))
        .collect::<Vec<_>>()
        .join("\n                ");

    let (notice, disabled) = if columns.is_empty() {
        (
            "<p class=\"notice\">Dataset not found. Run <code>fairness-audit prepare</code> and restart the server.</p>"
                .to_string(),
            "disabled".to_string(),
        )
    } else {
        (String::new(), String::new())
    };

    fill(
        INDEX_TEMPLATE,
        &[("options", options), ("notice", notice), ("disabled", disabled)],
    )
}

pub fn results_page(report: &AuditReport) -> String {
    let (verdict, verdict_class) = if report.is_fair {
        ("Fair: the ratio meets the threshold", "fair")
    } else {
        ("Potential bias: the ratio is below the threshold", "unfair")
    };

    fill(
        RESULTS_TEMPLATE,
        &[
            ("protected_attribute", escape(&report.protected_attribute)),
            ("accuracy", escape(&report.accuracy)),
            ("test_rows", report.rows.test.to_string()),
            ("total_rows", report.rows.total.to_string()),
            ("privileged_group", escape(&report.privileged_group)),
            ("privileged_rows", report.rows.privileged.to_string()),
            ("privileged_rate", escape(&report.privileged_rate)),
            ("unprivileged_group", escape(&report.unprivileged_group)),
            ("unprivileged_rows", report.rows.unprivileged.to_string()),
            ("unprivileged_rate", escape(&report.unprivileged_rate)),
            ("disparate_impact", escape(&report.disparate_impact)),
            ("verdict", verdict.to_string()),
            ("verdict_class", verdict_class.to_string()),
            ("threshold", report.threshold.to_string()),
            ("audit_id", escape(&report.audit_id)),
            ("generated_at", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{RawMetrics, RowCounts};
    use chrono::Utc;

    fn report(is_fair: bool) -> AuditReport {
        AuditReport {
            audit_id: "a1".to_string(),
            generated_at: Utc::now(),
            attribute_column: "gender".to_string(),
            accuracy: "85.12%".to_string(),
            protected_attribute: "Gender".to_string(),
            privileged_group: "Male".to_string(),
            unprivileged_group: "<Female>".to_string(),
            privileged_rate: "25.00%".to_string(),
            unprivileged_rate: "7.50%".to_string(),
            disparate_impact: "0.30".to_string(),
            is_fair,
            threshold: 0.8,
            metrics: RawMetrics {
                accuracy: 0.8512,
                privileged_rate: 0.25,
                unprivileged_rate: 0.075,
                disparate_impact: 0.3,
            },
            rows: RowCounts {
                total: 100,
                train: 80,
                test: 20,
                privileged: 60,
                unprivileged: 40,
            },
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        assert_eq!(escape("Self-emp-inc"), "Self-emp-inc");
    }

    #[test]
    fn test_fill_does_not_resubstitute_values() {
        let page = fill(
            "{{a}} {{b}}",
            &[("a", "{{b}}".to_string()), ("b", "X".to_string())],
        );
        assert_eq!(page, "{{b}} X");
    }

    #[test]
    fn test_fill_keeps_unknown_and_unterminated_placeholders() {
        assert_eq!(fill("{{x}} and {{a}}", &[("a", "1".to_string())]), "{{x}} and 1");
        assert_eq!(fill("tail {{a", &[("a", "1".to_string())]), "tail {{a");
    }

    #[test]
    fn test_group_named_like_a_placeholder() {
        let mut report = report(false);
        report.privileged_group = "{{verdict}}".to_string();
        let page = results_page(&report);
        assert!(page.contains("<td>{{verdict}}</td><td>privileged</td>"));
    }

    #[test]
    fn test_index_lists_columns() {
        let page = index_page(&["gender".to_string(), "race".to_string()]);
        assert!(page.contains("<option value=\"gender\">gender</option>"));
        assert!(page.contains("<option value=\"race\">race</option>"));
        assert!(!page.contains("Dataset not found"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_index_without_dataset() {
        let page = index_page(&[]);
        assert!(page.contains("Dataset not found"));
        assert!(page.contains("disabled"));
        assert!(!page.contains("<option"));
    }

    #[test]
    fn test_results_page() {
        let page = results_page(&report(false));
        assert!(page.contains("Audit Results: Gender"));
        assert!(page.contains("85.12%"));
        assert!(page.contains("&lt;Female&gt;"));
        assert!(page.contains("0.30"));
        assert!(page.contains("Potential bias"));
        assert!(page.contains("class=\"verdict unfair\""));
        assert!(!page.contains("{{"));

        let page = results_page(&report(true));
        assert!(page.contains("class=\"verdict fair\""));
    }
}
