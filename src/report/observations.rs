// src/report/observations.rs
//! Plain-text observations for the report's summary page.

use crate::aggregate::EntitySummary;

pub const LINES_PER_PAGE: usize = 45;

const RECOMMENDATIONS: &[&str] = &[
    "  - Provide the raw structured data (CSV/Excel) for exact parsing and deeper analysis.",
    "  - Monitor idfa_ua_ratio and idfa_ip_ratio alongside IVT. High idfa_ua_ratio -> spoofing; high idfa_ip_ratio -> proxy/datacenter usage.",
    "  - Add anomaly detection on requests_per_idfa (flag spikes > 2x baseline).",
    "  - For days with high IVT, sample user-agents and IP ranges to identify patterns.",
];

pub fn observation_lines(summaries: &[EntitySummary], threshold: f64) -> Vec<String> {
    let mut lines = vec![
        "Automated Observations & Summary".to_string(),
        "================================".to_string(),
        String::new(),
    ];

    if summaries.is_empty() {
        lines.push("No numeric IVT values were reliably parsed from this document using heuristics.".to_string());
        lines.push("Please provide the raw CSV/Excel for accurate structured analysis.".to_string());
        return lines;
    }

    for s in summaries {
        lines.push(format!("App #{}:", s.index));
        lines.push(format!("  * Parsed rows: {} ({} with IVT)", s.parsed_rows, s.metric_rows));
        lines.push(format!("  * IVT mean: {:.6}", s.mean));
        lines.push(format!("  * IVT median: {:.6}", s.median));
        lines.push(format!("  * IVT min/max: {:.6} / {:.6}", s.min, s.max));
        if s.exceeds_threshold {
            lines.push(format!("  * Note: Some IVT values > {} (possible high invalid-traffic days).", threshold));
        }
        if s.all_zero {
            lines.push("  * Note: All extracted IVT values are zero for parsed rows.".to_string());
        }
        lines.push(String::new());
    }

    lines.push("General recommendations:".to_string());
    lines.extend(RECOMMENDATIONS.iter().map(|r| r.to_string()));
    lines.push(String::new());
    lines.push(
        "Limitations: This is an automated heuristic parse of a document with inconsistent formatting. \
         Use original structured files for higher-confidence analytics."
            .to_string(),
    );
    lines
}

/// Splits lines into pages of at most `per_page` lines.
pub fn paginate(lines: &[String], per_page: usize) -> Vec<Vec<String>> {
    lines.chunks(per_page.max(1)).map(|c| c.to_vec()).collect()
}
