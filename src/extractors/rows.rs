// src/extractors/rows.rs

// --- Imports ---
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::normalize::{last_numeric_token, parse_date};

// --- Regex Patterns (Lazy Static) ---

// ISO date at the start of the line, optional clock time dropped.
static ISO_ANCHORED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})(?:\s+[0-9]{1,2}:[0-9]{2}:[0-9]{2})?\b(.*)$")
        .expect("Failed to compile ISO_ANCHORED_RE")
});

// "11 Sep" or "11 Sep to 15 Sep" at the start of the line. No year.
static PHRASE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    let month = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
    let day_month = format!(r"[0-9]{{1,2}}\s+{}", month);
    Regex::new(&format!(r"(?i)^({dm}(?:\s+to\s+{dm})?)(?:\s+(.*))?$", dm = day_month))
        .expect("Failed to compile PHRASE_DATE_RE")
});

static EMBEDDED_ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("Failed to compile EMBEDDED_ISO_RE")
});

// --- Data Structures ---

/// One line-level extraction strategy. Rules are tried in `RowRule::CASCADE` order
/// and the first one that matches a line owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRule {
    IsoAnchored,
    PhraseDate,
    EmbeddedIso,
    Fallback,
}

impl RowRule {
    pub const CASCADE: [RowRule; 4] = [
        RowRule::IsoAnchored,
        RowRule::PhraseDate,
        RowRule::EmbeddedIso,
        RowRule::Fallback,
    ];

    /// `None` means the rule doesn't claim the line. For `Fallback` that also
    /// covers lines with no numeric token, which are skipped.
    pub fn apply(self, line: &str, label_length: usize) -> Option<ExtractedRecord> {
        match self {
            RowRule::IsoAnchored => {
                let caps = ISO_ANCHORED_RE.captures(line)?;
                let date_text = caps[1].to_string();
                let rest = caps[2].trim().to_string();
                Some(ExtractedRecord {
                    date: parse_date(&date_text),
                    metric: last_numeric_token(&rest),
                    date_text,
                    rest,
                    rule: self,
                })
            }
            RowRule::PhraseDate => {
                let caps = PHRASE_DATE_RE.captures(line)?;
                let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default().to_string();
                Some(ExtractedRecord {
                    date_text: caps[1].to_string(),
                    date: None,
                    metric: last_numeric_token(&rest),
                    rest,
                    rule: self,
                })
            }
            RowRule::EmbeddedIso => {
                let date_text = EMBEDDED_ISO_RE.find(line)?.as_str().to_string();
                let rest = line.replace(&date_text, "").trim().to_string();
                Some(ExtractedRecord {
                    date: parse_date(&date_text),
                    metric: last_numeric_token(&rest),
                    date_text,
                    rest,
                    rule: self,
                })
            }
            RowRule::Fallback => {
                let metric = last_numeric_token(line)?;
                Some(ExtractedRecord {
                    date_text: truncate_label(line, label_length),
                    date: None,
                    rest: line.to_string(),
                    metric: Some(metric),
                    rule: self,
                })
            }
        }
    }
}

/// Result of parsing one line. `date` and `metric` are `None` when unparseable,
/// which is distinct from a zero metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    /// Raw date text, a yearless phrase, or a display label for undated lines.
    pub date_text: String,
    pub date: Option<NaiveDate>,
    pub rest: String,
    pub metric: Option<f64>,
    pub rule: RowRule,
}

impl ExtractedRecord {
    /// Dated and carrying a metric, i.e. usable on a shared date axis.
    pub fn dated_metric(&self) -> Option<(NaiveDate, f64)> {
        Some((self.date?, self.metric?))
    }
}

// --- Extraction ---

/// Parses every non-empty line of a section, at most one record per line.
pub fn extract_rows(section: &str, label_length: usize) -> Vec<ExtractedRecord> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_line(line, label_length))
        .collect()
}

/// Runs the rule cascade on one trimmed line.
pub fn parse_line(line: &str, label_length: usize) -> Option<ExtractedRecord> {
    let record = RowRule::CASCADE
        .iter()
        .find_map(|rule| rule.apply(line, label_length));
    match &record {
        Some(r) => tracing::trace!("{:?} matched line '{}' (metric {:?})", r.rule, line, r.metric),
        None => tracing::trace!("No rule matched line '{}'", line),
    }
    record
}

/// First `max_chars` characters of the line, with "..." appended if anything was cut.
fn truncate_label(line: &str, max_chars: usize) -> String {
    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}
