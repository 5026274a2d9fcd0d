//! Rule-based statistics extraction from report text
//!
//! Extraction is best effort: a label that cannot be found leaves its field
//! as `None` and nothing here returns an error.

use chrono::NaiveDate;
use regex::Regex;

use super::models::*;
use super::patterns::*;

/// Extract every known statistic from the plain text of a report.
pub fn parse_report_text(content: &str) -> ReportStatistics {
    let mut stats = ReportStatistics {
        prison: capture_string(&PRISON_NAME, content),
        period: capture_number(&PERIOD, content),
        month: capture_number(&MONTH, content),
        report_date: capture_date(content),
        security: detect_security_flags(content),
        ..ReportStatistics::default()
    };

    apply_count_rules(&DISCIPLINE_RULES, content, &mut stats.discipline);
    apply_count_rules(&PRISONER_RULES, content, &mut stats.prisoners);

    stats.preventive_measures = extract_preventive_measures(content);

    for (section, regex) in SECTION_RULES.iter() {
        if let Some(body) = capture_string(regex, content) {
            *stats.sections.slot_mut(*section) = Some(body);
        }
    }

    tracing::debug!(
        prison = stats.prison.as_deref().unwrap_or("-"),
        total = ?stats.prisoners.total,
        cases = stats.preventive_measures.len(),
        "parsed report text"
    );

    stats
}

/// Closed-world incident detection: an incident is assumed unless its
/// canned negative sentence appears verbatim.
pub fn detect_security_flags(content: &str) -> SecurityFlags {
    SecurityFlags {
        has_escape: !content.contains(NO_ESCAPE),
        has_major_case: !content.contains(NO_MAJOR_CASE),
        has_safety_accident: !content.contains(NO_SAFETY_ACCIDENT),
        has_health_event: !content.contains(NO_HEALTH_EVENT),
        has_internal_case: !content.contains(NO_INTERNAL_CASE),
        has_premeditated_case: !content.contains(NO_PREMEDITATED_CASE),
    }
}

/// Collect every case narrative that matches the full pattern.
pub fn extract_preventive_measures(content: &str) -> Vec<PreventiveMeasure> {
    PREVENTIVE_MEASURE
        .captures_iter(content)
        .map(|caps| {
            let field = |index: usize| {
                caps.get(index)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            };
            PreventiveMeasure {
                area: field(1),
                name: field(2),
                gender: field(3),
                age: caps.get(4).and_then(|m| m.as_str().parse().ok()),
                origin: field(5),
                crime: field(6),
                original_sentence: field(7),
                remaining_sentence: field(8),
                measure: field(9),
            }
        })
        .collect()
}

/// Parse a captured digit run, ignoring embedded whitespace and separators.
pub(crate) fn parse_spaced_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn apply_count_rules<T>(rules: &[CountRule<T>], content: &str, target: &mut T) {
    for rule in rules {
        if let Some(value) = capture_number(&rule.regex, content) {
            (rule.set)(target, value);
        }
    }
}

fn capture_string(regex: &Regex, content: &str) -> Option<String> {
    regex
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn capture_number(regex: &Regex, content: &str) -> Option<u32> {
    regex
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_spaced_number(m.as_str()))
}

fn capture_date(content: &str) -> Option<NaiveDate> {
    let caps = REPORT_DATE.captures(content)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
