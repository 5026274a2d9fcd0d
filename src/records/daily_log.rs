//! Values for the daily inspection log template
//!
//! The log template accepts both numbered keys (`{1}`..`{12}`) and their
//! named equivalents, so both sets are always produced.

use chrono::{Datelike, NaiveDate};

use super::models::*;
use super::stats::at_least_once;
use crate::template::NamedValues;

/// Date in the `2026/2/3` form used on printed logs.
pub fn format_log_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Checked inspection sites, one line per scene, or `无`.
pub fn scene_locations(scenes: &ThreeScenes) -> String {
    let parts: Vec<String> = [
        ("劳动现场", &scenes.labor),
        ("生活现场", &scenes.living),
        ("学习现场", &scenes.study),
    ]
    .into_iter()
    .filter(|(_, scene)| scene.checked && !scene.locations.is_empty())
    .map(|(label, scene)| format!("{label}:{}", scene.locations.join("、")))
    .collect();

    if parts.is_empty() {
        "无".to_string()
    } else {
        parts.join("\n")
    }
}

fn weekly_note(record: &WeeklyRecord) -> String {
    let mut parts = Vec::new();
    if record.hospital_check.hospital_checked {
        parts.push("医院检察".to_string());
    }
    if record.hospital_check.confinement_checked {
        parts.push("禁闭室检察".to_string());
    }
    if !record.talk_records.is_empty() {
        parts.push(format!("谈话教育{}次", record.talk_records.len()));
    }
    if record.mailbox.open_count > 0 {
        parts.push(format!("信箱开启{}次", record.mailbox.open_count));
    }

    if parts.is_empty() {
        "周检察记录".to_string()
    } else {
        parts.join("、")
    }
}

fn monthly_note(record: &MonthlyRecord) -> String {
    let mut parts = Vec::new();
    if record.visit_check.checked {
        parts.push(format!(
            "会见检察{}次",
            at_least_once(record.visit_check.visit_count)
        ));
    }
    if record.dangerous_check.checked {
        parts.push("危险物品检察".to_string());
    }

    if parts.is_empty() {
        "月检察记录".to_string()
    } else {
        parts.join("、")
    }
}

/// Supervision text for the "other work" box: same-day weekly and monthly
/// inspections followed by the free-text entry.
pub fn other_supervision(
    log: &DailyLog,
    weekly_records: &[WeeklyRecord],
    monthly_records: &[MonthlyRecord],
) -> String {
    let (weekly, monthly) = match log.log_date {
        Some(date) => (
            weekly_records
                .iter()
                .filter(|r| r.effective_date() == Some(date))
                .map(weekly_note)
                .collect::<Vec<_>>()
                .join("\n"),
            monthly_records
                .iter()
                .filter(|r| r.record_date == Some(date))
                .map(monthly_note)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        None => (String::new(), String::new()),
    };

    let mut lines = Vec::new();
    if !weekly.is_empty() {
        lines.push(format!("【周检察】{weekly}"));
    }
    if !monthly.is_empty() {
        lines.push(format!("【月检察】{monthly}"));
    }
    if !log.other_work.supervision_situation.is_empty() {
        lines.push(log.other_work.supervision_situation.clone());
    }
    lines.join("\n")
}

/// Build the value map for one daily log.
pub fn daily_log_values(
    log: &DailyLog,
    weekly_records: &[WeeklyRecord],
    monthly_records: &[MonthlyRecord],
) -> NamedValues {
    let date = log.log_date.map(format_log_date).unwrap_or_default();
    let strict_new = log.strict_control.new_count + log.strict_control.confinement_new;
    let admission = format!("入:{}/出:{}", log.admission.in_count, log.admission.out_count);

    let fields = [
        ("1", "prison_name", log.prison_name.clone()),
        ("2", "inspector_name", log.inspector_name.clone()),
        ("3", "log_date", date),
        ("4", "writer_name", log.inspector_name.clone()),
        ("5", "scene_locations", scene_locations(&log.three_scenes)),
        ("6", "strict_new", strict_new.to_string()),
        ("7", "police_count", log.police_equipment.count.to_string()),
        ("8", "admission", admission),
        ("9", "supervision", log.supervision_situation.clone()),
        ("10", "feedback", log.feedback_situation.clone()),
        (
            "11",
            "other_supervision",
            other_supervision(log, weekly_records, monthly_records),
        ),
        (
            "12",
            "other_feedback",
            log.other_work.feedback_situation.clone(),
        ),
    ];

    let mut values = NamedValues::new();
    for (number, name, value) in fields {
        values.insert(number.to_string(), value.clone());
        values.insert(name.to_string(), value);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> DailyLog {
        let mut log = DailyLog {
            log_date: NaiveDate::from_ymd_opt(2026, 2, 3),
            prison_name: "女子监狱".to_string(),
            inspector_name: "李检察".to_string(),
            ..DailyLog::default()
        };
        log.three_scenes.labor = SceneCheck {
            checked: true,
            locations: vec!["一监区车间".to_string(), "二监区车间".to_string()],
        };
        log.three_scenes.living = SceneCheck {
            checked: true,
            locations: Vec::new(),
        };
        log.strict_control.new_count = 1;
        log.strict_control.confinement_new = 2;
        log.admission = Admission {
            in_count: 4,
            out_count: 1,
        };
        log
    }

    #[test]
    fn test_scene_locations_skips_empty_scenes() {
        let log = sample_log();
        assert_eq!(scene_locations(&log.three_scenes), "劳动现场:一监区车间、二监区车间");
        assert_eq!(scene_locations(&ThreeScenes::default()), "无");
    }

    #[test]
    fn test_daily_log_values_numbered_and_named() {
        let log = sample_log();
        let values = daily_log_values(&log, &[], &[]);

        assert_eq!(values["1"], "女子监狱");
        assert_eq!(values["prison_name"], "女子监狱");
        assert_eq!(values["3"], "2026/2/3");
        assert_eq!(values["strict_new"], "3");
        assert_eq!(values["admission"], "入:4/出:1");
        assert_eq!(values["11"], "");
        assert_eq!(values.len(), 24);
    }

    #[test]
    fn test_same_day_records_are_noted() {
        let mut log = sample_log();
        log.other_work.supervision_situation = "发现问题已口头纠正".to_string();

        let mut week = WeeklyRecord {
            record_date: log.log_date,
            ..WeeklyRecord::default()
        };
        week.hospital_check.hospital_checked = true;
        week.mailbox.open_count = 1;

        let other_day = WeeklyRecord {
            record_date: NaiveDate::from_ymd_opt(2026, 2, 4),
            ..WeeklyRecord::default()
        };

        let mut month = MonthlyRecord {
            record_date: log.log_date,
            ..MonthlyRecord::default()
        };
        month.visit_check.checked = true;

        let text = other_supervision(&log, &[week, other_day], &[month]);
        assert_eq!(
            text,
            "【周检察】医院检察、信箱开启1次\n【月检察】会见检察1次\n发现问题已口头纠正"
        );
    }
}
