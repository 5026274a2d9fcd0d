use chrono::NaiveDate;
use dossier::records::{
    build_checklist, calculate_stats, daily_log_values, ArchivePeriod, RecordBundle, TalkKind,
};

#[cfg(test)]
mod records_tests {
    use super::*;

    const EXPORT: &str = r#"{
        "dailyLogs": [
            {
                "log_date": "2026-02-03",
                "prison_name": "女子监狱",
                "inspector_name": "李检察",
                "three_scenes": {
                    "labor": { "checked": true, "locations": ["一监区车间"] },
                    "living": { "checked": true }
                },
                "strict_control": { "newCount": 1, "confinementNew": 2 },
                "monitor_check": { "checked": true, "count": 0 }
            },
            { "log_date": "2026-01-30", "monitor_check": { "checked": true, "count": 5 } }
        ],
        "weeklyRecords": [
            {
                "week_start_date": "2026-02-02",
                "record_date": "2026-02-03",
                "hospital_check": { "checked": true, "hospitalChecked": true, "confinementChecked": true },
                "talk_records": [
                    { "type": "newPrisoner", "prisoner_name": "张某" },
                    { "type": "injury" },
                    { "type": "somethingElse" }
                ],
                "mailbox": { "openCount": 1, "receivedCount": 3 }
            }
        ],
        "monthlyRecords": [
            { "record_month": "2026-02", "visit_check": { "checked": true, "visitCount": 2 } },
            { "record_date": "2026-03-01", "visit_check": { "checked": true } }
        ],
        "immediateEvents": [
            { "event_date": "2026-02-10", "event_type": "罪犯死亡", "title": "病亡" }
        ]
    }"#;

    fn february() -> ArchivePeriod {
        ArchivePeriod {
            prison_name: "女子监狱".to_string(),
            year: 2026,
            month: 2,
        }
    }

    fn february_bundle() -> RecordBundle {
        let bundle: RecordBundle = serde_json::from_str(EXPORT).unwrap();
        bundle.for_period(&february())
    }

    #[test]
    fn test_export_deserializes_with_defaults() {
        let bundle: RecordBundle = serde_json::from_str(EXPORT).unwrap();

        assert_eq!(bundle.daily_logs.len(), 2);
        assert_eq!(bundle.daily_logs[1].prison_name, "");
        let talks = &bundle.weekly_records[0].talk_records;
        assert_eq!(talks[0].kind, TalkKind::NewPrisoner);
        assert_eq!(talks[1].prisoner_name, "");
        assert_eq!(talks[2].kind, TalkKind::Other);
    }

    #[test]
    fn test_for_period_filters_by_month() {
        let bundle = february_bundle();

        assert_eq!(bundle.daily_logs.len(), 1);
        assert_eq!(bundle.weekly_records.len(), 1);
        // Undated record matched on its month key, March record dropped
        assert_eq!(bundle.monthly_records.len(), 1);
        assert_eq!(bundle.immediate_events.len(), 1);
    }

    #[test]
    fn test_month_statistics() {
        let bundle = february_bundle();
        let stats = calculate_stats(
            &bundle.daily_logs,
            &bundle.weekly_records,
            &bundle.monthly_records,
        );

        assert_eq!(stats.three_scene_checks, 2);
        assert_eq!(stats.monitor_checks, 1);
        assert_eq!(stats.key_location_checks, 2);
        assert_eq!(stats.total_talks, 3);
        assert_eq!(stats.new_admission_talks, 1);
        assert_eq!(stats.injury_talks, 1);
        assert_eq!(stats.mailbox_opens, 1);
        assert_eq!(stats.letters_received, 3);
        assert_eq!(stats.visit_checks, 2);
    }

    #[test]
    fn test_month_checklist() {
        let bundle = february_bundle();
        let entries = build_checklist(
            &bundle.daily_logs,
            &bundle.weekly_records,
            &bundle.monthly_records,
            &bundle.immediate_events,
        );

        assert_eq!(entries.len(), 16);
        assert_eq!(entries[1].content, "病亡");
        assert_eq!(entries[6].situation, "已检察 1 次");
        assert_eq!(entries[8].situation, "发现外伤 1 人次");
        assert_eq!(entries[9].situation, "已谈话 3 人次");
        assert_eq!(entries[10].situation, "开启 1 次，收到信件 3 封");
        assert_eq!(entries[12].situation, "已检察 2 次");
    }

    #[test]
    fn test_daily_log_includes_same_day_inspections() {
        let bundle = february_bundle();
        let log = &bundle.daily_logs[0];
        assert_eq!(log.log_date, NaiveDate::from_ymd_opt(2026, 2, 3));

        let values = daily_log_values(log, &bundle.weekly_records, &bundle.monthly_records);
        assert_eq!(values["strict_new"], "3");
        assert_eq!(values["scene_locations"], "劳动现场:一监区车间");
        assert_eq!(
            values["other_supervision"],
            "【周检察】医院检察、禁闭室检察、谈话教育3次、信箱开启1次"
        );
        assert_eq!(values["11"], values["other_supervision"]);
    }
}
