mod common;

use chrono::NaiveDate;
use dossier::records::{build_checklist, checklist_values, ArchivePeriod, DailyLog};
use dossier::template::{
    build_fallback_log_document, fill_named_template, find_named_tags, render_daily_log,
    FillOptions, MissingValue, NamedValues, TagIssueKind, TemplateError,
};

#[cfg(test)]
mod named_template_tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> NamedValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_log() -> DailyLog {
        let mut log = DailyLog {
            log_date: NaiveDate::from_ymd_opt(2026, 2, 3),
            prison_name: "女子监狱".to_string(),
            inspector_name: "李检察".to_string(),
            supervision_situation: "检察三大现场，未发现问题".to_string(),
            ..DailyLog::default()
        };
        log.three_scenes.labor.checked = true;
        log.three_scenes.labor.locations = vec!["一监区车间".to_string()];
        log
    }

    fn log_template() -> Vec<u8> {
        let body = [
            common::paragraph(&["{prison", "_name}派驻检察室"]),
            common::paragraph(&["检察人员：{inspector_name}", "  日期：{log_date}"]),
            common::paragraph(&["{supervision}"]),
        ]
        .concat();
        common::docx(&body)
    }

    #[test]
    fn test_tags_split_across_runs_are_filled() {
        let output = fill_named_template(
            &log_template(),
            &values(&[("prison_name", "女子监狱"), ("inspector_name", "李检察")]),
            &FillOptions::default(),
        )
        .unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("女子监狱派驻检察室"));
        assert!(text.contains("检察人员：李检察  日期："));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_missing_values_can_be_kept() {
        let options = FillOptions {
            missing: MissingValue::Keep,
            ..FillOptions::default()
        };
        let output = fill_named_template(&log_template(), &NamedValues::new(), &options).unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("{prison_name}派驻检察室"));
        assert!(text.contains("{supervision}"));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let output = fill_named_template(
            &log_template(),
            &values(&[("supervision", "第一行\n第二行")]),
            &FillOptions::default(),
        )
        .unwrap();
        let xml = common::read_part(&output, "word/document.xml");

        assert!(xml.contains("<w:br/>"));
        assert!(common::visible_text(&xml).contains("第一行第二行"));
    }

    #[test]
    fn test_values_are_escaped() {
        let output = fill_named_template(
            &log_template(),
            &values(&[("prison_name", "A&B<监狱>")]),
            &FillOptions::default(),
        )
        .unwrap();
        let xml = common::read_part(&output, "word/document.xml");

        assert!(xml.contains("A&amp;B&lt;监狱&gt;"));
    }

    #[test]
    fn test_tag_errors_are_reported_together() {
        let body = [
            common::paragraph(&["{prison_name"]),
            common::paragraph(&["多余的}括号"]),
            common::paragraph(&["空标签{}"]),
        ]
        .concat();

        match fill_named_template(&common::docx(&body), &NamedValues::new(), &FillOptions::default()) {
            Err(TemplateError::Render { errors }) => {
                let kinds: Vec<TagIssueKind> = errors.iter().map(|e| e.kind).collect();
                assert_eq!(
                    kinds,
                    vec![
                        TagIssueKind::UnclosedTag,
                        TagIssueKind::UnopenedTag,
                        TagIssueKind::EmptyTag
                    ]
                );
                assert_eq!(errors[1].paragraph, 1);
            }
            other => panic!("expected Render error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_relationships_part() {
        let template = common::docx_with_rels(&common::paragraph(&["{prison_name}"]), "<Relationships><Relationship");

        match fill_named_template(&template, &NamedValues::new(), &FillOptions::default()) {
            Err(TemplateError::Xml { part, .. }) => {
                assert_eq!(part, "word/_rels/document.xml.rels");
            }
            other => panic!("expected Xml error, got {other:?}"),
        }
    }

    #[test]
    fn test_find_named_tags() {
        let tags: Vec<String> = find_named_tags(&log_template()).unwrap().into_iter().collect();
        assert_eq!(tags, vec!["inspector_name", "log_date", "prison_name", "supervision"]);
    }

    #[test]
    fn test_render_daily_log_uses_template() {
        let output = render_daily_log(Some(&log_template()), &sample_log(), &[], &[]).unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("女子监狱派驻检察室"));
        assert!(text.contains("日期：2026/2/3"));
        assert!(text.contains("检察三大现场，未发现问题"));
        assert!(!text.contains("派驻检察工作日志"));
    }

    #[test]
    fn test_render_daily_log_falls_back_on_broken_template() {
        let broken = common::docx_with_rels(&common::paragraph(&["{prison_name}"]), "<Relationships");
        let output = render_daily_log(Some(&broken), &sample_log(), &[], &[]).unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("派驻检察工作日志"));
        assert!(text.contains("女子监狱"));
    }

    #[test]
    fn test_render_daily_log_without_template() {
        let output = render_daily_log(None, &sample_log(), &[], &[]).unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("派驻检察工作日志"));
        assert!(text.contains("一、三大现场检察"));
        assert!(text.contains("一监区车间"));
        assert!(text.contains("检察三大现场，未发现问题"));
    }

    #[test]
    fn test_fallback_fills_empty_sections() {
        let output = build_fallback_log_document(&DailyLog::default()).unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("派驻监所"));
        assert!(text.contains("四、采纳反馈情况无"));
    }

    #[test]
    fn test_checklist_template() {
        let period = ArchivePeriod {
            prison_name: "女子监狱".to_string(),
            year: 2026,
            month: 2,
        };
        let entries = build_checklist(&[], &[], &[], &[]);
        let body = [
            common::paragraph(&["{prison_name}{year}年{month}月检察清单"]),
            common::paragraph(&["1. {content1} / {status1}"]),
            common::paragraph(&["7. {status7}"]),
        ]
        .concat();

        let output = fill_named_template(
            &common::docx(&body),
            &checklist_values(&period, &entries),
            &FillOptions::default(),
        )
        .unwrap();
        let text = common::visible_text(&common::read_part(&output, "word/document.xml"));

        assert!(text.contains("女子监狱2026年2月检察清单"));
        assert!(text.contains("1. 本月无此类事件 / 本月无此类事件"));
        assert!(text.contains("7. 未检察"));
    }
}
