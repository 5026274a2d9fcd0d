mod common;

use chrono::NaiveDate;
use dossier::sheet::{
    import_grid, import_workbook, map_sheet, read_first_sheet, Cell, Grid, SheetError,
    SheetImport, SheetKind, PENDING_STATUS,
};

#[cfg(test)]
mod sheet_mapping_tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|text| if text.is_empty() { Cell::Empty } else { Cell::text(*text) })
            .collect()
    }

    fn strict_education_grid() -> Grid {
        vec![
            row(&["制单时间", "所属监区", "罪犯编号", "罪犯姓名", "严管教育原因", "严管天数", "严管起日", "业务状态"]),
            vec![
                Cell::Number(45292.0),
                Cell::text("一监区"),
                Cell::text("3601001"),
                Cell::text("张某"),
                Cell::text("抗拒改造"),
                Cell::Number(15.0),
                Cell::text("2024.01.02"),
                Cell::Empty,
            ],
            row(&["", "二监区", "", "李某", "", "", "", ""]),
            row(&["2024-01-05", "三监区", "3601003", "王某", "打架", "0", "2024年1月6日", "已审核"]),
        ]
    }

    #[test]
    fn test_strict_education_rows() {
        let import = import_grid(&strict_education_grid(), "严管教育审批.xlsx", None).unwrap();

        let SheetImport::StrictEducation { prisoners, records } = import else {
            panic!("expected strict education import");
        };
        // The row without a prisoner number is skipped
        assert_eq!(records.len(), 2);
        assert_eq!(prisoners.len(), 2);

        let first = &records[0];
        assert_eq!(first.prisoner_id, "3601001");
        assert_eq!(first.create_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(first.reason.as_deref(), Some("抗拒改造"));
        assert_eq!(first.days, Some(15));
        assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(first.status, PENDING_STATUS);
        assert_eq!(prisoners[0].name.as_deref(), Some("张某"));
        assert_eq!(prisoners[0].prison_area.as_deref(), Some("一监区"));

        let second = &records[1];
        assert_eq!(second.days, None);
        assert_eq!(second.start_date, NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(second.status, "已审核");
    }

    #[test]
    fn test_left_most_matching_column_is_used() {
        let grid = vec![
            row(&["罪犯编号", "罪犯姓名", "原罪犯姓名", "禁闭起日"]),
            row(&["3601001", "张某", "张某某", "2024-03-01"]),
        ];
        let SheetImport::Confinement { prisoners, records } = map_sheet(SheetKind::Confinement, &grid) else {
            panic!("expected confinement import");
        };

        assert_eq!(prisoners[0].name.as_deref(), Some("张某"));
        assert_eq!(records[0].start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(records[0].end_date, None);
    }

    #[test]
    fn test_mail_rows_keyed_on_name_or_sequence() {
        let grid = vec![
            row(&["序号", "开箱日期", "监区", "罪犯姓名", "事由"]),
            row(&["1", "2024-02-01", "一监区", "张某", "申诉"]),
            row(&["", "2024-02-01", "二监区", "李某", "反映伙食"]),
            row(&["", "2024-02-01", "三监区", "", "无署名"]),
        ];
        let import = import_grid(&grid, "信件汇总.xlsx", None).unwrap();

        let SheetImport::Mail { records } = import else {
            panic!("expected mail import");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence_no, 1);
        // Falls back to the row position
        assert_eq!(records[1].sequence_no, 2);
        assert_eq!(records[1].prisoner_name.as_deref(), Some("李某"));
    }

    #[test]
    fn test_blacklist_with_title_row() {
        let grid = vec![
            row(&["涉黑恶罪犯名单（2024年）", "", ""]),
            row(&["罪犯编号", "姓名", "原判刑期", "刑期起日", "三涉情况"]),
            row(&["3601009", "赵某", "十五年", "2019-05-01", "涉黑"]),
        ];
        let import = import_grid(&grid, "名单.xlsx", Some(SheetKind::Blacklist)).unwrap();

        let SheetImport::Blacklist { records } = import else {
            panic!("expected blacklist import");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prisoner_id, "3601009");
        assert_eq!(records[0].original_term.as_deref(), Some("十五年"));
        assert_eq!(records[0].term_start, NaiveDate::from_ymd_opt(2019, 5, 1));
        assert_eq!(records[0].involvement_type.as_deref(), Some("涉黑"));
    }

    #[test]
    fn test_kind_detected_from_header() {
        let grid = vec![
            row(&["罪犯编号", "姓名", "警戒具名称", "天数"]),
            row(&["3601001", "张某", "手铐", "3"]),
        ];
        let import = import_grid(&grid, "export.xlsx", None).unwrap();

        assert_eq!(import.kind(), SheetKind::Restraint);
        assert_eq!(import.record_count(), 1);
    }

    #[test]
    fn test_report_sheet_is_not_parsed() {
        let grid = vec![row(&["标题"]), row(&["内容"])];
        let import = import_grid(&grid, "10月犯情动态.xlsx", None).unwrap();
        assert_eq!(import, SheetImport::Report);
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let grid = vec![row(&["罪犯编号", "严管教育原因"])];
        assert!(matches!(
            import_grid(&grid, "严管教育.xlsx", None),
            Err(SheetError::Empty)
        ));
    }

    #[test]
    fn test_unknown_sheet() {
        let grid = vec![row(&["序号", "备注"]), row(&["1", "x"])];
        match import_grid(&grid, "export.xlsx", None) {
            Err(SheetError::UnknownKind { file_name }) => assert_eq!(file_name, "export.xlsx"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn test_import_serializes_with_type_tag() {
        let grid = vec![
            row(&["序号", "开箱日期", "罪犯姓名"]),
            row(&["3", "2024-02-01", "张某"]),
        ];
        let import = import_grid(&grid, "信件.xlsx", None).unwrap();
        let json = serde_json::to_value(&import).unwrap();

        assert_eq!(json["type"], "mail");
        assert_eq!(json["records"][0]["sequence_no"], 3);
        assert_eq!(json["records"][0]["open_date"], "2024-02-01");
    }

    #[test]
    fn test_missing_workbook() {
        let path = common::temp_path("missing.xlsx");
        assert!(matches!(
            import_workbook(&path, None, None),
            Err(SheetError::Workbook(_))
        ));
    }

    fn mail_workbook() -> Vec<u8> {
        common::xlsx(
            "B2:F4",
            &[
                (
                    2,
                    vec![
                        common::text_cell("B2", "序号"),
                        common::text_cell("C2", "开箱日期"),
                        common::text_cell("D2", "监区"),
                        common::text_cell("E2", "罪犯姓名"),
                        common::text_cell("F2", "事由"),
                    ],
                ),
                (
                    3,
                    vec![
                        common::number_cell("B3", 1.0),
                        common::date_cell("C3", 45323.0),
                        common::text_cell("D3", "一监区"),
                        common::text_cell("E3", "张某"),
                        common::text_cell("F3", "申诉"),
                    ],
                ),
                (
                    4,
                    vec![
                        common::number_cell("B4", 2.0),
                        // An ID number typed into the date column
                        common::date_cell("C4", 3.2e17),
                        common::text_cell("D4", "二监区"),
                        common::text_cell("E4", "李某"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_import_workbook_from_xlsx() {
        let path = common::temp_path("mail-import.xlsx");
        std::fs::write(&path, mail_workbook()).unwrap();

        let import = import_workbook(&path, Some("2月信件登记.xlsx"), None);
        std::fs::remove_file(&path).unwrap();

        let SheetImport::Mail { records } = import.unwrap() else {
            panic!("expected mail import");
        };
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.sequence_no, 1);
        assert_eq!(first.open_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(first.prison_area.as_deref(), Some("一监区"));
        assert_eq!(first.prisoner_name.as_deref(), Some("张某"));
        assert_eq!(first.reason.as_deref(), Some("申诉"));

        let second = &records[1];
        assert_eq!(second.sequence_no, 2);
        assert_eq!(second.open_date, None);
        assert_eq!(second.prisoner_name.as_deref(), Some("李某"));
        assert_eq!(second.reason, None);
    }

    #[test]
    fn test_read_first_sheet_offsets() {
        let path = common::temp_path("offset.xlsx");
        std::fs::write(&path, mail_workbook()).unwrap();

        let grid = read_first_sheet(&path);
        std::fs::remove_file(&path).unwrap();

        let grid = grid.unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][0], Cell::Empty);
        assert_eq!(grid[0][1], Cell::text("序号"));
        assert_eq!(grid[1][2], Cell::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert_eq!(grid[2][2], Cell::Number(3.2e17));
    }
}
