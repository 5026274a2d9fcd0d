mod common;

use dossier::template::{fill_numbered_template, find_numbered_tokens, SlotMap, TemplateError};

#[cfg(test)]
mod numbered_template_tests {
    use super::*;

    fn report_template() -> Vec<u8> {
        let body = [
            common::paragraph(&["{1}人民检察院派驻检察室"]),
            common::paragraph(&["本月收到信件{55}封，{12}"]),
            common::paragraph(&["在押罪犯{4}人，新收押{4}人"]),
        ]
        .concat();
        common::docx(&body)
    }

    #[test]
    fn test_fill_replaces_tokens_and_keeps_unknown_ones() {
        let slots: SlotMap = [(1, "女子监狱"), (55, "40")].into_iter().collect();
        let output = fill_numbered_template(&report_template(), &slots).unwrap();
        let xml = common::read_part(&output, "word/document.xml");

        assert!(xml.contains("女子监狱人民检察院派驻检察室"));
        assert!(xml.contains("本月收到信件40封，{12}"));
        assert!(xml.contains("{4}"));
        assert!(!xml.contains("{1}"));
        assert!(!xml.contains("{55}"));
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let slots: SlotMap = [(4, "1258")].into_iter().collect();
        let output = fill_numbered_template(&report_template(), &slots).unwrap();
        let xml = common::read_part(&output, "word/document.xml");

        assert!(xml.contains("在押罪犯1258人，新收押1258人"));
    }

    #[test]
    fn test_other_parts_are_copied() {
        let template = report_template();
        let slots: SlotMap = [(1, "女子监狱")].into_iter().collect();
        let output = fill_numbered_template(&template, &slots).unwrap();

        assert_eq!(common::part_names(&output), common::part_names(&template));
        assert_eq!(
            common::read_part(&output, "word/_rels/document.xml.rels"),
            common::DOCUMENT_RELS
        );
        assert_eq!(
            common::read_part(&output, "[Content_Types].xml"),
            common::CONTENT_TYPES
        );
    }

    #[test]
    fn test_filled_output_can_be_filled_again() {
        let first: SlotMap = [(1, "女子监狱")].into_iter().collect();
        let once = fill_numbered_template(&report_template(), &first).unwrap();

        let second: SlotMap = [(12, "无")].into_iter().collect();
        let twice = fill_numbered_template(&once, &second).unwrap();
        let xml = common::read_part(&twice, "word/document.xml");

        assert!(xml.contains("女子监狱人民检察院"));
        assert!(xml.contains("{55}封"));
        assert!(xml.contains("，无"));
    }

    #[test]
    fn test_escaped_values_stay_well_formed() {
        let mut slots = SlotMap::new();
        slots.insert_escaped(1, "A&B<监狱>");
        let output = fill_numbered_template(&report_template(), &slots).unwrap();
        let xml = common::read_part(&output, "word/document.xml");

        assert!(xml.contains("A&amp;B&lt;监狱&gt;人民检察院"));
    }

    #[test]
    fn test_excel_package_is_rejected() {
        let workbook = common::build_package(&[
            ("[Content_Types].xml", common::CONTENT_TYPES),
            ("xl/workbook.xml", "<workbook/>"),
        ]);

        match fill_numbered_template(&workbook, &SlotMap::new()) {
            Err(TemplateError::NotWordDocument(message)) => assert!(message.contains("Excel")),
            other => panic!("expected NotWordDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_document_part() {
        let package = common::build_package(&[("[Content_Types].xml", common::CONTENT_TYPES)]);

        match fill_numbered_template(&package, &SlotMap::new()) {
            Err(TemplateError::MissingPart(part)) => assert_eq!(part, "word/document.xml"),
            other => panic!("expected MissingPart, got {other:?}"),
        }
    }

    #[test]
    fn test_non_zip_input() {
        let result = fill_numbered_template(b"plain text, not a package", &SlotMap::new());
        assert!(matches!(result, Err(TemplateError::Zip(_))));
    }

    #[test]
    fn test_find_tokens_in_template() {
        let xml = common::read_part(&report_template(), "word/document.xml");
        let tokens: Vec<u32> = find_numbered_tokens(&xml).into_iter().collect();
        assert_eq!(tokens, vec![1, 4, 12, 55]);
    }
}
