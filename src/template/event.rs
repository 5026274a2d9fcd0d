//! Word report for a single immediate-inspection event

use anyhow::Result;
use docx_rs::{AlignmentType, Docx, LineSpacing, Paragraph, Run};
use std::io::Cursor;

use crate::records::{ImmediateEvent, ParoleData};

fn line(text: &str) -> Paragraph {
    Paragraph::new()
        .line_spacing(LineSpacing::new().before(200).after(200))
        .add_run(Run::new().add_text(text))
}

fn parole_lines(parole: &ParoleData) -> Vec<Paragraph> {
    let mut lines = vec![line("减刑假释信息：")];
    if !parole.batch.trim().is_empty() {
        lines.push(line(&format!("批次：{}", parole.batch)));
    }
    if parole.count > 0 {
        lines.push(line(&format!("涉及人数：{} 人", parole.count)));
    }
    if !parole.stage.trim().is_empty() {
        lines.push(line(&format!("处理阶段：{}", parole.stage_name())));
    }
    lines
}

fn office(prison_name: &str) -> String {
    let prison_name = match prison_name.trim() {
        "" => "监狱",
        name => name,
    };
    format!("派驻{prison_name}检察室")
}

/// Plain-text event report: office and event type headings, date, status,
/// title, description and, for parole requests, the batch details.
pub fn build_immediate_event_document(event: &ImmediateEvent) -> Result<Vec<u8>> {
    let office = office(&event.prison_name);
    let event_date = event
        .event_date
        .map_or_else(|| "未填写".to_string(), |d| d.format("%Y-%m-%d").to_string());
    let description = match event.description.trim() {
        "" => "无",
        text => text,
    };

    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(&office).bold().size(28)),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(600))
                .add_run(
                    Run::new()
                        .add_text(format!("{}报告", event.type_name()))
                        .bold()
                        .size(32),
                ),
        )
        .add_paragraph(line(&format!("事件日期：{event_date}")))
        .add_paragraph(line(&format!("处理状态：{}", event.status.label())));

    if !event.title.trim().is_empty() {
        docx = docx.add_paragraph(line(&format!("事件标题：{}", event.title)));
    }
    docx = docx
        .add_paragraph(line("事件详情："))
        .add_paragraph(line(description));

    if let Some(parole) = &event.parole_data {
        for paragraph in parole_lines(parole) {
            docx = docx.add_paragraph(paragraph);
        }
    }

    let issued = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(Run::new().add_text(&office)),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(Run::new().add_text(format!("报告日期：{issued}"))),
        );

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer)?;
    tracing::debug!(event_type = %event.event_type, bytes = buffer.get_ref().len(), "built event document");
    Ok(buffer.into_inner())
}

/// `YYYY-MM-DD_<type>_<title>.docx`, the name an event report is filed under.
pub fn event_file_name(event: &ImmediateEvent) -> String {
    let date = event
        .event_date
        .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
    let title = match event.title.trim() {
        "" => "无标题",
        title => title,
    };
    let title: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    format!("{date}_{}_{title}.docx", event.short_type_name())
}
