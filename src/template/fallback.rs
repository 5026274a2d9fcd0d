//! Plain documents used when a template cannot be rendered
//!
//! Each `render_*` entry point tries its template first. Any template error
//! is logged and answered with a self-contained docx-rs layout; the plain
//! layout itself is not retried.

use anyhow::Result;
use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, Shading, Table, TableCell, TableRow, WidthType,
};
use std::io::Cursor;

use super::named::{fill_named_template, FillOptions};
use super::numbered::fill_numbered_template;
use super::slots::MonthlyReportInputs;
use crate::records::stats::at_least_once;
use crate::records::{
    calculate_stats, checklist_values, daily_log_values, format_log_date, ArchivePeriod,
    ChecklistEntry, DailyLog, MonthlyRecord, RecordBundle, SceneCheck, WeeklyRecord, CHECKLIST,
    DEFAULT_PRISON_NAME,
};

const HEADER_FILL: &str = "E8F4FC";
const TITLE_COLOR: &str = "0066CC";

fn text_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn cell(text: &str, header: bool) -> TableCell {
    let mut run = Run::new().add_text(text).size(22);
    if header {
        run = run.bold();
    }
    let cell = TableCell::new().add_paragraph(Paragraph::new().add_run(run));
    if header {
        cell.shading(Shading::new().fill(HEADER_FILL))
    } else {
        cell
    }
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(24))
}

fn body_text(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(22))
}

fn full_width(rows: Vec<TableRow>) -> Table {
    Table::new(rows).width(5000, WidthType::Pct)
}

fn info_table(log: &DailyLog, date: &str) -> Table {
    full_width(vec![
        TableRow::new(vec![
            cell("日期", true),
            cell(date, false),
            cell("派驻人员", true),
            cell(text_or(&log.inspector_name, "-"), false),
        ]),
        TableRow::new(vec![
            cell("派驻监所", true),
            cell(text_or(&log.prison_name, "-"), false).grid_span(3),
        ]),
    ])
}

fn scene_row(label: &str, scene: &SceneCheck) -> TableRow {
    let locations = scene.locations.join(", ");
    TableRow::new(vec![
        cell(label, false),
        cell(if scene.checked { "✓" } else { "✗" }, false),
        cell(text_or(&locations, "-"), false),
    ])
}

fn scenes_table(log: &DailyLog) -> Table {
    let scenes = &log.three_scenes;
    full_width(vec![
        TableRow::new(vec![
            cell("现场类型", true),
            cell("是否检察", true),
            cell("位置/内容", true),
        ]),
        scene_row("劳动现场", &scenes.labor),
        scene_row("生活现场", &scenes.living),
        scene_row("学习现场", &scenes.study),
    ])
}

fn supervision_table(log: &DailyLog) -> Table {
    let police = if log.police_equipment.checked {
        format!("{}人", log.police_equipment.count)
    } else {
        "未检察".to_string()
    };
    let monitor = if log.monitor_check.checked {
        format!("{}次", at_least_once(log.monitor_check.count))
    } else {
        "未抽查".to_string()
    };

    let rows = [
        (
            "严管禁闭",
            format!(
                "新增: {}, 累计: {}",
                log.strict_control.new_count, log.strict_control.total_count
            ),
        ),
        ("警戒具检察", police),
        (
            "涉黑罪犯",
            format!(
                "新增: {}, 累计: {}",
                log.gang_prisoners.new_count, log.gang_prisoners.total_count
            ),
        ),
        (
            "收押/调出",
            format!(
                "入监: {}, 出监: {}",
                log.admission.in_count, log.admission.out_count
            ),
        ),
        ("监控抽查", monitor),
    ];

    facts_table(&rows)
}

fn title(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_text(text).bold().size(32))
}

fn subtitle(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_text(text).bold().size(28).color(TITLE_COLOR))
}

/// Two-column label/value table.
fn facts_table(rows: &[(&str, String)]) -> Table {
    full_width(
        rows.iter()
            .map(|(label, value)| TableRow::new(vec![cell(label, true), cell(value, false)]))
            .collect(),
    )
}

fn generated_at() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

fn pack(docx: Docx) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer)?;
    Ok(buffer.into_inner())
}

/// Build a self-contained daily log document with docx-rs.
pub fn build_fallback_log_document(log: &DailyLog) -> Result<Vec<u8>> {
    let date = log
        .log_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

    let supervision = text_or(
        &log.supervision_situation,
        text_or(&log.other_work.supervision_situation, "无"),
    );
    let feedback = text_or(
        &log.feedback_situation,
        text_or(&log.other_work.feedback_situation, "无"),
    );

    let docx = Docx::new()
        .add_paragraph(title(text_or(&log.prison_name, "派驻监所")))
        .add_paragraph(subtitle("派驻检察工作日志"))
        .add_paragraph(Paragraph::new())
        .add_table(info_table(log, &date))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("一、三大现场检察"))
        .add_table(scenes_table(log))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("二、监管情况"))
        .add_table(supervision_table(log))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("三、检察监督情况"))
        .add_paragraph(body_text(supervision))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("四、采纳反馈情况"))
        .add_paragraph(body_text(feedback));

    pack(docx)
}

/// Render one daily log, from the template when one is given.
pub fn render_daily_log(
    template: Option<&[u8]>,
    log: &DailyLog,
    weekly_records: &[WeeklyRecord],
    monthly_records: &[MonthlyRecord],
) -> Result<Vec<u8>> {
    let date = log.log_date.map(format_log_date).unwrap_or_default();

    if let Some(template) = template {
        let values = daily_log_values(log, weekly_records, monthly_records);
        match fill_named_template(template, &values, &FillOptions::default()) {
            Ok(bytes) => return Ok(bytes),
            Err(err) => {
                tracing::warn!(error = %err, log_date = %date, "log template failed, using plain layout");
            }
        }
    } else {
        tracing::debug!(log_date = %date, "no log template configured, using plain layout");
    }

    build_fallback_log_document(log)
}

/// Monthly work summary counted straight from the month's records.
pub fn build_fallback_report_document(
    period: &ArchivePeriod,
    records: &RecordBundle,
) -> Result<Vec<u8>> {
    let stats = calculate_stats(
        &records.daily_logs,
        &records.weekly_records,
        &records.monthly_records,
    );

    let docx = Docx::new()
        .add_paragraph(title(&format!(
            "{} 月度检察工作报告",
            text_or(&period.prison_name, "派驻监所")
        )))
        .add_paragraph(subtitle(&format!("{}年{}月", period.year, period.month)))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("一、日检察工作"))
        .add_table(facts_table(&[
            ("日检察记录数", format!("{} 条", records.daily_logs.len())),
            ("三大现场检察次数", format!("{} 次", stats.three_scene_checks)),
            ("监控抽查次数", format!("{} 次", stats.monitor_checks)),
        ]))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("二、周检察工作"))
        .add_table(facts_table(&[
            ("周检察记录数", format!("{} 条", records.weekly_records.len())),
            ("重点场所检察次数", format!("{} 次", stats.key_location_checks)),
            ("谈话教育次数", format!("{} 次", stats.total_talks)),
            ("检察官信箱开启次数", format!("{} 次", stats.mailbox_opens)),
            ("收到信件数量", format!("{} 封", stats.letters_received)),
        ]))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("三、月检察工作"))
        .add_table(facts_table(&[(
            "月检察记录数",
            format!("{} 条", records.monthly_records.len()),
        )]))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("四、及时检察事件"))
        .add_table(facts_table(&[(
            "及时检察事件数",
            format!("{} 件", records.immediate_events.len()),
        )]))
        .add_paragraph(Paragraph::new())
        .add_paragraph(body_text(&format!(
            "本报告由系统自动生成，生成时间：{}",
            generated_at()
        )));

    pack(docx)
}

/// Render the monthly work report from the numbered template when one is
/// given, else as the plain summary of `records`.
pub fn render_monthly_report(
    template: Option<&[u8]>,
    inputs: &MonthlyReportInputs,
    records: &RecordBundle,
) -> Result<Vec<u8>> {
    let month = inputs.period().report_month();

    if let Some(template) = template {
        match fill_numbered_template(template, &inputs.slots()) {
            Ok(bytes) => return Ok(bytes),
            Err(err) => {
                tracing::warn!(error = %err, %month, "report template failed, using plain layout");
            }
        }
    } else {
        tracing::debug!(%month, "no report template configured, using plain layout");
    }

    build_fallback_report_document(inputs.period(), records)
}

/// The sixteen checklist items with their frequency, the entered situation
/// and a mark for items whose record kind exists this month.
pub fn build_fallback_checklist_document(
    period: &ArchivePeriod,
    entries: &[ChecklistEntry],
    records: &RecordBundle,
) -> Result<Vec<u8>> {
    let prison_name = text_or(&period.prison_name, DEFAULT_PRISON_NAME);

    let mut rows = vec![TableRow::new(vec![
        cell("序号", true),
        cell("检察事项", true),
        cell("频率要求", true),
        cell("完成情况", true),
        cell("状态", true),
    ])];
    for item in &CHECKLIST {
        let situation = entries
            .iter()
            .find(|e| e.id == item.id)
            .map_or("-", |e| text_or(&e.situation, "-"));
        let mark = if item.frequency.is_covered(records) { "✓" } else { "" };
        rows.push(TableRow::new(vec![
            cell(&item.id.to_string(), false),
            cell(item.name, false),
            cell(item.frequency.label(), false),
            cell(situation, false),
            cell(mark, false),
        ]));
    }

    let docx = Docx::new()
        .add_paragraph(title(&format!("{prison_name} 检察工作事项清单")))
        .add_paragraph(subtitle(&format!("{}年{}月", period.year, period.month)))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("一、完成情况统计"))
        .add_table(facts_table(&[
            ("日检察记录", format!("{} 条", records.daily_logs.len())),
            ("周检察记录", format!("{} 条", records.weekly_records.len())),
            ("月检察记录", format!("{} 条", records.monthly_records.len())),
            ("及时检察事件", format!("{} 件", records.immediate_events.len())),
        ]))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading(&format!("二、事项清单（{}项）", CHECKLIST.len())))
        .add_table(full_width(rows))
        .add_paragraph(Paragraph::new())
        .add_paragraph(body_text("说明：✓ 表示该类型有相关记录"))
        .add_paragraph(body_text(&format!("生成时间：{}", generated_at())));

    pack(docx)
}

/// Render the checklist from the named template when one is given.
pub fn render_checklist(
    template: Option<&[u8]>,
    period: &ArchivePeriod,
    entries: &[ChecklistEntry],
    records: &RecordBundle,
) -> Result<Vec<u8>> {
    let month = period.report_month();

    if let Some(template) = template {
        let values = checklist_values(period, entries);
        match fill_named_template(template, &values, &FillOptions::default()) {
            Ok(bytes) => return Ok(bytes),
            Err(err) => {
                tracing::warn!(error = %err, %month, "checklist template failed, using plain layout");
            }
        }
    } else {
        tracing::debug!(%month, "no checklist template configured, using plain layout");
    }

    build_fallback_checklist_document(period, entries, records)
}
