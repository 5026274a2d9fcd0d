//! Business sheet shapes and their records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::columns::{map_rows, ColumnSpec, RowView};
use super::grid::{Cell, Grid};

/// Status given to imported approvals that carry none.
pub const PENDING_STATUS: &str = "待审核";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    /// 严管教育审批
    StrictEducation,
    /// 禁闭审批
    Confinement,
    /// 戒具使用审批
    Restraint,
    /// 信件汇总
    Mail,
    /// 涉黑恶名单
    Blacklist,
    /// 犯情动态 (stored, not parsed)
    Report,
}

const FILE_NAME_RULES: [(&[&str], SheetKind); 6] = [
    (&["严管教育"], SheetKind::StrictEducation),
    (&["禁闭"], SheetKind::Confinement),
    (&["戒具"], SheetKind::Restraint),
    (&["信件"], SheetKind::Mail),
    (&["涉黑", "涉恶"], SheetKind::Blacklist),
    (&["犯情动态"], SheetKind::Report),
];

const HEADER_RULES: [(&[&str], SheetKind); 5] = [
    (&["严管教育原因"], SheetKind::StrictEducation),
    (&["禁闭起日"], SheetKind::Confinement),
    (&["戒具", "警戒具"], SheetKind::Restraint),
    (&["开箱日期"], SheetKind::Mail),
    (&["三涉情况"], SheetKind::Blacklist),
];

fn first_rule(haystack: &str, rules: &[(&[&str], SheetKind)]) -> Option<SheetKind> {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, kind)| *kind)
}

/// Identify a sheet from its file name, then from its first row.
pub fn detect_sheet_kind(file_name: &str, header: &[Cell]) -> Option<SheetKind> {
    let name = file_name.to_lowercase();
    first_rule(&name, &FILE_NAME_RULES).or_else(|| {
        let joined = header
            .iter()
            .map(|cell| cell.as_text().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        first_rule(&joined, &HEADER_RULES)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrisonerProfile {
    pub prisoner_id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub ethnicity: Option<String>,
    pub education: Option<String>,
    pub sentence_type: Option<String>,
    pub crime: Option<String>,
    pub original_term: Option<String>,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub prison_unit: Option<String>,
    pub prison_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictEducationRecord {
    pub prisoner_id: String,
    pub create_date: Option<NaiveDate>,
    pub applicable_clause: Option<String>,
    pub reason: Option<String>,
    pub days: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfinementRecord {
    pub prisoner_id: String,
    pub create_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub applicable_clause: Option<String>,
    pub violation_fact: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestraintRecord {
    pub prisoner_id: String,
    pub create_date: Option<NaiveDate>,
    pub restraint_name: Option<String>,
    pub applicable_clause: Option<String>,
    pub days: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRecord {
    pub sequence_no: u32,
    pub open_date: Option<NaiveDate>,
    pub prison_area: Option<String>,
    pub prisoner_name: Option<String>,
    pub reason: Option<String>,
    pub category: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistRecord {
    pub prisoner_id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub native_place: Option<String>,
    pub political_status: Option<String>,
    pub crime: Option<String>,
    pub original_term: Option<String>,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub involvement_type: Option<String>,
    pub custody_status: Option<String>,
    pub sentence_change: Option<String>,
}

/// Result of importing one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SheetImport {
    StrictEducation {
        prisoners: Vec<PrisonerProfile>,
        records: Vec<StrictEducationRecord>,
    },
    Confinement {
        prisoners: Vec<PrisonerProfile>,
        records: Vec<ConfinementRecord>,
    },
    Restraint {
        prisoners: Vec<PrisonerProfile>,
        records: Vec<RestraintRecord>,
    },
    Mail {
        records: Vec<MailRecord>,
    },
    Blacklist {
        records: Vec<BlacklistRecord>,
    },
    /// Situation reports are kept as files; nothing is extracted.
    Report,
}

impl SheetImport {
    pub fn kind(&self) -> SheetKind {
        match self {
            SheetImport::StrictEducation { .. } => SheetKind::StrictEducation,
            SheetImport::Confinement { .. } => SheetKind::Confinement,
            SheetImport::Restraint { .. } => SheetKind::Restraint,
            SheetImport::Mail { .. } => SheetKind::Mail,
            SheetImport::Blacklist { .. } => SheetKind::Blacklist,
            SheetImport::Report => SheetKind::Report,
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            SheetImport::StrictEducation { records, .. } => records.len(),
            SheetImport::Confinement { records, .. } => records.len(),
            SheetImport::Restraint { records, .. } => records.len(),
            SheetImport::Mail { records } => records.len(),
            SheetImport::Blacklist { records } => records.len(),
            SheetImport::Report => 0,
        }
    }
}

const STRICT_EDUCATION_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("create_date", &["制单时间"]),
    ColumnSpec::new("prison_unit", &["所属单位"]),
    ColumnSpec::new("prison_area", &["所属监区"]),
    ColumnSpec::new("name", &["罪犯姓名"]).exact(&["姓名"]),
    ColumnSpec::new("prisoner_id", &["罪犯编号"]),
    ColumnSpec::new("gender", &["性别"]),
    ColumnSpec::new("birth_date", &["出生日期"]),
    ColumnSpec::new("ethnicity", &["民族"]),
    ColumnSpec::new("education", &["文化程度"]),
    ColumnSpec::new("sentence_type", &["刑种"]),
    ColumnSpec::new("crime", &["罪名"]),
    ColumnSpec::new("original_term", &["原判刑期"]),
    ColumnSpec::new("term_start", &["刑期起日"]),
    ColumnSpec::new("term_end", &["现刑期止日"]),
    ColumnSpec::new("clause", &["适用条款"]),
    ColumnSpec::new("reason", &["严管教育原因"]),
    ColumnSpec::new("days", &["严管天数"]),
    ColumnSpec::new("start_date", &["严管起日"]),
    ColumnSpec::new("end_date", &["严管止日"]),
    ColumnSpec::new("status", &["业务状态"]),
];

const CONFINEMENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("create_date", &["制单时间"]),
    ColumnSpec::new("prison_unit", &["所属单位"]),
    ColumnSpec::new("prison_area", &["所属监区"]),
    ColumnSpec::new("name", &["罪犯姓名"]),
    ColumnSpec::new("prisoner_id", &["罪犯编号"]),
    ColumnSpec::new("gender", &["性别"]),
    ColumnSpec::new("birth_date", &["出生日期"]),
    ColumnSpec::new("ethnicity", &["民族"]),
    ColumnSpec::new("education", &["文化程度"]),
    ColumnSpec::new("sentence_type", &["刑种"]),
    ColumnSpec::new("crime", &["罪名"]),
    ColumnSpec::new("original_term", &["原判刑期"]),
    ColumnSpec::new("term_start", &["现刑期起日"]),
    ColumnSpec::new("term_end", &["现刑期止日"]),
    ColumnSpec::new("start_date", &["禁闭起日"]),
    ColumnSpec::new("end_date", &["禁闭止日"]),
    ColumnSpec::new("clause", &["适用条款"]),
    ColumnSpec::new("violation", &["违规事实"]),
    ColumnSpec::new("status", &["业务状态"]),
];

const RESTRAINT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("create_date", &["制单时间"]),
    ColumnSpec::new("prison_unit", &["所属单位"]),
    ColumnSpec::new("prison_area", &["所属监区"]),
    ColumnSpec::new("name", &["姓名"]),
    ColumnSpec::new("prisoner_id", &["罪犯编号"]),
    ColumnSpec::new("restraint_name", &["戒具名称", "警戒具"]),
    ColumnSpec::new("clause", &["使用条款"]),
    ColumnSpec::new("days", &["天数"]),
    ColumnSpec::new("start_date", &["使用起日"]),
    ColumnSpec::new("end_date", &["使用止日"]),
    ColumnSpec::new("status", &["业务状态"]),
];

const MAIL_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("sequence", &["序号"]),
    ColumnSpec::new("open_date", &["开箱日期"]),
    ColumnSpec::new("prison_area", &["监区"]),
    ColumnSpec::new("name", &["罪犯", "姓名", "名字"]),
    ColumnSpec::new("reason", &["事由"]),
    ColumnSpec::new("category", &["类别"]),
    ColumnSpec::new("remarks", &["备注"]),
];

const BLACKLIST_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("sequence", &["序号"]),
    ColumnSpec::new("prisoner_id", &["罪犯编号"]),
    ColumnSpec::new("name", &["姓名"]),
    ColumnSpec::new("gender", &["性别"]),
    ColumnSpec::new("ethnicity", &["民族"]),
    ColumnSpec::new("birth_date", &["出生日期"]),
    ColumnSpec::new("native_place", &["籍贯", "国籍"]),
    ColumnSpec::new("political_status", &["捕前面貌"]),
    ColumnSpec::new("crime", &["原判罪名"]),
    ColumnSpec::new("original_term", &["原判刑期"]).excluding(&["起日", "止日"]),
    ColumnSpec::new("term_start", &["刑期起日"]),
    ColumnSpec::new("term_end", &["刑期止日"]),
    ColumnSpec::new("admission_date", &["入监日期"]),
    ColumnSpec::new("involvement_type", &["三涉"]),
    ColumnSpec::new("custody_status", &["在押现状"]),
    ColumnSpec::new("sentence_change", &["刑罚变动"]),
];

fn prisoner_id(row: &RowView<'_>) -> String {
    row.text("prisoner_id").unwrap_or_default()
}

fn status(row: &RowView<'_>) -> String {
    row.text("status")
        .unwrap_or_else(|| PENDING_STATUS.to_string())
}

fn full_profile(row: &RowView<'_>) -> PrisonerProfile {
    PrisonerProfile {
        prisoner_id: prisoner_id(row),
        name: row.text("name"),
        gender: row.text("gender"),
        birth_date: row.date("birth_date"),
        ethnicity: row.text("ethnicity"),
        education: row.text("education"),
        sentence_type: row.text("sentence_type"),
        crime: row.text("crime"),
        original_term: row.text("original_term"),
        term_start: row.date("term_start"),
        term_end: row.date("term_end"),
        prison_unit: row.text("prison_unit"),
        prison_area: row.text("prison_area"),
    }
}

/// Row holding the column labels of a blacklist sheet. These sheets may open
/// with a single merged title cell, in which case the labels are on row 2.
pub fn blacklist_header_row(grid: &Grid) -> usize {
    let Some(first) = grid.first() else {
        return 0;
    };
    let filled = first.iter().filter(|cell| !cell.is_empty()).count();
    let title = first.first().and_then(Cell::as_text).unwrap_or_default();
    if filled <= 1 && title.contains("涉黑恶") {
        1
    } else {
        0
    }
}

/// Map a grid whose kind is already known.
pub fn map_sheet(kind: SheetKind, grid: &Grid) -> SheetImport {
    let import = match kind {
        SheetKind::StrictEducation => {
            let rows = map_rows(grid, 0, STRICT_EDUCATION_COLUMNS, &["prisoner_id"], |row| {
                let record = StrictEducationRecord {
                    prisoner_id: prisoner_id(row),
                    create_date: row.date("create_date"),
                    applicable_clause: row.text("clause"),
                    reason: row.text("reason"),
                    days: row.count("days"),
                    start_date: row.date("start_date"),
                    end_date: row.date("end_date"),
                    status: status(row),
                };
                (full_profile(row), record)
            });
            let (prisoners, records) = rows.into_iter().unzip();
            SheetImport::StrictEducation { prisoners, records }
        }
        SheetKind::Confinement => {
            let rows = map_rows(grid, 0, CONFINEMENT_COLUMNS, &["prisoner_id"], |row| {
                let record = ConfinementRecord {
                    prisoner_id: prisoner_id(row),
                    create_date: row.date("create_date"),
                    start_date: row.date("start_date"),
                    end_date: row.date("end_date"),
                    applicable_clause: row.text("clause"),
                    violation_fact: row.text("violation"),
                    status: status(row),
                };
                (full_profile(row), record)
            });
            let (prisoners, records) = rows.into_iter().unzip();
            SheetImport::Confinement { prisoners, records }
        }
        SheetKind::Restraint => {
            let rows = map_rows(grid, 0, RESTRAINT_COLUMNS, &["prisoner_id"], |row| {
                let profile = PrisonerProfile {
                    prisoner_id: prisoner_id(row),
                    name: row.text("name"),
                    prison_unit: row.text("prison_unit"),
                    prison_area: row.text("prison_area"),
                    ..PrisonerProfile::default()
                };
                let record = RestraintRecord {
                    prisoner_id: prisoner_id(row),
                    create_date: row.date("create_date"),
                    restraint_name: row.text("restraint_name"),
                    applicable_clause: row.text("clause"),
                    days: row.count("days"),
                    start_date: row.date("start_date"),
                    end_date: row.date("end_date"),
                    status: status(row),
                };
                (profile, record)
            });
            let (prisoners, records) = rows.into_iter().unzip();
            SheetImport::Restraint { prisoners, records }
        }
        SheetKind::Mail => {
            // Letters often have no prisoner number, so either a name or a
            // sequence number is enough to keep the row.
            let records = map_rows(grid, 0, MAIL_COLUMNS, &["name", "sequence"], |row| MailRecord {
                sequence_no: row.count("sequence").unwrap_or(row.index as u32),
                open_date: row.date("open_date"),
                prison_area: row.text("prison_area"),
                prisoner_name: row.text("name"),
                reason: row.text("reason"),
                category: row.text("category"),
                remarks: row.text("remarks"),
            });
            SheetImport::Mail { records }
        }
        SheetKind::Blacklist => {
            let header_row = blacklist_header_row(grid);
            let records = map_rows(grid, header_row, BLACKLIST_COLUMNS, &["prisoner_id"], |row| {
                BlacklistRecord {
                    prisoner_id: prisoner_id(row),
                    name: row.text("name"),
                    gender: row.text("gender"),
                    ethnicity: row.text("ethnicity"),
                    birth_date: row.date("birth_date"),
                    native_place: row.text("native_place"),
                    political_status: row.text("political_status"),
                    crime: row.text("crime"),
                    original_term: row.text("original_term"),
                    term_start: row.date("term_start"),
                    term_end: row.date("term_end"),
                    admission_date: row.date("admission_date"),
                    involvement_type: row.text("involvement_type"),
                    custody_status: row.text("custody_status"),
                    sentence_change: row.text("sentence_change"),
                }
            });
            SheetImport::Blacklist { records }
        }
        SheetKind::Report => SheetImport::Report,
    };

    tracing::debug!(kind = ?kind, records = import.record_count(), "mapped sheet");
    import
}
