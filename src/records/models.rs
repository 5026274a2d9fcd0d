//! Inspection records assembled by request handlers
//!
//! Top-level record fields use the database column names; nested JSON
//! columns keep the camelCase keys the entry forms write. Every field has a
//! default so partially filled records deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting unit and period a document is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivePeriod {
    pub prison_name: String,
    pub year: i32,
    pub month: u32,
}

impl ArchivePeriod {
    /// Period key in `YYYY-MM` form.
    pub fn report_month(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Parse a `YYYY-MM` key.
    pub fn from_report_month(prison_name: &str, report_month: &str) -> Option<Self> {
        let (year, month) = report_month.trim().split_once('-')?;
        let year = year.parse().ok()?;
        let month = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            prison_name: prison_name.to_string(),
            year,
            month,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        date.year() == self.year && date.month() == self.month
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyLog {
    pub log_date: Option<NaiveDate>,
    pub prison_name: String,
    pub inspector_name: String,
    pub three_scenes: ThreeScenes,
    pub strict_control: StrictControl,
    pub police_equipment: PoliceEquipment,
    pub gang_prisoners: RunningCount,
    pub admission: Admission,
    pub monitor_check: MonitorCheck,
    pub supervision_situation: String,
    pub feedback_situation: String,
    pub other_work: OtherWork,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeScenes {
    pub labor: SceneCheck,
    pub living: SceneCheck,
    pub study: SceneCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCheck {
    pub checked: bool,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrictControl {
    pub new_count: u32,
    pub confinement_new: u32,
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliceEquipment {
    pub checked: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunningCount {
    pub new_count: u32,
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Admission {
    pub in_count: u32,
    pub out_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorCheck {
    pub checked: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OtherWork {
    pub supervision_situation: String,
    pub feedback_situation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyRecord {
    pub record_date: Option<NaiveDate>,
    pub week_start_date: Option<NaiveDate>,
    pub hospital_check: HospitalCheck,
    pub talk_records: Vec<TalkRecord>,
    pub mailbox: Mailbox,
    pub contraband: Contraband,
}

impl WeeklyRecord {
    /// Date the record is filed under: the record date, else the week start.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.record_date.or(self.week_start_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HospitalCheck {
    pub checked: bool,
    pub hospital_checked: bool,
    pub confinement_checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalkRecord {
    #[serde(rename = "type", default)]
    pub kind: TalkKind,
    #[serde(default)]
    pub prisoner_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TalkKind {
    NewPrisoner,
    Evil,
    Injury,
    Confinement,
    Release,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mailbox {
    pub open_count: u32,
    pub received_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contraband {
    pub checked: bool,
    pub found: bool,
    pub found_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyRecord {
    pub record_date: Option<NaiveDate>,
    pub record_month: String,
    pub visit_check: VisitCheck,
    pub dangerous_check: DangerousCheck,
    pub meeting: Meeting,
    pub punishment: Punishment,
    pub position_stats: Option<PositionStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitCheck {
    pub checked: bool,
    pub visit_count: u32,
    pub illegal_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerousCheck {
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meeting {
    pub participated: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Punishment {
    pub exists: bool,
    pub record_count: u32,
    pub confinement_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionStats {
    pub miscellaneous_increase: u32,
    pub production_increase: u32,
    pub miscellaneous_decrease: u32,
    pub production_decrease: u32,
}

/// An event that required an immediate inspection (escape, death, ...).
///
/// `event_type` is either one of the form keys (`escape`, `death`, ...) or
/// free Chinese text from older records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmediateEvent {
    pub event_date: Option<NaiveDate>,
    pub event_type: String,
    pub title: String,
    pub description: String,
    pub status: EventStatus,
    pub prison_name: String,
    pub parole_data: Option<ParoleData>,
}

/// Form keys and the names reports print for them.
const EVENT_TYPES: [(&str, &str, &str); 7] = [
    ("escape", "罪犯脱逃事件", "脱逃"),
    ("selfHarm", "罪犯自伤自残事件", "自伤自残"),
    ("death", "罪犯死亡事件", "死亡"),
    ("epidemic", "重大疫情事件", "重大疫情"),
    ("accident", "重大生产安全事故", "安全事故"),
    ("paroleRequest", "减刑假释申请", "减刑假释"),
    ("disciplinaryAction", "民警纪律处分", "民警处分"),
];

impl ImmediateEvent {
    /// Report heading for the event type, `及时检察事件` when unknown.
    pub fn type_name(&self) -> &str {
        EVENT_TYPES
            .iter()
            .find(|(key, ..)| *key == self.event_type)
            .map_or("及时检察事件", |&(_, name, _)| name)
    }

    /// Event type as matched against checklist categories: the report name
    /// for form keys, the stored text otherwise.
    pub fn type_label(&self) -> &str {
        EVENT_TYPES
            .iter()
            .find(|(key, ..)| *key == self.event_type)
            .map_or(self.event_type.as_str(), |&(_, name, _)| name)
    }

    /// Short type name used in file names, `未分类` when unknown.
    pub fn short_type_name(&self) -> &str {
        EVENT_TYPES
            .iter()
            .find(|(key, ..)| *key == self.event_type)
            .map_or("未分类", |&(.., short)| short)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Processed,
    #[serde(other)]
    Closed,
}

impl EventStatus {
    pub fn label(self) -> &'static str {
        match self {
            EventStatus::Pending => "待处理",
            EventStatus::Processed => "已处理",
            EventStatus::Closed => "已关闭",
        }
    }
}

/// Sentence-reduction and parole batch attached to a `paroleRequest` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParoleData {
    pub batch: String,
    pub count: u32,
    pub stage: String,
}

impl ParoleData {
    /// Stage name for the stage key; unknown keys are shown as entered.
    pub fn stage_name(&self) -> &str {
        match self.stage.as_str() {
            "review" => "审查阶段",
            "publicize" => "公示阶段",
            "submitted" => "已提交",
            "approved" => "已通过",
            other => other,
        }
    }
}

/// The manually curated monthly record. Zero and empty mean "not entered".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyBasicInfo {
    pub prison_name: String,
    pub report_month: String,
    // Prisoner composition
    pub total_prisoners: u32,
    pub major_criminals: u32,
    pub death_sentence: u32,
    pub life_sentence: u32,
    pub repeat_offenders: u32,
    pub foreign_prisoners: u32,
    pub hk_macao_taiwan: u32,
    pub mental_illness: u32,
    pub former_officials: u32,
    pub former_county_level: u32,
    pub falun_gong: u32,
    pub drug_history: u32,
    pub drug_crimes: u32,
    pub new_admissions: u32,
    pub minor_females: u32,
    pub gang_related: u32,
    pub evil_forces: u32,
    pub endangering_safety: u32,
    pub released_count: u32,
    // Discipline
    pub recorded_punishments: u32,
    pub recorded_punishments_reason: String,
    pub confinement_punishments: u32,
    pub confinement_reason: String,
    pub letters_received: u32,
    // Law enforcement
    pub parole_batch: String,
    pub parole_count: u32,
    pub parole_stage: String,
    pub correction_notices: u32,
    pub correction_issues: String,
    pub three_scene_checks: u32,
    pub key_location_checks: u32,
    pub visit_checks: u32,
    pub visit_illegal_count: u32,
    // Security
    pub monitor_checks: u32,
    pub issues_found: u32,
    // Talks
    pub total_talks: u32,
    pub new_admission_talks: u32,
    pub evil_forces_talks: u32,
    pub injury_talks: u32,
    pub confinement_talks: u32,
    pub questionnaire_count: u32,
    // Meetings
    pub life_sentence_reviews: u32,
    pub analysis_meetings: u32,
    pub other_activities: String,
    pub mailbox_opens: u32,
}

/// One row of the monthly checklist as edited on the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistEntry {
    pub id: u32,
    pub content: String,
    pub situation: String,
}

/// Activity counts aggregated from a month of daily, weekly and monthly records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionStats {
    pub three_scene_checks: u32,
    pub monitor_checks: u32,
    pub key_location_checks: u32,
    pub total_talks: u32,
    pub new_admission_talks: u32,
    pub evil_talks: u32,
    pub injury_talks: u32,
    pub confinement_talks: u32,
    pub mailbox_opens: u32,
    pub letters_received: u32,
    pub visit_checks: u32,
}

/// A month of records, as loaded from a JSON export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordBundle {
    pub daily_logs: Vec<DailyLog>,
    pub weekly_records: Vec<WeeklyRecord>,
    pub monthly_records: Vec<MonthlyRecord>,
    pub immediate_events: Vec<ImmediateEvent>,
}

impl RecordBundle {
    /// Records dated within `period`. Monthly records without a date are
    /// matched on their `YYYY-MM` key.
    pub fn for_period(&self, period: &ArchivePeriod) -> RecordBundle {
        let within = |date: Option<NaiveDate>| date.is_some_and(|d| period.contains(d));
        let month_key = period.report_month();

        RecordBundle {
            daily_logs: self
                .daily_logs
                .iter()
                .filter(|log| within(log.log_date))
                .cloned()
                .collect(),
            weekly_records: self
                .weekly_records
                .iter()
                .filter(|record| within(record.effective_date()))
                .cloned()
                .collect(),
            monthly_records: self
                .monthly_records
                .iter()
                .filter(|record| match record.record_date {
                    Some(date) => period.contains(date),
                    None => record.record_month == month_key,
                })
                .cloned()
                .collect(),
            immediate_events: self
                .immediate_events
                .iter()
                .filter(|event| within(event.event_date))
                .cloned()
                .collect(),
        }
    }
}
