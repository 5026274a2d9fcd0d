//! Slot value resolution for the monthly report
//!
//! Each numbered slot names a [`ReportField`]. Values come from an ordered
//! chain of sources; the first source holding a non-default value for the
//! field wins, otherwise the slot's own default is used. A zero or an empty
//! string never shadows a later source.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::TemplateError;
use super::numbered::SlotMap;
use crate::records::{ArchivePeriod, InspectionStats, MonthlyBasicInfo};
use crate::report::ReportStatistics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Number(i64),
    Text(String),
}

impl SlotValue {
    pub fn text(value: impl Into<String>) -> Self {
        SlotValue::Text(value.into())
    }

    /// Zero and the empty string count as "no value".
    pub fn is_default(&self) -> bool {
        match self {
            SlotValue::Number(n) => *n == 0,
            SlotValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Number(n) => write!(f, "{n}"),
            SlotValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for SlotValue {
    fn from(value: u32) -> Self {
        SlotValue::Number(i64::from(value))
    }
}

impl From<i32> for SlotValue {
    fn from(value: i32) -> Self {
        SlotValue::Number(i64::from(value))
    }
}

impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        SlotValue::Text(value.to_string())
    }
}

/// Every value the monthly report template can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    PrisonName,
    Year,
    Month,
    GenerationDay,
    TotalPrisoners,
    MajorCriminals,
    DeathSentence,
    LifeSentence,
    RepeatOffenders,
    ForeignPrisoners,
    HkMacaoTaiwan,
    MentalIllness,
    FormerOfficials,
    FormerCountyLevel,
    FalunGong,
    DrugHistory,
    DrugCrimes,
    NewAdmissions,
    MinorFemales,
    GangRelated,
    EvilForces,
    EndangeringSafety,
    ReleasedCount,
    RecordedPunishments,
    RecordedPunishmentsReason,
    ConfinementPunishments,
    ConfinementReason,
    ParoleBatch,
    ParoleCount,
    ParoleStage,
    CorrectionIssues,
    CorrectionNotices,
    ThreeSceneChecks,
    KeyLocationChecks,
    VisitChecks,
    VisitIllegalCount,
    MonitorChecks,
    IssuesFound,
    TotalTalks,
    NewAdmissionTalks,
    EvilForcesTalks,
    InjuryTalks,
    ConfinementTalks,
    QuestionnaireCount,
    LifeSentenceReviews,
    AnalysisMeetings,
    OtherActivities,
    MailboxOpens,
    LettersReceived,
}

/// A source of report values, consulted by field.
pub trait SlotSource {
    fn name(&self) -> &str;
    fn lookup(&self, field: ReportField) -> Option<SlotValue>;
}

/// Ordered list of sources; earlier sources take priority.
#[derive(Default)]
pub struct ResolverChain<'a> {
    sources: Vec<&'a dyn SlotSource>,
}

impl<'a> ResolverChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: &'a dyn SlotSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_optional<S: SlotSource>(mut self, source: Option<&'a S>) -> Self {
        if let Some(source) = source {
            self.sources.push(source);
        }
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First non-default value and the name of the source it came from.
    pub fn resolve(&self, field: ReportField) -> Option<(&str, SlotValue)> {
        self.sources.iter().find_map(|source| {
            source
                .lookup(field)
                .filter(|value| !value.is_default())
                .map(|value| (source.name(), value))
        })
    }

    pub fn resolve_or(&self, field: ReportField, default: SlotValue) -> SlotValue {
        self.resolve(field).map_or(default, |(_, value)| value)
    }
}

/// Default shown when no source has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDefault {
    Zero,
    Text(&'static str),
}

impl SlotDefault {
    pub fn value(self) -> SlotValue {
        match self {
            SlotDefault::Zero => SlotValue::Number(0),
            SlotDefault::Text(text) => SlotValue::text(text),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub index: u32,
    pub field: ReportField,
    pub label: &'static str,
    pub default: SlotDefault,
}

const fn slot(index: u32, field: ReportField, label: &'static str, default: SlotDefault) -> SlotSpec {
    SlotSpec {
        index,
        field,
        label,
        default,
    }
}

use ReportField as F;
use SlotDefault::{Text, Zero};

/// Layout of the monthly work report template, `{1}` through `{59}`.
pub const MONTHLY_REPORT_SLOTS: [SlotSpec; 59] = [
    slot(1, F::PrisonName, "派驻单位", Text("监狱")),
    slot(2, F::Year, "年份", Zero),
    slot(3, F::Month, "月份", Zero),
    slot(4, F::TotalPrisoners, "在押罪犯总数", Zero),
    slot(5, F::MajorCriminals, "重大刑事犯", Zero),
    slot(6, F::DeathSentence, "死缓犯", Zero),
    slot(7, F::LifeSentence, "无期犯", Zero),
    slot(8, F::RepeatOffenders, "二次以上判刑罪犯", Zero),
    slot(9, F::ForeignPrisoners, "外籍犯", Zero),
    slot(10, F::HkMacaoTaiwan, "港澳台罪犯", Zero),
    slot(11, F::MentalIllness, "精神病犯", Zero),
    slot(12, F::FormerOfficials, "原地厅以上罪犯", Zero),
    slot(13, F::FormerCountyLevel, "原县团级以上罪犯", Zero),
    slot(14, F::FalunGong, "法轮功", Zero),
    slot(15, F::DrugHistory, "有吸毒史罪犯", Zero),
    slot(16, F::DrugCrimes, "涉毒犯", Zero),
    slot(17, F::NewAdmissions, "新收押罪犯", Zero),
    slot(18, F::MinorFemales, "未成年女犯", Zero),
    slot(19, F::GangRelated, "涉黑罪犯", Zero),
    slot(20, F::EvilForces, "涉恶罪犯", Zero),
    slot(21, F::EndangeringSafety, "危安罪犯", Zero),
    slot(22, F::NewAdmissions, "新收押罪犯", Zero),
    slot(23, F::ReleasedCount, "刑满释放出监罪犯", Zero),
    slot(24, F::RecordedPunishments, "记过人数", Zero),
    slot(25, F::RecordedPunishmentsReason, "记过原因", Text("无")),
    slot(26, F::ConfinementPunishments, "禁闭人数", Zero),
    slot(27, F::ConfinementReason, "禁闭原因", Text("无")),
    slot(28, F::PrisonName, "派驻单位", Text("监狱")),
    slot(29, F::ParoleBatch, "减刑批次", Zero),
    slot(30, F::ParoleCount, "减刑案件数量", Zero),
    slot(31, F::ParoleStage, "减刑阶段", Zero),
    slot(32, F::NewAdmissions, "新收押罪犯", Zero),
    slot(33, F::ReleasedCount, "刑满释放出监罪犯", Zero),
    slot(34, F::PrisonName, "派驻单位", Text("监狱")),
    slot(35, F::ParoleBatch, "减刑批次", Zero),
    slot(36, F::CorrectionIssues, "纠正违法问题描述", Text("无")),
    slot(37, F::CorrectionNotices, "纠正违法通知书份数", Zero),
    slot(38, F::ThreeSceneChecks, "三大现场检察次数", Zero),
    slot(39, F::KeyLocationChecks, "重点场所检察次数", Zero),
    slot(40, F::VisitChecks, "会见检察次数", Zero),
    slot(41, F::VisitIllegalCount, "会见发现违法问题数", Zero),
    slot(42, F::MonitorChecks, "监控检察次数", Zero),
    slot(43, F::IssuesFound, "安全防范发现问题数", Zero),
    slot(44, F::TotalTalks, "个别教育谈话总数", Zero),
    slot(45, F::NewAdmissionTalks, "新收押罪犯谈话人数", Zero),
    slot(46, F::EvilForcesTalks, "涉恶罪犯谈话人数", Zero),
    slot(47, F::InjuryTalks, "外伤罪犯谈话人数", Zero),
    slot(48, F::ConfinementTalks, "禁闭罪犯谈话人数", Zero),
    slot(49, F::QuestionnaireCount, "出监问卷调查表份数", Zero),
    slot(50, F::LifeSentenceReviews, "无期死缓评审会次数", Zero),
    slot(51, F::ParoleBatch, "减刑批次", Zero),
    slot(52, F::AnalysisMeetings, "犯情分析会次数", Zero),
    slot(53, F::OtherActivities, "参加其他活动名称", Text("日常")),
    slot(54, F::MailboxOpens, "开启检察官信箱次数", Zero),
    slot(55, F::LettersReceived, "收到信件数量", Zero),
    slot(56, F::PrisonName, "派驻单位", Text("监狱")),
    slot(57, F::Year, "年份", Zero),
    slot(58, F::Month, "月份", Zero),
    slot(59, F::GenerationDay, "落款日期", Zero),
];

pub fn slot_spec(index: u32) -> Option<&'static SlotSpec> {
    MONTHLY_REPORT_SLOTS.iter().find(|spec| spec.index == index)
}

/// Resolve every slot of the monthly report template.
pub fn build_monthly_report_slots(chain: &ResolverChain<'_>) -> SlotMap {
    let mut slots = SlotMap::new();
    for spec in &MONTHLY_REPORT_SLOTS {
        let value = chain.resolve_or(spec.field, spec.default.value());
        slots.insert_escaped(spec.index, &value.to_string());
    }
    slots
}

/// Unit and period the report is generated for, plus the signing day.
#[derive(Debug, Clone)]
pub struct PeriodSource {
    pub period: ArchivePeriod,
    pub day: u32,
}

impl SlotSource for PeriodSource {
    fn name(&self) -> &str {
        "period"
    }

    fn lookup(&self, field: ReportField) -> Option<SlotValue> {
        match field {
            F::PrisonName => Some(SlotValue::text(self.period.prison_name.as_str())),
            F::Year => Some(self.period.year.into()),
            F::Month => Some(self.period.month.into()),
            F::GenerationDay => Some(self.day.into()),
            _ => None,
        }
    }
}

impl SlotSource for MonthlyBasicInfo {
    fn name(&self) -> &str {
        "manual"
    }

    fn lookup(&self, field: ReportField) -> Option<SlotValue> {
        let value: SlotValue = match field {
            F::PrisonName | F::Year | F::Month | F::GenerationDay => return None,
            F::TotalPrisoners => self.total_prisoners.into(),
            F::MajorCriminals => self.major_criminals.into(),
            F::DeathSentence => self.death_sentence.into(),
            F::LifeSentence => self.life_sentence.into(),
            F::RepeatOffenders => self.repeat_offenders.into(),
            F::ForeignPrisoners => self.foreign_prisoners.into(),
            F::HkMacaoTaiwan => self.hk_macao_taiwan.into(),
            F::MentalIllness => self.mental_illness.into(),
            F::FormerOfficials => self.former_officials.into(),
            F::FormerCountyLevel => self.former_county_level.into(),
            F::FalunGong => self.falun_gong.into(),
            F::DrugHistory => self.drug_history.into(),
            F::DrugCrimes => self.drug_crimes.into(),
            F::NewAdmissions => self.new_admissions.into(),
            F::MinorFemales => self.minor_females.into(),
            F::GangRelated => self.gang_related.into(),
            F::EvilForces => self.evil_forces.into(),
            F::EndangeringSafety => self.endangering_safety.into(),
            F::ReleasedCount => self.released_count.into(),
            F::RecordedPunishments => self.recorded_punishments.into(),
            F::RecordedPunishmentsReason => self.recorded_punishments_reason.as_str().into(),
            F::ConfinementPunishments => self.confinement_punishments.into(),
            F::ConfinementReason => self.confinement_reason.as_str().into(),
            F::ParoleBatch => self.parole_batch.as_str().into(),
            F::ParoleCount => self.parole_count.into(),
            F::ParoleStage => self.parole_stage.as_str().into(),
            F::CorrectionIssues => self.correction_issues.as_str().into(),
            F::CorrectionNotices => self.correction_notices.into(),
            F::ThreeSceneChecks => self.three_scene_checks.into(),
            F::KeyLocationChecks => self.key_location_checks.into(),
            F::VisitChecks => self.visit_checks.into(),
            F::VisitIllegalCount => self.visit_illegal_count.into(),
            F::MonitorChecks => self.monitor_checks.into(),
            F::IssuesFound => self.issues_found.into(),
            F::TotalTalks => self.total_talks.into(),
            F::NewAdmissionTalks => self.new_admission_talks.into(),
            F::EvilForcesTalks => self.evil_forces_talks.into(),
            F::InjuryTalks => self.injury_talks.into(),
            F::ConfinementTalks => self.confinement_talks.into(),
            F::QuestionnaireCount => self.questionnaire_count.into(),
            F::LifeSentenceReviews => self.life_sentence_reviews.into(),
            F::AnalysisMeetings => self.analysis_meetings.into(),
            F::OtherActivities => self.other_activities.as_str().into(),
            F::MailboxOpens => self.mailbox_opens.into(),
            F::LettersReceived => self.letters_received.into(),
        };
        Some(value)
    }
}

impl SlotSource for ReportStatistics {
    fn name(&self) -> &str {
        "parsed report"
    }

    fn lookup(&self, field: ReportField) -> Option<SlotValue> {
        let p = &self.prisoners;
        let count = match field {
            F::TotalPrisoners => p.total,
            F::MajorCriminals => p.major_criminal,
            F::DeathSentence => p.death_suspended,
            F::LifeSentence => p.life_sentence,
            F::RepeatOffenders => p.multiple_convictions,
            F::ForeignPrisoners => p.foreign,
            F::HkMacaoTaiwan => p.hong_kong_macao_taiwan,
            F::MentalIllness => p.mental_illness,
            F::FormerOfficials => p.former_provincial,
            F::FormerCountyLevel => p.former_county,
            F::FalunGong => p.falun_gong,
            F::DrugHistory => p.drug_history,
            F::DrugCrimes => p.drug_related,
            F::NewAdmissions => p.newly_admitted,
            F::MinorFemales => p.juvenile_female,
            F::GangRelated => p.gang_related,
            F::EvilForces => p.evil_related,
            F::EndangeringSafety => p.dangerous_security,
            F::RecordedPunishments => self.discipline.violation_count,
            F::ConfinementPunishments => self.discipline.confinement_count,
            _ => None,
        };
        count.map(SlotValue::from)
    }
}

impl SlotSource for InspectionStats {
    fn name(&self) -> &str {
        "inspection records"
    }

    fn lookup(&self, field: ReportField) -> Option<SlotValue> {
        let count = match field {
            F::ThreeSceneChecks => self.three_scene_checks,
            F::KeyLocationChecks => self.key_location_checks,
            F::VisitChecks => self.visit_checks,
            F::MonitorChecks => self.monitor_checks,
            F::TotalTalks => self.total_talks,
            F::NewAdmissionTalks => self.new_admission_talks,
            F::EvilForcesTalks => self.evil_talks,
            F::InjuryTalks => self.injury_talks,
            F::ConfinementTalks => self.confinement_talks,
            F::MailboxOpens => self.mailbox_opens,
            F::LettersReceived => self.letters_received,
            _ => return None,
        };
        Some(count.into())
    }
}

/// Everything the monthly report draws on, in priority order: the period
/// itself, the manual monthly record, the parsed situation report and the
/// counts aggregated from inspection records.
#[derive(Debug, Clone)]
pub struct MonthlyReportInputs {
    period: PeriodSource,
    manual: Option<MonthlyBasicInfo>,
    parsed: Option<ReportStatistics>,
    activity: Option<InspectionStats>,
}

impl MonthlyReportInputs {
    /// Collect the sources for one report.
    ///
    /// A manual record must carry the same `YYYY-MM` key and unit as the
    /// period, and a parsed report the same month. Blank fields are not
    /// checked. Report titles carry the province, so a parsed unit only has
    /// to contain the period's unit (or the other way round).
    pub fn new(
        period: PeriodSource,
        manual: Option<MonthlyBasicInfo>,
        parsed: Option<ReportStatistics>,
        activity: Option<InspectionStats>,
    ) -> Result<Self, TemplateError> {
        let target = &period.period;
        let unit = target.prison_name.trim();

        if let Some(manual) = &manual {
            let month = manual.report_month.trim();
            if !month.is_empty() && month != target.report_month() {
                return Err(TemplateError::mismatch("manual", target.report_month(), month));
            }
            let prison = manual.prison_name.trim();
            if !prison.is_empty() && !unit.is_empty() && prison != unit {
                return Err(TemplateError::mismatch("manual", unit, prison));
            }
        }

        if let Some(parsed) = &parsed {
            if let Some(month) = parsed.month.filter(|m| *m != target.month) {
                return Err(TemplateError::mismatch(
                    "parsed report",
                    format!("{}月", target.month),
                    format!("{month}月"),
                ));
            }
            let prison = parsed.prison.as_deref().map_or("", str::trim);
            if !prison.is_empty()
                && !unit.is_empty()
                && !prison.contains(unit)
                && !unit.contains(prison)
            {
                return Err(TemplateError::mismatch("parsed report", unit, prison));
            }
        }

        Ok(Self {
            period,
            manual,
            parsed,
            activity,
        })
    }

    pub fn period(&self) -> &ArchivePeriod {
        &self.period.period
    }

    pub fn activity(&self) -> Option<&InspectionStats> {
        self.activity.as_ref()
    }

    pub fn chain(&self) -> ResolverChain<'_> {
        ResolverChain::new()
            .with_source(&self.period)
            .with_optional(self.manual.as_ref())
            .with_optional(self.parsed.as_ref())
            .with_optional(self.activity.as_ref())
    }

    pub fn slots(&self) -> SlotMap {
        let chain = self.chain();
        tracing::debug!(sources = ?chain.source_names(), "resolving monthly report slots");
        build_monthly_report_slots(&chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_table_is_complete_and_ordered() {
        for (position, spec) in MONTHLY_REPORT_SLOTS.iter().enumerate() {
            assert_eq!(spec.index, position as u32 + 1);
        }
        assert_eq!(slot_spec(55).map(|s| s.field), Some(ReportField::LettersReceived));
        assert!(slot_spec(60).is_none());
    }

    #[test]
    fn test_slot_value_defaults() {
        assert!(SlotValue::Number(0).is_default());
        assert!(SlotValue::text("  ").is_default());
        assert!(!SlotValue::text("无").is_default());
        assert_eq!(SlotValue::Number(40).to_string(), "40");
    }

    #[test]
    fn test_empty_chain_uses_slot_defaults() {
        let slots = build_monthly_report_slots(&ResolverChain::new());
        assert_eq!(slots.len(), 59);
        assert_eq!(slots.get(1), Some("监狱"));
        assert_eq!(slots.get(25), Some("无"));
        assert_eq!(slots.get(53), Some("日常"));
        assert_eq!(slots.get(55), Some("0"));
    }
}
