//! Data structures produced by the report extractor
//!
//! Every count is an `Option`: `None` means the label was not found in the
//! text, which is different from a reported zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub prison: Option<String>,
    pub period: Option<u32>,
    pub month: Option<u32>,
    pub report_date: Option<NaiveDate>,
    pub security: SecurityFlags,
    pub discipline: DisciplineCounts,
    pub prisoners: PrisonerComposition,
    pub preventive_measures: Vec<PreventiveMeasure>,
    pub sections: RawSections,
}

/// Incident flags derived from the absence of canned negative sentences.
///
/// A flag is `true` unless the report contains the exact sentence ruling the
/// incident out, so a reworded sentence reads as an incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFlags {
    pub has_escape: bool,
    pub has_major_case: bool,
    pub has_safety_accident: bool,
    pub has_health_event: bool,
    pub has_internal_case: bool,
    pub has_premeditated_case: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineCounts {
    pub violation_count: Option<u32>,
    pub confinement_count: Option<u32>,
    pub warning_count: Option<u32>,
    pub dismissed_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerComposition {
    pub total: Option<u32>,
    pub major_criminal: Option<u32>,
    pub death_suspended: Option<u32>,
    pub life_sentence: Option<u32>,
    pub multiple_convictions: Option<u32>,
    pub foreign: Option<u32>,
    pub hong_kong_macao_taiwan: Option<u32>,
    pub mental_illness: Option<u32>,
    pub former_provincial: Option<u32>,
    pub former_county: Option<u32>,
    pub falun_gong: Option<u32>,
    pub drug_history: Option<u32>,
    pub drug_related: Option<u32>,
    pub newly_admitted: Option<u32>,
    pub juvenile_female: Option<u32>,
    pub gang_related: Option<u32>,
    pub evil_related: Option<u32>,
    pub dangerous_security: Option<u32>,
}

/// A prisoner case narrative from the "preventive measures" part of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreventiveMeasure {
    pub area: String,
    pub name: String,
    pub gender: String,
    pub age: Option<u32>,
    pub origin: String,
    pub crime: String,
    pub original_sentence: String,
    pub remaining_sentence: String,
    pub measure: String,
}

/// Verbatim text of the four numbered report sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSections {
    pub security: Option<String>,
    pub features: Option<String>,
    pub overall: Option<String>,
    pub measures: Option<String>,
}

impl RawSections {
    pub(crate) fn slot_mut(&mut self, section: ReportSection) -> &mut Option<String> {
        match section {
            ReportSection::Security => &mut self.security,
            ReportSection::Features => &mut self.features,
            ReportSection::Overall => &mut self.overall,
            ReportSection::Measures => &mut self.measures,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    Security,
    Features,
    Overall,
    Measures,
}
