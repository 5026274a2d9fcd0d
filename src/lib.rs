//! dossier: statistics extraction and Word template filling for
//! prison-inspection reports
//!
//! The library reads monthly situation reports into structured statistics,
//! fills the monthly work report, daily log and checklist templates, and
//! maps business spreadsheets into typed records.

pub mod config;
pub mod records;
pub mod report;
pub mod sheet;
pub mod template;

/// Output format for extracted report statistics
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Human-readable digest
    Summary,
}

// Re-export commonly used types
pub use config::Config;
pub use records::{ArchivePeriod, DailyLog, RecordBundle};
pub use report::{parse_report_text, ReportStatistics};
pub use sheet::{SheetImport, SheetKind};
pub use template::{SlotMap, TemplateError, TemplateSet};
