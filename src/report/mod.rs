//! Statistics extraction from monthly prison situation reports
//!
//! Reports arrive as Word documents written from a common outline. The
//! extractor applies one label-anchored rule per statistic, derives incident
//! flags from canned sentences and collects case narratives into a
//! [`ReportStatistics`] value.

pub(crate) mod extractor;
pub(crate) mod loader;
pub mod models;
pub mod patterns;
pub(crate) mod summary;

pub use extractor::{detect_security_flags, extract_preventive_measures, parse_report_text};
pub use loader::{docx_to_text, load_report_text, parse_report_file};
pub use models::*;
pub use summary::generate_summary;
