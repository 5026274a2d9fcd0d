//! Word template filling
//!
//! Two substitution styles are supported. The monthly work report uses
//! numbered tokens (`{1}`..`{59}`) replaced directly in the document XML;
//! the daily log and checklist use named tags that may be split across
//! formatting runs. A document whose template is missing or cannot be
//! rendered is produced by a plain generator instead; immediate-event
//! reports are always generated that way.

pub mod error;
pub(crate) mod event;
pub(crate) mod fallback;
pub(crate) mod named;
pub(crate) mod numbered;
pub mod package;
pub(crate) mod set;
pub mod slots;

pub use error::{TagIssue, TagIssueKind, TemplateError};
pub use event::{build_immediate_event_document, event_file_name};
pub use fallback::{
    build_fallback_checklist_document, build_fallback_log_document,
    build_fallback_report_document, render_checklist, render_daily_log, render_monthly_report,
};
pub use named::{
    fill_named_template, find_named_tags, substitute_named, FillOptions, MissingValue, NamedValues,
};
pub use numbered::{
    fill_numbered_template, find_numbered_tokens, numbered_token, substitute_numbered, SlotMap,
};
pub use package::DocxPackage;
pub use set::TemplateSet;
pub use slots::{
    build_monthly_report_slots, slot_spec, MonthlyReportInputs, PeriodSource, ReportField,
    ResolverChain, SlotDefault, SlotSource, SlotSpec, SlotValue, MONTHLY_REPORT_SLOTS,
};
