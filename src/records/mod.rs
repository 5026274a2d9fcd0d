//! Inspection records and the values derived from them
//!
//! Request handlers load a month of daily logs, weekly and monthly records
//! and immediate events; this module turns them into activity counts, the
//! daily-log template values and the monthly checklist.

pub(crate) mod checklist;
pub(crate) mod daily_log;
pub mod models;
pub(crate) mod stats;

pub use checklist::{
    build_checklist, checklist_values, ChecklistItem, Frequency, CHECKLIST, CHECKLIST_ITEMS,
    DEFAULT_PRISON_NAME,
};
pub use daily_log::{daily_log_values, format_log_date, other_supervision, scene_locations};
pub use models::*;
pub use stats::calculate_stats;
