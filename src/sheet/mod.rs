//! Spreadsheet row-to-record mapping
//!
//! Business exports (approvals, mail logs, watch lists) are read from the
//! first worksheet, recognised by file name or header keywords, and mapped
//! row by row into typed records through ordered column tables.

pub(crate) mod columns;
pub mod error;
pub(crate) mod grid;
pub(crate) mod kinds;
pub(crate) mod workbook;

pub use columns::{bind_columns, map_rows, ColumnBinding, ColumnSpec, RowView};
pub use error::SheetError;
pub use grid::{excel_serial_date, parse_cell_date, read_first_sheet, Cell, Grid};
pub use kinds::{
    blacklist_header_row, detect_sheet_kind, map_sheet, BlacklistRecord, ConfinementRecord,
    MailRecord, PrisonerProfile, RestraintRecord, SheetImport, SheetKind, StrictEducationRecord,
    PENDING_STATUS,
};
pub use workbook::{import_grid, import_workbook};
