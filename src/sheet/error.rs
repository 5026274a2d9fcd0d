//! Spreadsheet import errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("sheet is empty or only has a header row")]
    Empty,

    #[error("cannot tell what kind of sheet \"{file_name}\" is")]
    UnknownKind { file_name: String },
}
