//! Whole-file import

use std::path::Path;

use super::error::SheetError;
use super::grid::{read_first_sheet, Grid};
use super::kinds::{detect_sheet_kind, map_sheet, SheetImport, SheetKind};

/// Detect and map a grid read from a file called `file_name`.
pub fn import_grid(
    grid: &Grid,
    file_name: &str,
    kind: Option<SheetKind>,
) -> Result<SheetImport, SheetError> {
    if grid.len() <= 1 {
        return Err(SheetError::Empty);
    }

    let kind = match kind {
        Some(kind) => kind,
        None => detect_sheet_kind(file_name, &grid[0]).ok_or_else(|| SheetError::UnknownKind {
            file_name: file_name.to_string(),
        })?,
    };
    Ok(map_sheet(kind, grid))
}

/// Import the first worksheet of a workbook. The kind is detected from
/// `file_name` (the upload's original name, when it differs from `path`)
/// unless given explicitly.
pub fn import_workbook(
    path: &Path,
    file_name: Option<&str>,
    kind: Option<SheetKind>,
) -> Result<SheetImport, SheetError> {
    let grid = read_first_sheet(path)?;
    let file_name = file_name
        .map(str::to_string)
        .or_else(|| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let import = import_grid(&grid, &file_name, kind)?;
    tracing::info!(
        file = %file_name,
        kind = ?import.kind(),
        records = import.record_count(),
        "imported sheet"
    );
    Ok(import)
}
