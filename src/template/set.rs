//! Templates resolved once at startup

use std::path::Path;

use super::error::TemplateError;
use super::package::DocxPackage;
use crate::config::TemplatePaths;

/// The configured Word templates, read and validated up front so a missing
/// or broken file is reported before any document is generated.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    report: Option<Vec<u8>>,
    daily_log: Option<Vec<u8>>,
    checklist: Option<Vec<u8>>,
}

fn load_template(path: Option<&Path>) -> Result<Option<Vec<u8>>, TemplateError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let package = DocxPackage::open(path)?;
    let bytes = package.into_bytes()?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded template");
    Ok(Some(bytes))
}

impl TemplateSet {
    pub fn load(paths: &TemplatePaths) -> Result<Self, TemplateError> {
        Ok(Self {
            report: load_template(paths.report.as_deref())?,
            daily_log: load_template(paths.daily_log.as_deref())?,
            checklist: load_template(paths.checklist.as_deref())?,
        })
    }

    pub fn report(&self) -> Option<&[u8]> {
        self.report.as_deref()
    }

    pub fn daily_log(&self) -> Option<&[u8]> {
        self.daily_log.as_deref()
    }

    pub fn checklist(&self) -> Option<&[u8]> {
        self.checklist.as_deref()
    }
}
