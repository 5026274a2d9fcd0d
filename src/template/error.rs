//! Errors raised while reading or rendering Word templates

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),

    #[error("template is not a valid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid .docx template: missing {0}")]
    MissingPart(String),

    #[error("{0}")]
    NotWordDocument(String),

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("template has {} tag error(s): {}", .errors.len(), summarize(.errors))]
    Render { errors: Vec<TagIssue> },

    #[error("{origin} data is for {found}, expected {expected}")]
    InputMismatch {
        origin: &'static str,
        expected: String,
        found: String,
    },
}

/// One problem found while scanning a template for named tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIssue {
    pub kind: TagIssueKind,
    /// Zero-based paragraph index within the document body.
    pub paragraph: usize,
    /// Text of the offending tag or fragment.
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagIssueKind {
    UnclosedTag,
    UnopenedTag,
    EmptyTag,
}

impl fmt::Display for TagIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TagIssueKind::UnclosedTag => "unclosed tag",
            TagIssueKind::UnopenedTag => "unopened tag",
            TagIssueKind::EmptyTag => "empty tag",
        };
        write!(f, "{kind} \"{}\" in paragraph {}", self.context, self.paragraph)
    }
}

fn summarize(errors: &[TagIssue]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TemplateError {
    pub(crate) fn mismatch(
        origin: &'static str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        TemplateError::InputMismatch {
            origin,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn xml(part: &str, err: impl fmt::Display) -> Self {
        TemplateError::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
