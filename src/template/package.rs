//! Word package I/O
//!
//! A `.docx` file is a zip archive whose body lives in `word/document.xml`.
//! Templates are read once, validated, and rewritten by copying every entry
//! unchanged except the parts that were replaced.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::TemplateError;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const EXCEL_WORKBOOK_PART: &str = "xl/workbook.xml";

fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

#[derive(Debug, Clone)]
pub struct DocxPackage {
    data: Vec<u8>,
    replaced: BTreeMap<String, Vec<u8>>,
}

impl DocxPackage {
    /// Read and validate a template from disk.
    pub fn open(file_path: &Path) -> Result<Self, TemplateError> {
        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        if !extension.eq_ignore_ascii_case("docx") {
            return Err(TemplateError::NotWordDocument(format!(
                "Invalid template format. Expected .docx file, got .{extension}"
            )));
        }

        let data = std::fs::read(file_path)?;
        Self::from_bytes(data)
    }

    /// Validate an in-memory template.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TemplateError> {
        {
            let mut archive = ZipArchive::new(Cursor::new(data.as_slice()))?;

            if archive.by_name(DOCUMENT_PART).is_err() {
                if archive.by_name(EXCEL_WORKBOOK_PART).is_ok() {
                    return Err(TemplateError::NotWordDocument(
                        "This appears to be an Excel file (.xlsx), not a Word template.".to_string(),
                    ));
                }
                return Err(TemplateError::MissingPart(DOCUMENT_PART.to_string()));
            }
        }

        Ok(Self {
            data,
            replaced: BTreeMap::new(),
        })
    }

    /// Contents of a part as text, or `None` when the archive has no such entry.
    pub fn part(&self, name: &str) -> Result<Option<String>, TemplateError> {
        if let Some(contents) = self.replaced.get(name) {
            return Ok(Some(String::from_utf8_lossy(contents).into_owned()));
        }

        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))?;
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Ok(Some(text))
    }

    pub fn document_xml(&self) -> Result<String, TemplateError> {
        self.part(DOCUMENT_PART)?
            .ok_or_else(|| TemplateError::MissingPart(DOCUMENT_PART.to_string()))
    }

    pub fn replace_part(&mut self, name: &str, contents: impl Into<Vec<u8>>) {
        self.replaced.insert(name.to_string(), contents.into());
    }

    /// Check that a part, when present, is well-formed XML.
    pub fn check_xml_part(&self, name: &str) -> Result<(), TemplateError> {
        let Some(xml) = self.part(name)? else {
            return Ok(());
        };

        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => return Ok(()),
                Ok(_) => {}
                Err(err) => {
                    return Err(TemplateError::xml(
                        name,
                        format!("{err} at byte {}", reader.error_position()),
                    ));
                }
            }
        }
    }

    /// Serialize the package, writing replaced parts in place of the originals.
    pub fn into_bytes(self) -> Result<Vec<u8>, TemplateError> {
        if self.replaced.is_empty() {
            return Ok(self.data);
        }

        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut written = HashSet::new();

        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            match self.replaced.get(file.name()) {
                Some(contents) => {
                    let name = file.name().to_string();
                    drop(file);
                    writer.start_file(name.as_str(), deflated())?;
                    writer.write_all(contents)?;
                    written.insert(name);
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        for (name, contents) in &self.replaced {
            if !written.contains(name) {
                writer.start_file(name.as_str(), deflated())?;
                writer.write_all(contents)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}
