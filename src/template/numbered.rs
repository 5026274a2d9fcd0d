//! Numbered placeholder substitution
//!
//! The monthly report template carries tokens such as `{4}` or `{55}` typed
//! directly into the document body. Substitution is plain global string
//! replacement over the raw `word/document.xml`, slot by slot in ascending
//! order. Tokens without a value in the map stay in the output verbatim.

use once_cell::sync::Lazy;
use quick_xml::escape::partial_escape;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::TemplateError;
use super::package::{DocxPackage, DOCUMENT_PART};

static NUMBERED_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Slot index to display string, iterated in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMap {
    slots: BTreeMap<u32, String>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value that is written into the XML exactly as given.
    pub fn insert(&mut self, index: u32, value: impl Into<String>) {
        self.slots.insert(index, value.into());
    }

    /// Store a value after escaping XML markup characters.
    pub fn insert_escaped(&mut self, index: u32, value: &str) {
        self.slots.insert(index, partial_escape(value).into_owned());
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.slots.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.slots.iter().map(|(index, value)| (*index, value.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (index, value) in iter {
            map.insert(index, value);
        }
        map
    }
}

pub fn numbered_token(index: u32) -> String {
    format!("{{{index}}}")
}

/// Replace every `{index}` token with its value, lowest index first.
pub fn substitute_numbered(xml: &str, slots: &SlotMap) -> String {
    let mut result = xml.to_string();
    for (index, value) in slots.iter() {
        let token = numbered_token(index);
        if result.contains(&token) {
            result = result.replace(&token, value);
        }
    }
    result
}

/// Indices of all numbered tokens present in a document body.
pub fn find_numbered_tokens(xml: &str) -> BTreeSet<u32> {
    NUMBERED_TOKEN
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// Fill the numbered tokens of a `.docx` template.
pub fn fill_numbered_template(template: &[u8], slots: &SlotMap) -> Result<Vec<u8>, TemplateError> {
    let mut package = DocxPackage::from_bytes(template.to_vec())?;
    let xml = package.document_xml()?;

    let present = find_numbered_tokens(&xml);
    let unresolved: Vec<u32> = present
        .iter()
        .copied()
        .filter(|index| slots.get(*index).is_none())
        .collect();
    if !unresolved.is_empty() {
        tracing::debug!(?unresolved, "numbered tokens left without a value");
    }

    let filled = substitute_numbered(&xml, slots);
    package.replace_part(DOCUMENT_PART, filled);

    let output = package.into_bytes()?;
    tracing::info!(
        slots = slots.len(),
        tokens = present.len(),
        bytes = output.len(),
        "filled numbered template"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_token_is_not_rewritten_by_shorter_index() {
        let slots: SlotMap = [(5, "five"), (55, "fifty-five")].into_iter().collect();
        let xml = "<w:t>{5}|{55}|5|55</w:t>";
        assert_eq!(
            substitute_numbered(xml, &slots),
            "<w:t>five|fifty-five|5|55</w:t>"
        );
    }

    #[test]
    fn test_value_containing_token_is_rewritten_by_later_slot() {
        // Global replacement in ascending order: a value that itself looks
        // like a later token gets substituted again.
        let slots: SlotMap = [(1, "{2}"), (2, "two")].into_iter().collect();
        assert_eq!(substitute_numbered("{1}", &slots), "two");
    }

    #[test]
    fn test_find_numbered_tokens() {
        let tokens = find_numbered_tokens("<w:t>{1}</w:t><w:t>{55}{12}</w:t><w:t>{x}</w:t>");
        assert_eq!(tokens.into_iter().collect::<Vec<_>>(), vec![1, 12, 55]);
    }

    #[test]
    fn test_insert_escaped_text() {
        let mut slots = SlotMap::new();
        slots.insert_escaped(1, "A&B <c>");
        slots.insert_escaped(2, "女子监狱");
        slots.insert_escaped(3, "\"引号\" 'x'");
        assert_eq!(slots.get(1), Some("A&amp;B &lt;c&gt;"));
        assert_eq!(slots.get(2), Some("女子监狱"));
        // Quotes are legal in element text
        assert_eq!(slots.get(3), Some("\"引号\" 'x'"));
    }
}
