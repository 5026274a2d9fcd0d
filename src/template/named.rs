//! Named placeholder substitution
//!
//! Tags such as `{prison_name}` are located in the text of each paragraph,
//! even when Word has split a tag over several runs. The value is written
//! into the run where the tag opens and the remaining tag characters are
//! removed from the runs that follow, so run formatting is kept.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::error::{TagIssue, TagIssueKind, TemplateError};
use super::package::{DocxPackage, DOCUMENT_PART, DOCUMENT_RELS_PART};

/// Tag name to replacement text.
pub type NamedValues = BTreeMap<String, String>;

/// What to write for a tag that has no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingValue {
    #[default]
    Empty,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    /// Turn `\n` in values into Word line breaks.
    pub linebreaks: bool,
    pub missing: MissingValue,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            linebreaks: true,
            missing: MissingValue::Empty,
        }
    }
}

/// One `<w:t>` element: index of its start event and its unescaped text.
#[derive(Debug)]
struct TextRun {
    start: usize,
    text: String,
}

#[derive(Debug)]
struct Paragraph {
    index: usize,
    runs: Vec<TextRun>,
}

impl Paragraph {
    /// Every character of the paragraph tagged with the run it belongs to.
    fn chars(&self) -> Vec<(usize, char)> {
        self.runs
            .iter()
            .enumerate()
            .flat_map(|(run, text)| text.text.chars().map(move |ch| (run, ch)))
            .collect()
    }
}

#[derive(Debug, PartialEq)]
enum Piece {
    Literal(usize),
    Tag {
        open: usize,
        close: usize,
        name: String,
    },
}

fn is_text(name: &[u8]) -> bool {
    name == b"w:t"
}

fn is_paragraph(name: &[u8]) -> bool {
    name == b"w:p"
}

fn read_events(xml: &str) -> Result<Vec<Event<'static>>, TemplateError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut events = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => events.push(event.into_owned()),
            Err(err) => {
                return Err(TemplateError::xml(
                    DOCUMENT_PART,
                    format!("{err} at byte {}", reader.error_position()),
                ));
            }
        }
    }
    Ok(events)
}

fn collect_paragraphs(events: &[Event<'_>]) -> Result<Vec<Paragraph>, TemplateError> {
    let mut finished = Vec::new();
    let mut open: Vec<Paragraph> = Vec::new();
    let mut current: Option<TextRun> = None;
    let mut next_index = 0;

    for (position, event) in events.iter().enumerate() {
        match event {
            Event::Start(e) if is_paragraph(e.name().as_ref()) => {
                open.push(Paragraph {
                    index: next_index,
                    runs: Vec::new(),
                });
                next_index += 1;
            }
            Event::End(e) if is_paragraph(e.name().as_ref()) => {
                if let Some(paragraph) = open.pop() {
                    finished.push(paragraph);
                }
            }
            Event::Start(e) if is_text(e.name().as_ref()) => {
                current = Some(TextRun {
                    start: position,
                    text: String::new(),
                });
            }
            Event::End(e) if is_text(e.name().as_ref()) => {
                if let (Some(run), Some(paragraph)) = (current.take(), open.last_mut()) {
                    paragraph.runs.push(run);
                }
            }
            Event::Text(text) => {
                if let Some(run) = current.as_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| TemplateError::xml(DOCUMENT_PART, err))?;
                    run.text.push_str(&unescaped);
                }
            }
            _ => {}
        }
    }

    finished.sort_by_key(|p| p.index);
    Ok(finished)
}

/// Split a paragraph's characters into literals and tags, recording
/// malformed tags in `issues`.
fn tokenize(chars: &[(usize, char)], paragraph: usize, issues: &mut Vec<TagIssue>) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(chars.len());
    let mut position = 0;

    while position < chars.len() {
        match chars[position].1 {
            '{' => {
                let next_brace = chars[position + 1..]
                    .iter()
                    .position(|(_, ch)| *ch == '{' || *ch == '}')
                    .map(|offset| position + 1 + offset);

                match next_brace {
                    Some(close) if chars[close].1 == '}' => {
                        let name: String = chars[position + 1..close].iter().map(|(_, ch)| ch).collect();
                        let name = name.trim();
                        if name.is_empty() {
                            issues.push(TagIssue {
                                kind: TagIssueKind::EmptyTag,
                                paragraph,
                                context: chars[position..=close].iter().map(|(_, ch)| ch).collect(),
                            });
                        }
                        pieces.push(Piece::Tag {
                            open: position,
                            close,
                            name: name.to_string(),
                        });
                        position = close + 1;
                    }
                    _ => {
                        let end = next_brace.unwrap_or(chars.len());
                        issues.push(TagIssue {
                            kind: TagIssueKind::UnclosedTag,
                            paragraph,
                            context: chars[position..end].iter().map(|(_, ch)| ch).collect(),
                        });
                        pieces.push(Piece::Literal(position));
                        position += 1;
                    }
                }
            }
            '}' => {
                issues.push(TagIssue {
                    kind: TagIssueKind::UnopenedTag,
                    paragraph,
                    context: "}".to_string(),
                });
                pieces.push(Piece::Literal(position));
                position += 1;
            }
            _ => {
                pieces.push(Piece::Literal(position));
                position += 1;
            }
        }
    }
    pieces
}

/// New text for every run of a paragraph, or `None` when it holds no tags.
fn fill_paragraph(
    paragraph: &Paragraph,
    values: &NamedValues,
    options: &FillOptions,
    issues: &mut Vec<TagIssue>,
) -> Option<Vec<String>> {
    let chars = paragraph.chars();
    if !chars.iter().any(|(_, ch)| *ch == '{' || *ch == '}') {
        return None;
    }

    let mut texts = vec![String::new(); paragraph.runs.len()];
    for piece in tokenize(&chars, paragraph.index, issues) {
        match piece {
            Piece::Literal(position) => {
                let (run, ch) = chars[position];
                texts[run].push(ch);
            }
            Piece::Tag { open, close, name } => {
                let run = chars[open].0;
                match (values.get(&name), options.missing) {
                    (Some(value), _) => texts[run].push_str(value),
                    (None, MissingValue::Empty) => {}
                    (None, MissingValue::Keep) => {
                        texts[run].extend(chars[open..=close].iter().map(|(_, ch)| ch));
                    }
                }
            }
        }
    }
    Some(texts)
}

fn emit<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), TemplateError> {
    writer
        .write_event(event)
        .map_err(|err| TemplateError::xml(DOCUMENT_PART, err))
}

fn preserved_text_start() -> BytesStart<'static> {
    let mut start = BytesStart::new("w:t");
    start.push_attribute(("xml:space", "preserve"));
    start
}

/// Write the opening tag and content of a replaced run. The closing `</w:t>`
/// comes from the original event stream.
fn write_text_run<W: std::io::Write>(
    writer: &mut Writer<W>,
    text: &str,
    linebreaks: bool,
) -> Result<(), TemplateError> {
    let lines: Vec<&str> = if linebreaks {
        text.split('\n').collect()
    } else {
        vec![text]
    };

    for (n, line) in lines.into_iter().enumerate() {
        if n > 0 {
            emit(writer, Event::End(BytesEnd::new("w:t")))?;
            emit(writer, Event::Empty(BytesStart::new("w:br")))?;
        }
        emit(writer, Event::Start(preserved_text_start()))?;
        if !line.is_empty() {
            emit(writer, Event::Text(BytesText::new(line)))?;
        }
    }
    Ok(())
}

/// Replace named tags in a document body.
pub fn substitute_named(
    xml: &str,
    values: &NamedValues,
    options: &FillOptions,
) -> Result<String, TemplateError> {
    let events = read_events(xml)?;
    let paragraphs = collect_paragraphs(&events)?;

    let mut issues = Vec::new();
    let mut replacements: HashMap<usize, String> = HashMap::new();
    for paragraph in &paragraphs {
        if let Some(texts) = fill_paragraph(paragraph, values, options, &mut issues) {
            for (run, text) in paragraph.runs.iter().zip(texts) {
                replacements.insert(run.start, text);
            }
        }
    }

    if !issues.is_empty() {
        return Err(TemplateError::Render { errors: issues });
    }

    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut skipping = false;
    for (position, event) in events.into_iter().enumerate() {
        if let Some(text) = replacements.get(&position) {
            write_text_run(&mut writer, text, options.linebreaks)?;
            skipping = true;
            continue;
        }
        if skipping {
            match &event {
                Event::End(e) if is_text(e.name().as_ref()) => skipping = false,
                _ => continue,
            }
        }
        emit(&mut writer, event)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|err| TemplateError::xml(DOCUMENT_PART, err))
}

/// Fill the named tags of a `.docx` template.
///
/// The relationships part is checked first, so a template with a broken
/// package structure fails before any substitution.
pub fn fill_named_template(
    template: &[u8],
    values: &NamedValues,
    options: &FillOptions,
) -> Result<Vec<u8>, TemplateError> {
    let mut package = DocxPackage::from_bytes(template.to_vec())?;
    package.check_xml_part(DOCUMENT_RELS_PART)?;

    let xml = package.document_xml()?;
    let filled = substitute_named(&xml, values, options)?;
    package.replace_part(DOCUMENT_PART, filled);

    let output = package.into_bytes()?;
    tracing::info!(values = values.len(), bytes = output.len(), "filled named template");
    Ok(output)
}

/// Names of all well-formed tags in a template body, in sorted order.
pub fn find_named_tags(template: &[u8]) -> Result<BTreeSet<String>, TemplateError> {
    let package = DocxPackage::from_bytes(template.to_vec())?;
    let events = read_events(&package.document_xml()?)?;

    let mut ignored = Vec::new();
    let mut tags = BTreeSet::new();
    for paragraph in collect_paragraphs(&events)? {
        for piece in tokenize(&paragraph.chars(), paragraph.index, &mut ignored) {
            if let Piece::Tag { name, .. } = piece {
                if !name.is_empty() {
                    tags.insert(name);
                }
            }
        }
    }
    Ok(tags)
}
