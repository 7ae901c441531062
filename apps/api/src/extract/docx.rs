//! DOCX body paragraphs, read straight from `word/document.xml` inside the ZIP container.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::NsReader;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Returns the text of every body paragraph in document order.
pub(super) fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    parse_document_xml(&xml)
}

/// Walks the WordprocessingML body. Paragraphs inside tables and text boxes
/// are not body paragraphs and are skipped along with their text.
///
/// Elements are matched by namespace and local name, so any prefix bound to the
/// WordprocessingML namespace is accepted.
fn parse_document_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = NsReader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut nested_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractError::Docx(format!(
                "malformed {DOCUMENT_PART} at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match wordml_name(&reader, e.name()) {
                Some(b"tbl" | b"txbxContent") => nested_depth += 1,
                Some(b"p") if nested_depth == 0 => current = Some(String::new()),
                Some(b"r") => in_run = true,
                Some(b"t") => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if nested_depth > 0 {
                    continue;
                }
                match wordml_name(&reader, e.name()) {
                    Some(b"p") => paragraphs.push(String::new()),
                    Some(b"tab") if in_run => push_to(&mut current, "\t"),
                    Some(b"br" | b"cr") if in_run => push_to(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(e) => {
                if in_text && nested_depth == 0 {
                    let text = e
                        .unescape()
                        .map_err(|e| ExtractError::Docx(format!("bad text run: {e}")))?;
                    push_to(&mut current, &text);
                }
            }
            Event::End(e) => match wordml_name(&reader, e.name()) {
                Some(b"tbl" | b"txbxContent") => nested_depth = nested_depth.saturating_sub(1),
                Some(b"p") if nested_depth == 0 => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                Some(b"r") => in_run = false,
                Some(b"t") => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Local name of an element in the WordprocessingML namespace; `None` for anything else.
fn wordml_name<'n>(reader: &NsReader<&[u8]>, name: QName<'n>) -> Option<&'n [u8]> {
    match reader.resolve_element(name) {
        (ResolveResult::Bound(Namespace(ns)), local) if ns == WORDML_NS => {
            Some(local.into_inner())
        }
        _ => None,
    }
}

fn push_to(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
