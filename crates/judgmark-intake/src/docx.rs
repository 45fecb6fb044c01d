//! Paragraph text from Office Open XML word-processing documents.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::IntakeError;

const DOC_XML_PATH: &str = "word/document.xml";

/// Text of each body paragraph, in document order.
pub fn read_docx_paragraphs(path: &Path) -> Result<Vec<String>, IntakeError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut file = archive.by_name(DOC_XML_PATH)?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    paragraphs_from_xml(&xml)
}

/// Split `document.xml` into paragraph texts.
///
/// Only top-level `w:p` elements outside tables count. A paragraph's text is
/// its runs' `w:t` content, with `w:tab` as `\t` and `w:br`/`w:cr` as `\n`.
/// Paragraphs nested inside another paragraph (text boxes) are ignored.
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, IntakeError> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    let mut para_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let collecting = table_depth == 0 && para_depth == 1;
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" => {
                    para_depth += 1;
                    if para_depth == 1 {
                        current.clear();
                    }
                }
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if table_depth == 0 && para_depth == 0 => paragraphs.push(String::new()),
                b"tab" if collecting && run_depth > 0 => current.push('\t'),
                b"br" | b"cr" if collecting && run_depth > 0 => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if collecting && in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"p" => {
                    if table_depth == 0 && para_depth == 1 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    para_depth = para_depth.saturating_sub(1);
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
