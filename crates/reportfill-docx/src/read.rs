//! WordprocessingML parsing: `word/document.xml` → core document tree.
//!
//! Event-driven ZIP + XML parsing. Only the containment structure the fill
//! engine addresses (tables, rows, cells, paragraphs, runs, text, breaks)
//! is modeled; every other element is captured as a verbatim XML fragment
//! and re-emitted unchanged on save, so template content the engine never
//! touches survives the round trip.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;

use reportfill_core::document::{
    Block, Cell, CellItem, Document, ParaItem, Paragraph, Row, Run, RunContent, Table,
};
use reportfill_core::error::{FillError, Result};

/// Parse result: the document tree plus the verbatim root tag content
/// (`w:document` with its namespace declarations), needed to serialize
/// the part back.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub document: Document,
    pub root_tag: String,
}

pub(crate) fn parse_document_xml(xml: &str) -> Result<ParsedDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut root_tag = String::new();
    let mut document = Document::default();
    loop {
        match read_event(&mut reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:document" => root_tag = raw_content(&e),
                b"w:body" => document.blocks = parse_body(&mut reader)?,
                _ => {
                    // Unexpected top-level element; consume it so the
                    // walk stays aligned.
                    let _ = capture_element(&mut reader, &e)?;
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }
    if root_tag.is_empty() {
        return Err(FillError::Template(
            "word/document.xml has no w:document root".to_string(),
        ));
    }
    Ok(ParsedDocument { document, root_tag })
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>> {
    reader
        .read_event()
        .map_err(|e| FillError::Template(format!("XML parse error: {e}")))
}

fn parse_body(reader: &mut Reader<&[u8]>) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => blocks.push(Block::Paragraph(parse_paragraph(reader)?)),
                b"w:tbl" => blocks.push(Block::Table(parse_table(reader)?)),
                _ => blocks.push(Block::Raw(capture_element(reader, &e)?)),
            },
            Event::Empty(e) => blocks.push(Block::Raw(empty_tag(&e))),
            Event::End(e) if e.name().as_ref() == b"w:body" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:body".to_string()))
            }
            _ => {}
        }
    }
    Ok(blocks)
}

fn parse_table(reader: &mut Reader<&[u8]>) -> Result<Table> {
    let mut table = Table::default();
    let mut props = String::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tr" => table.rows.push(parse_row(reader)?),
                _ => props.push_str(&capture_element(reader, &e)?),
            },
            Event::Empty(e) => props.push_str(&empty_tag(&e)),
            Event::End(e) if e.name().as_ref() == b"w:tbl" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:tbl".to_string()))
            }
            _ => {}
        }
    }
    if !props.is_empty() {
        table.properties = Some(props);
    }
    Ok(table)
}

fn parse_row(reader: &mut Reader<&[u8]>) -> Result<Row> {
    let mut row = Row::default();
    let mut props = String::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => row.cells.push(parse_cell(reader)?),
                _ => props.push_str(&capture_element(reader, &e)?),
            },
            Event::Empty(e) => props.push_str(&empty_tag(&e)),
            Event::End(e) if e.name().as_ref() == b"w:tr" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:tr".to_string()))
            }
            _ => {}
        }
    }
    if !props.is_empty() {
        row.properties = Some(props);
    }
    Ok(row)
}

fn parse_cell(reader: &mut Reader<&[u8]>) -> Result<Cell> {
    let mut cell = Cell::default();
    let mut props = String::new();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => cell
                    .content
                    .push(CellItem::Paragraph(parse_paragraph(reader)?)),
                b"w:tcPr" => props.push_str(&capture_element(reader, &e)?),
                // Nested tables and anything else round-trip verbatim.
                _ => cell.content.push(CellItem::Raw(capture_element(reader, &e)?)),
            },
            Event::Empty(e) => cell.content.push(CellItem::Raw(empty_tag(&e))),
            Event::End(e) if e.name().as_ref() == b"w:tc" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:tc".to_string()))
            }
            _ => {}
        }
    }
    if !props.is_empty() {
        cell.properties = Some(props);
    }
    Ok(cell)
}

fn parse_paragraph(reader: &mut Reader<&[u8]>) -> Result<Paragraph> {
    let mut paragraph = Paragraph::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:pPr" => paragraph.properties = Some(capture_element(reader, &e)?),
                b"w:r" => paragraph.items.push(ParaItem::Run(parse_run(reader)?)),
                _ => paragraph
                    .items
                    .push(ParaItem::Raw(capture_element(reader, &e)?)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:pPr" => paragraph.properties = Some(empty_tag(&e)),
                _ => paragraph.items.push(ParaItem::Raw(empty_tag(&e))),
            },
            Event::End(e) if e.name().as_ref() == b"w:p" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:p".to_string()))
            }
            _ => {}
        }
    }
    Ok(paragraph)
}

fn parse_run(reader: &mut Reader<&[u8]>) -> Result<Run> {
    let mut run = Run::default();
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:rPr" => {
                    let raw = capture_element(reader, &e)?;
                    run.style.bold = bold_from_rpr(&raw);
                    run.style.raw = Some(raw);
                }
                b"w:t" => run.content.push(RunContent::Text(read_text(reader)?)),
                b"w:br" | b"w:cr" => {
                    skip_element(reader, &e)?;
                    run.content.push(RunContent::Break);
                }
                b"w:tab" => {
                    skip_element(reader, &e)?;
                    run.content.push(RunContent::Tab);
                }
                _ => run.content.push(RunContent::Raw(capture_element(reader, &e)?)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:rPr" => run.style.raw = Some(empty_tag(&e)),
                b"w:t" => run.content.push(RunContent::Text(String::new())),
                b"w:br" | b"w:cr" => run.content.push(RunContent::Break),
                b"w:tab" => run.content.push(RunContent::Tab),
                _ => run.content.push(RunContent::Raw(empty_tag(&e))),
            },
            Event::End(e) if e.name().as_ref() == b"w:r" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:r".to_string()))
            }
            _ => {}
        }
    }
    Ok(run)
}

/// Accumulate the text content of a `w:t` element up to its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut out = String::new();
    loop {
        match read_event(reader)? {
            Event::Text(t) => out.push_str(
                &t.unescape()
                    .map_err(|e| FillError::Template(format!("bad text entity: {e}")))?,
            ),
            Event::CData(t) => out.push_str(&String::from_utf8_lossy(&t.into_inner())),
            Event::End(e) if e.name().as_ref() == b"w:t" => break,
            Event::Eof => {
                return Err(FillError::Template("unterminated w:t".to_string()))
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Consume an already-started element without keeping its content.
fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<()> {
    capture_element(reader, start).map(|_| ())
}

/// Reconstruct an already-started element verbatim, consuming events up to
/// its matching end tag. Text is kept in its escaped source form so the
/// fragment can be re-emitted byte-for-byte.
fn capture_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String> {
    let mut raw = start_tag(start);
    let mut depth = 1usize;
    loop {
        match read_event(reader)? {
            Event::Start(e) => {
                depth += 1;
                raw.push_str(&start_tag(&e));
            }
            Event::Empty(e) => raw.push_str(&empty_tag(&e)),
            Event::End(e) => {
                raw.push_str(&end_tag(&e));
                depth -= 1;
                if depth == 0 {
                    return Ok(raw);
                }
            }
            Event::Text(t) => raw.push_str(&raw_text(&t)),
            Event::CData(t) => {
                raw.push_str("<![CDATA[");
                raw.push_str(&String::from_utf8_lossy(&t.into_inner()));
                raw.push_str("]]>");
            }
            Event::Comment(t) => {
                raw.push_str("<!--");
                raw.push_str(&raw_text(&t));
                raw.push_str("-->");
            }
            Event::Eof => {
                return Err(FillError::Template(
                    "unexpected end of XML inside element".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn start_tag(e: &BytesStart) -> String {
    format!("<{}>", String::from_utf8_lossy(e.as_ref()))
}

fn empty_tag(e: &BytesStart) -> String {
    format!("<{}/>", String::from_utf8_lossy(e.as_ref()))
}

fn end_tag(e: &BytesEnd) -> String {
    format!("</{}>", String::from_utf8_lossy(e.name().as_ref()))
}

fn raw_content(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.as_ref()).into_owned()
}

fn raw_text(t: &BytesText) -> String {
    String::from_utf8_lossy(t.as_ref()).into_owned()
}

/// Explicit bold state from a captured `w:rPr` fragment: present and not
/// switched off via `w:val`.
fn bold_from_rpr(raw: &str) -> Option<bool> {
    let mut reader = Reader::from_str(raw);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"w:b" => {
                let off = e.attributes().filter_map(std::result::Result::ok).any(|a| {
                    a.key.as_ref() == b"w:val"
                        && (a.value.as_ref() == b"0" || a.value.as_ref() == b"false")
                });
                return Some(!off);
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
