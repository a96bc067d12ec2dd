//! WordprocessingML serialization: core document tree → `word/document.xml`.
//!
//! Captured raw fragments are emitted verbatim; text is re-escaped through
//! `quick_xml`. Newly inserted inline images allocate media parts and
//! relationship ids through [`ImageRegistry`], which the package layer
//! turns into ZIP entries and relationship/content-type patches.

use quick_xml::escape::escape;

use reportfill_core::document::{
    Block, Cell, CellItem, Document, InlineImage, ParaItem, Paragraph, Row, Run, RunContent,
    Table,
};

const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// A media part to be added to the package on save.
pub(crate) struct MediaPart {
    /// Full part name, e.g. `word/media/image3.png`.
    pub name: String,
    pub data: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// A relationship entry to append to `word/_rels/document.xml.rels`.
pub(crate) struct MediaRelationship {
    pub id: String,
    /// Target relative to the `word/` directory.
    pub target: String,
}

/// Allocates non-colliding media part names and relationship ids for
/// images inserted since the package was parsed.
pub(crate) struct ImageRegistry {
    next_media_index: usize,
    next_rel_index: usize,
    next_drawing_id: usize,
    pub parts: Vec<MediaPart>,
    pub relationships: Vec<MediaRelationship>,
}

impl ImageRegistry {
    /// Seed the allocator from the existing package: media indices from
    /// `word/media/imageN.*` entry names, relationship indices from the
    /// highest `rIdN` in the existing rels part.
    pub fn new(entry_names: &[&str], rels_xml: Option<&str>) -> Self {
        let mut max_media = 0usize;
        for name in entry_names {
            if let Some(rest) = name.strip_prefix("word/media/image") {
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                if let Ok(n) = digits.parse::<usize>() {
                    max_media = max_media.max(n);
                }
            }
        }
        let mut max_rel = 0usize;
        if let Some(xml) = rels_xml {
            let mut rest = xml;
            while let Some(pos) = rest.find("Id=\"rId") {
                rest = &rest[pos + 7..];
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                if let Ok(n) = digits.parse::<usize>() {
                    max_rel = max_rel.max(n);
                }
            }
        }
        Self {
            next_media_index: max_media + 1,
            next_rel_index: max_rel + 1,
            next_drawing_id: 1,
            parts: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Register one inserted image; returns `(relationship id, drawing id)`.
    fn add(&mut self, image: &InlineImage) -> (String, usize) {
        let media_index = self.next_media_index;
        self.next_media_index += 1;
        let rel_id = format!("rId{}", self.next_rel_index);
        self.next_rel_index += 1;
        let drawing_id = self.next_drawing_id;
        self.next_drawing_id += 1;

        let extension = image.format.extension();
        let file_name = format!("image{media_index}.{extension}");
        self.parts.push(MediaPart {
            name: format!("word/media/{file_name}"),
            data: image.data.clone(),
            extension,
            content_type: image.format.content_type(),
        });
        self.relationships.push(MediaRelationship {
            id: rel_id.clone(),
            target: format!("media/{file_name}"),
        });
        (rel_id, drawing_id)
    }
}

/// Serialize the whole `word/document.xml` part.
pub(crate) fn serialize_document(
    doc: &Document,
    root_tag: &str,
    images: &mut ImageRegistry,
) -> String {
    let mut out =
        String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n");
    out.push('<');
    out.push_str(root_tag);
    out.push_str("><w:body>");
    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut out, p, images),
            Block::Table(t) => write_table(&mut out, t, images),
            Block::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:body></w:document>");
    out
}

fn write_table(out: &mut String, table: &Table, images: &mut ImageRegistry) {
    out.push_str("<w:tbl>");
    if let Some(props) = &table.properties {
        out.push_str(props);
    }
    for row in &table.rows {
        write_row(out, row, images);
    }
    out.push_str("</w:tbl>");
}

fn write_row(out: &mut String, row: &Row, images: &mut ImageRegistry) {
    out.push_str("<w:tr>");
    if let Some(props) = &row.properties {
        out.push_str(props);
    }
    for cell in &row.cells {
        write_cell(out, cell, images);
    }
    out.push_str("</w:tr>");
}

fn write_cell(out: &mut String, cell: &Cell, images: &mut ImageRegistry) {
    out.push_str("<w:tc>");
    if let Some(props) = &cell.properties {
        out.push_str(props);
    }
    for item in &cell.content {
        match item {
            CellItem::Paragraph(p) => write_paragraph(out, p, images),
            CellItem::Raw(raw) => out.push_str(raw),
        }
    }
    // A table cell must end with at least one block-level element.
    if cell.paragraphs().next().is_none() {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph, images: &mut ImageRegistry) {
    out.push_str("<w:p>");
    if let Some(props) = &paragraph.properties {
        out.push_str(props);
    }
    for item in &paragraph.items {
        match item {
            ParaItem::Run(run) => write_run(out, run, images),
            ParaItem::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run, images: &mut ImageRegistry) {
    out.push_str("<w:r>");
    if let Some(raw) = &run.style.raw {
        out.push_str(raw);
    } else if let Some(bold) = run.style.bold {
        out.push_str(if bold {
            "<w:rPr><w:b/></w:rPr>"
        } else {
            "<w:rPr><w:b w:val=\"0\"/></w:rPr>"
        });
    }
    for content in &run.content {
        match content {
            RunContent::Text(text) => {
                if text.is_empty() {
                    out.push_str("<w:t/>");
                } else {
                    out.push_str("<w:t xml:space=\"preserve\">");
                    out.push_str(&escape(text));
                    out.push_str("</w:t>");
                }
            }
            RunContent::Break => out.push_str("<w:br/>"),
            RunContent::Tab => out.push_str("<w:tab/>"),
            RunContent::Image(image) => {
                let (rel_id, drawing_id) = images.add(image);
                write_drawing(out, image, &rel_id, drawing_id);
            }
            RunContent::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:r>");
}

/// Minimal self-contained inline drawing. Namespaces are declared locally
/// so the fragment is valid whatever the root element declares.
fn write_drawing(out: &mut String, image: &InlineImage, rel_id: &str, drawing_id: usize) {
    let cx = image.width_emu;
    let cy = image.height_emu;
    out.push_str(&format!(
        concat!(
            "<w:drawing>",
            "<wp:inline xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" ",
            "distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:effectExtent l=\"0\" t=\"0\" r=\"0\" b=\"0\"/>",
            "<wp:docPr id=\"{id}\" name=\"Picture {id}\"/>",
            "<wp:cNvGraphicFramePr/>",
            "<a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">",
            "<a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"Picture {id}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            "<pic:blipFill>",
            "<a:blip xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" r:embed=\"{rid}\"/>",
            "<a:stretch><a:fillRect/></a:stretch>",
            "</pic:blipFill>",
            "<pic:spPr>",
            "<a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>",
            "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>",
            "</pic:spPr>",
            "</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>",
        ),
        cx = cx,
        cy = cy,
        id = drawing_id,
        rid = rel_id,
    ));
}

/// Append the new image relationships to the rels part, creating the part
/// when the template has none.
pub(crate) fn patch_relationships(
    existing: Option<&str>,
    relationships: &[MediaRelationship],
) -> Option<String> {
    if relationships.is_empty() {
        return existing.map(str::to_string);
    }
    let base = existing.map_or_else(
        || {
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
                "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
                "</Relationships>",
            )
            .to_string()
        },
        str::to_string,
    );
    let mut additions = String::new();
    for rel in relationships {
        additions.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{REL_TYPE_IMAGE}\" Target=\"{}\"/>",
            rel.id, rel.target
        ));
    }
    Some(base.replacen("</Relationships>", &format!("{additions}</Relationships>"), 1))
}

/// Ensure `[Content_Types].xml` declares a default content type for every
/// newly added media extension.
pub(crate) fn patch_content_types(existing: &str, parts: &[MediaPart]) -> String {
    let mut out = existing.to_string();
    for part in parts {
        let marker = format!("Extension=\"{}\"", part.extension);
        if !out.contains(&marker) {
            let default = format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                part.extension, part.content_type
            );
            out = out.replacen("</Types>", &format!("{default}</Types>"), 1);
        }
    }
    out
}
