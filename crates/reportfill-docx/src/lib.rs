//! # reportfill-docx — DOCX package backend
//!
//! Reads a `.docx` template into the `reportfill-core` document tree and
//! writes the mutated tree back out as a valid package.
//!
//! A DOCX file is a ZIP archive of OOXML parts. Only `word/document.xml`
//! is parsed into the tree; every other part (styles, fonts, existing
//! media, headers/footers) is carried through byte-for-byte. On save the
//! document part is re-serialized, and any images the fill engine inserted
//! get a media part, a relationship entry, and a content-type default.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use reportfill_docx::DocxPackage;
//!
//! # fn main() -> reportfill_core::Result<()> {
//! let mut package = DocxPackage::open(Path::new("template.docx"))?;
//! // ... mutate package.document via the fill engine ...
//! package.save(Path::new("out.docx"))?;
//! # Ok(())
//! # }
//! ```

mod read;
mod write;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use reportfill_core::document::Document;
use reportfill_core::error::{FillError, Result};

use write::ImageRegistry;

const DOCUMENT_PART: &str = "word/document.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An opened DOCX package: the parsed document tree plus every raw part
/// of the original archive, in original order.
pub struct DocxPackage {
    /// Mutable document tree; the fill engine operates on this.
    pub document: Document,
    /// All file entries of the source archive, order preserved.
    entries: Vec<(String, Vec<u8>)>,
    /// Verbatim `w:document` root tag content (namespace declarations).
    root_tag: String,
}

impl DocxPackage {
    /// Open and parse a package from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            FillError::Template(format!("cannot open template {}: {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open and parse a package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| FillError::Template(format!("not a DOCX package: {e}")))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| FillError::Template(format!("corrupt package entry: {e}")))?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            entries.push((entry.name().to_string(), data));
        }

        let document_xml = entries
            .iter()
            .find(|(name, _)| name == DOCUMENT_PART)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| FillError::Template(format!("missing {DOCUMENT_PART}")))?;
        let document_xml = String::from_utf8(document_xml)
            .map_err(|e| FillError::Template(format!("{DOCUMENT_PART} is not UTF-8: {e}")))?;
        let parsed = read::parse_document_xml(&document_xml)?;

        log::debug!(
            "Opened package: {} parts, {} tables, {} top-level paragraphs",
            entries.len(),
            parsed.document.table_count(),
            parsed.document.paragraphs().count()
        );
        Ok(Self {
            document: parsed.document,
            entries,
            root_tag: parsed.root_tag,
        })
    }

    /// Write the package to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        log::debug!("Saved {}", path.display());
        Ok(())
    }

    /// Serialize the package into any seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let entry_names: Vec<&str> = self.entries.iter().map(|(name, _)| name.as_str()).collect();
        let existing_rels = self.part_as_str(RELS_PART)?;
        let mut images = ImageRegistry::new(&entry_names, existing_rels.as_deref());

        let document_xml = write::serialize_document(&self.document, &self.root_tag, &mut images);
        let rels_xml = write::patch_relationships(existing_rels.as_deref(), &images.relationships);
        let content_types = match self.part_as_str(CONTENT_TYPES_PART)? {
            Some(existing) => Some(write::patch_content_types(&existing, &images.parts)),
            None if images.parts.is_empty() => None,
            None => {
                return Err(FillError::Template(format!(
                    "missing {CONTENT_TYPES_PART}, cannot register media"
                )))
            }
        };

        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut wrote_rels = false;
        for (name, data) in &self.entries {
            let payload: &[u8] = match name.as_str() {
                DOCUMENT_PART => document_xml.as_bytes(),
                RELS_PART => {
                    wrote_rels = true;
                    rels_xml.as_deref().map_or(data.as_slice(), str::as_bytes)
                }
                CONTENT_TYPES_PART => content_types
                    .as_deref()
                    .map_or(data.as_slice(), str::as_bytes),
                _ => data,
            };
            zip.start_file(name.clone(), options)
                .map_err(|e| FillError::Template(format!("zip write failed: {e}")))?;
            zip.write_all(payload)?;
        }
        // A template without a rels part still needs one once images are
        // inserted.
        if !wrote_rels {
            if let Some(rels) = &rels_xml {
                zip.start_file(RELS_PART.to_string(), options)
                    .map_err(|e| FillError::Template(format!("zip write failed: {e}")))?;
                zip.write_all(rels.as_bytes())?;
            }
        }
        for part in &images.parts {
            zip.start_file(part.name.clone(), options)
                .map_err(|e| FillError::Template(format!("zip write failed: {e}")))?;
            zip.write_all(&part.data)?;
        }
        zip.finish()
            .map_err(|e| FillError::Template(format!("zip finalize failed: {e}")))?;
        Ok(())
    }

    /// Raw bytes of a package part, if present.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, data)| data.as_slice())
    }

    fn part_as_str(&self, name: &str) -> Result<Option<String>> {
        self.part(name)
            .map(|data| {
                String::from_utf8(data.to_vec())
                    .map_err(|e| FillError::Template(format!("{name} is not UTF-8: {e}")))
            })
            .transpose()
    }
}
