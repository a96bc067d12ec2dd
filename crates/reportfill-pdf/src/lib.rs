//! # reportfill-pdf — batch PDF stage
//!
//! Thin sequential wrapper over an external per-file converter and a PDF
//! merge: every `.docx` in a directory is converted to PDF through the
//! converter binary (LibreOffice by default), and the resulting PDFs are
//! concatenated in filename-sorted order into one combined file.
//!
//! Conversion failures are counted per file and do not abort the batch;
//! the merge runs over whatever converted successfully.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use lopdf::{Document, Object, ObjectId};

use reportfill_core::error::{FillError, Result};

/// External DOCX-to-PDF converter invocation.
///
/// Defaults to LibreOffice's `soffice --headless --convert-to pdf`; the
/// program name is configurable for environments where the binary is
/// installed under a different name (`libreoffice`, a wrapper script).
#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: String,
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self {
            program: "soffice".to_string(),
        }
    }
}

impl PdfConverter {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Convert one document into `out_dir`, returning the produced PDF
    /// path.
    pub fn convert(&self, input: &Path, out_dir: &Path) -> Result<PathBuf> {
        let status = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| FillError::Convert(format!("cannot run {}: {e}", self.program)))?;
        if !status.success() {
            return Err(FillError::Convert(format!(
                "{} exited with {status} for {}",
                self.program,
                input.display()
            )));
        }
        let stem = input
            .file_stem()
            .ok_or_else(|| FillError::Convert(format!("no file stem: {}", input.display())))?;
        let produced = out_dir.join(format!("{}.pdf", stem.to_string_lossy()));
        if !produced.exists() {
            return Err(FillError::Convert(format!(
                "{} produced no output for {}",
                self.program,
                input.display()
            )));
        }
        Ok(produced)
    }
}

/// Per-file outcome counts of one combine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub output: PathBuf,
}

/// All `.docx` files directly under `dir`, sorted by filename.
pub fn collect_docx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_docx = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("docx"))
            .unwrap_or(false);
        if path.is_file() && is_docx {
            files.push(path);
        }
    }
    files.sort_by_key(|path| path.file_name().map(std::ffi::OsStr::to_os_string));
    Ok(files)
}

/// Convert every `.docx` under `input_dir` and merge the results into
/// `output`.
///
/// Individual conversion failures are logged and counted; the batch only
/// fails outright when there is nothing to convert or nothing converted.
pub fn combine_reports(
    input_dir: &Path,
    output: &Path,
    converter: &PdfConverter,
) -> Result<CombineSummary> {
    let docx_files = collect_docx_files(input_dir)?;
    if docx_files.is_empty() {
        return Err(FillError::Convert(format!(
            "no DOCX files in {}",
            input_dir.display()
        )));
    }
    log::info!("Converting {} documents to PDF", docx_files.len());

    let temp_dir = tempfile::tempdir()?;
    let mut pdf_files = Vec::new();
    let mut failed = 0usize;
    for docx in &docx_files {
        match converter.convert(docx, temp_dir.path()) {
            Ok(pdf) => pdf_files.push(pdf),
            Err(e) => {
                log::warn!("Conversion failed for {}: {e}", docx.display());
                failed += 1;
            }
        }
    }
    if pdf_files.is_empty() {
        return Err(FillError::Convert(
            "no documents converted successfully".to_string(),
        ));
    }

    merge_pdfs(&pdf_files, output)?;
    Ok(CombineSummary {
        total: docx_files.len(),
        converted: pdf_files.len(),
        failed,
        output: output.to_path_buf(),
    })
}

/// Concatenate the given PDFs, in order, into one document at `dest`.
pub fn merge_pdfs(paths: &[PathBuf], dest: &Path) -> Result<()> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let doc = Document::load(path)
            .map_err(|e| FillError::Convert(format!("cannot load {}: {e}", path.display())))?;
        documents.push(doc);
    }
    let mut merged = merge_documents(documents)?;
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    merged
        .save(dest)
        .map_err(|e| FillError::Convert(format!("cannot save {}: {e}", dest.display())))?;
    log::info!("Merged {} PDFs into {}", paths.len(), dest.display());
    Ok(())
}

/// `/Type` name of a dictionary object, if it has one.
fn dict_type(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|value| value.as_name().ok())
}

/// Merge loaded documents by renumbering their objects into one space and
/// collecting every page under a single Pages tree.
fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut all_pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut merged = Document::with_version("1.5");

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        for (_, object_id) in doc.get_pages() {
            if let Ok(object) = doc.get_object(object_id) {
                all_pages.insert(object_id, object.to_owned());
            }
        }
        all_objects.extend(doc.objects);
    }

    let mut catalog: Option<(ObjectId, Object)> = None;
    for (object_id, object) in &all_objects {
        match dict_type(object) {
            Some(b"Catalog") => {
                if catalog.is_none() {
                    catalog = Some((*object_id, object.clone()));
                }
            }
            // Page objects are re-parented below; per-document Pages
            // trees and outlines are dropped in favor of the merged tree.
            Some(b"Pages" | b"Page" | b"Outlines" | b"Outline") => {}
            _ => {
                merged.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (catalog_id, catalog_object) = catalog
        .ok_or_else(|| FillError::Convert("merged input has no PDF catalog".to_string()))?;
    if all_pages.is_empty() {
        return Err(FillError::Convert("merged input has no pages".to_string()));
    }

    let pages_id = (max_id + 1, 0);
    for (object_id, object) in &all_pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    let mut pages_dict = lopdf::Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", all_pages.len() as i64);
    pages_dict.set(
        "Kids",
        all_pages
            .keys()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<Object>>(),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    if let Ok(dict) = catalog_object.as_dict() {
        let mut dict = dict.clone();
        dict.set("Pages", pages_id);
        dict.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(dict));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();
    Ok(merged)
}
