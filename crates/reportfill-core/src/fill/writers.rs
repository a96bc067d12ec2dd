//! Low-level cell content writers.
//!
//! Both writers clear every paragraph in the target cell but keep the
//! paragraphs (and their `w:pPr`) in place, so cell-level layout such as
//! alignment survives the rewrite. Both are idempotent: writing the same
//! value twice leaves the cell in the same state as writing it once.

use crate::document::{Cell, Paragraph, Run, RunContent, RunStyle, text_to_content};

/// Replace a cell's content with `text` as a single unstyled run in the
/// cell's first paragraph, creating the paragraph if the cell has none.
///
/// Prior character formatting in the cell is destroyed; cells targeted by
/// this writer hold only plain data fields.
pub fn set_cell_text(cell: &mut Cell, text: &str) {
    for paragraph in cell.paragraphs_mut() {
        paragraph.clear();
    }
    if cell.first_paragraph_mut().is_none() {
        cell.push_paragraph(Paragraph::default());
    }
    if let Some(paragraph) = cell.first_paragraph_mut() {
        paragraph.push_run(Run::new(text));
    }
}

/// Replace a cell's content with a label run (bold per `label_bold`)
/// followed, when `value` is present, by a never-bold value run that
/// starts on a new line.
///
/// `Some("")` still produces the value run — the label then simply has an
/// empty line under it. `None` omits the line break and value run
/// entirely.
pub fn set_cell_label_value(cell: &mut Cell, label: &str, value: Option<&str>, label_bold: bool) {
    for paragraph in cell.paragraphs_mut() {
        paragraph.clear();
    }
    if cell.first_paragraph_mut().is_none() {
        cell.push_paragraph(Paragraph::default());
    }
    let Some(paragraph) = cell.first_paragraph_mut() else {
        return;
    };
    if !label.is_empty() {
        paragraph.push_run(Run::with_bold(label, label_bold));
    }
    if let Some(value) = value {
        let mut content = vec![RunContent::Break];
        content.extend(text_to_content(value));
        paragraph.push_run(Run {
            style: RunStyle::bold(false),
            content,
        });
    }
}
