//! Details/sign-off table fills: notes, trainee signature image, engineer
//! remarks, and the date/designation row.

use crate::document::{Document, InlineImage, Paragraph, Run, RunContent, Table};
use crate::record::WeeklyRecord;

use super::anchor::{contains_ci, first_cell_containing, first_row_containing};
use super::writers::{set_cell_label_value, set_cell_text};

const SIGNATURE_LABEL: &str = "SIGNATURE OF TRAINEE";
const REMARKS_LABEL: &str = "REMARKS AND CERTIFICATION";

/// Fill the details/sign-off table (table index 1).
///
/// Each sub-step locates its own anchor and skips silently when the anchor
/// is absent, so a template that matches only partially degrades to a
/// partial fill instead of an error. A document with fewer than two tables
/// is a no-op.
pub fn fill_details_section(
    doc: &mut Document,
    record: &WeeklyRecord,
    signature: Option<&InlineImage>,
) {
    let Some(table) = doc.table_mut(1) else {
        log::debug!("No details table in template, skipping details section");
        return;
    };

    fill_notes(table, &record.details_notes);
    fill_signature(table, signature);
    fill_remarks(table, &record.engineer_remarks);
    fill_signoff_row(table, record);
}

/// Notes go into the large free-text cell: row 1, cell 0.
fn fill_notes(table: &mut Table, notes: &str) {
    if let Some(cell) = table.rows.get_mut(1).and_then(|row| row.cells.first_mut()) {
        set_cell_text(cell, notes);
    }
}

/// Write the trainee-signature label and place the signature image.
///
/// The first cell containing the label (row-major) gets the bold label
/// with an empty value line. The image goes into the next cell of the
/// same row when one exists; otherwise a fresh paragraph with a bold
/// label, a line break, and the inline image replaces the label cell's
/// content. Without an image the label is still written and the
/// placement is skipped with a warning.
fn fill_signature(table: &mut Table, signature: Option<&InlineImage>) {
    let Some(anchor) = first_cell_containing(table, SIGNATURE_LABEL) else {
        log::debug!("Signature label not found, skipping signature placement");
        return;
    };
    let row = &mut table.rows[anchor.row];
    set_cell_label_value(&mut row.cells[anchor.cell], SIGNATURE_LABEL, Some(""), true);

    let Some(image) = signature else {
        log::warn!("Signature image unavailable, label written without image");
        return;
    };

    if anchor.cell + 1 < row.cells.len() {
        let sibling = &mut row.cells[anchor.cell + 1];
        for paragraph in sibling.paragraphs_mut() {
            paragraph.clear();
        }
        if sibling.first_paragraph_mut().is_none() {
            sibling.push_paragraph(Paragraph::default());
        }
        if let Some(paragraph) = sibling.first_paragraph_mut() {
            paragraph.push_run(Run::image(image.clone()));
        }
    } else {
        // No adjacent cell: label and image share the anchor cell.
        let cell = &mut row.cells[anchor.cell];
        for paragraph in cell.paragraphs_mut() {
            paragraph.clear();
        }
        let mut paragraph = Paragraph::default();
        paragraph.push_run(Run::with_bold(SIGNATURE_LABEL, true));
        let mut image_run = Run::image(image.clone());
        image_run.content.insert(0, RunContent::Break);
        paragraph.push_run(image_run);
        cell.push_paragraph(paragraph);
    }
}

/// Engineer remarks go into cell 0 of the row following the remarks
/// header row.
fn fill_remarks(table: &mut Table, remarks: &str) {
    let Some(header_row) = first_row_containing(table, REMARKS_LABEL) else {
        log::debug!("Remarks header not found, skipping remarks");
        return;
    };
    if let Some(cell) = table
        .rows
        .get_mut(header_row + 1)
        .and_then(|row| row.cells.first_mut())
    {
        set_cell_text(cell, remarks);
    }
}

/// Date and designation/signature fields live on the last row. Each cell
/// is tested against the field list in order; the first label contained
/// in the cell's text claims it.
fn fill_signoff_row(table: &mut Table, record: &WeeklyRecord) {
    let fields: [(&str, &str); 2] = [
        ("DATE:", record.engineer_date.as_str()),
        (
            "DESIGNATION AND SIGNATURE",
            record.engineer_designation_signature.as_str(),
        ),
    ];
    let Some(last_row) = table.rows.last_mut() else {
        return;
    };
    for cell in &mut last_row.cells {
        let text = cell.text();
        for (label, value) in fields {
            if contains_ci(&text, label) {
                set_cell_label_value(cell, label, Some(value), true);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Cell, ImageFormat, Row};

    fn cell(text: &str) -> Cell {
        let mut cell = Cell::default();
        let mut p = Paragraph::default();
        p.push_run(Run::new(text));
        cell.push_paragraph(p);
        cell
    }

    fn row(texts: &[&str]) -> Row {
        Row {
            properties: None,
            cells: texts.iter().map(|t| cell(t)).collect(),
        }
    }

    fn details_doc(signature_has_sibling: bool) -> Document {
        let signature_row = if signature_has_sibling {
            row(&["SIGNATURE OF TRAINEE", ""])
        } else {
            row(&["SIGNATURE OF TRAINEE"])
        };
        let details = Table {
            properties: None,
            rows: vec![
                row(&["DETAILS OF WORK"]),
                row(&["", ""]),
                signature_row,
                row(&["REMARKS AND CERTIFICATION"]),
                row(&["", ""]),
                row(&["DATE:", "DESIGNATION AND SIGNATURE"]),
            ],
        };
        Document {
            blocks: vec![
                Block::Table(Table::default()),
                Block::Table(details),
            ],
        }
    }

    fn record() -> WeeklyRecord {
        WeeklyRecord {
            details_notes: "Worked on commissioning.".to_string(),
            engineer_remarks: "Satisfactory progress.".to_string(),
            engineer_date: "2024-01-08".to_string(),
            engineer_designation_signature: "Lead Engineer".to_string(),
            ..WeeklyRecord::default()
        }
    }

    fn signature() -> InlineImage {
        InlineImage {
            data: vec![1, 2, 3],
            format: ImageFormat::Png,
            width_emu: 1_371_600,
            height_emu: 457_200,
        }
    }

    #[test]
    fn single_table_document_is_a_no_op() {
        let mut doc = Document {
            blocks: vec![Block::Table(Table::default())],
        };
        let before = doc.clone();
        let sig = signature();
        fill_details_section(&mut doc, &record(), Some(&sig));
        assert_eq!(doc, before);
    }

    #[test]
    fn notes_fill_row_one_cell_zero() {
        let mut doc = details_doc(true);
        fill_details_section(&mut doc, &record(), None);
        let details = doc.tables().nth(1).unwrap();
        assert_eq!(details.rows[1].cells[0].text(), "Worked on commissioning.");
    }

    #[test]
    fn signature_image_goes_into_sibling_cell() {
        let mut doc = details_doc(true);
        let sig = signature();
        fill_details_section(&mut doc, &record(), Some(&sig));

        let details = doc.tables().nth(1).unwrap();
        let label_cell = &details.rows[2].cells[0];
        assert_eq!(label_cell.text(), "SIGNATURE OF TRAINEE\n");
        assert!(label_cell
            .paragraphs()
            .flat_map(Paragraph::runs)
            .all(|r| !r.has_image()));

        let image_cell = &details.rows[2].cells[1];
        let image_runs: Vec<&Run> = image_cell
            .paragraphs()
            .flat_map(Paragraph::runs)
            .filter(|r| r.has_image())
            .collect();
        assert_eq!(image_runs.len(), 1);
        assert_eq!(
            image_runs[0].content,
            vec![RunContent::Image(signature())]
        );
    }

    #[test]
    fn signature_without_sibling_cell_shares_the_label_cell() {
        let mut doc = details_doc(false);
        let sig = signature();
        fill_details_section(&mut doc, &record(), Some(&sig));

        let details = doc.tables().nth(1).unwrap();
        let cell = &details.rows[2].cells[0];
        let appended = cell.paragraphs().last().unwrap();
        let runs: Vec<&Run> = appended.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text(), "SIGNATURE OF TRAINEE");
        assert_eq!(runs[0].style.bold, Some(true));
        assert_eq!(runs[1].content[0], RunContent::Break);
        assert!(runs[1].has_image());
    }

    #[test]
    fn missing_signature_image_still_writes_label() {
        let mut doc = details_doc(true);
        fill_details_section(&mut doc, &record(), None);

        let details = doc.tables().nth(1).unwrap();
        assert_eq!(details.rows[2].cells[0].text(), "SIGNATURE OF TRAINEE\n");
        // Sibling cell untouched when there is no image to place.
        assert_eq!(details.rows[2].cells[1], cell(""));
    }

    #[test]
    fn remarks_fill_the_row_below_the_remarks_header() {
        let mut doc = details_doc(true);
        fill_details_section(&mut doc, &record(), None);
        let details = doc.tables().nth(1).unwrap();
        assert_eq!(details.rows[4].cells[0].text(), "Satisfactory progress.");
    }

    #[test]
    fn remarks_header_on_last_row_skips_quietly() {
        let details = Table {
            properties: None,
            rows: vec![
                row(&["DETAILS OF WORK"]),
                row(&[""]),
                row(&["REMARKS AND CERTIFICATION"]),
            ],
        };
        let mut doc = Document {
            blocks: vec![Block::Table(Table::default()), Block::Table(details)],
        };
        fill_details_section(&mut doc, &record(), None);
        let details = doc.tables().nth(1).unwrap();
        assert_eq!(details.rows[2].cells[0].text(), "REMARKS AND CERTIFICATION");
    }

    #[test]
    fn signoff_row_fills_both_fields() {
        let mut doc = details_doc(true);
        fill_details_section(&mut doc, &record(), None);
        let details = doc.tables().nth(1).unwrap();
        let last = details.rows.last().unwrap();
        assert_eq!(last.cells[0].text(), "DATE:\n2024-01-08");
        assert_eq!(
            last.cells[1].text(),
            "DESIGNATION AND SIGNATURE\nLead Engineer"
        );
    }

    #[test]
    fn only_first_signature_cell_is_processed() {
        let details = Table {
            properties: None,
            rows: vec![
                row(&["DETAILS OF WORK"]),
                row(&["", ""]),
                row(&["SIGNATURE OF TRAINEE", ""]),
                row(&["SIGNATURE OF TRAINEE", ""]),
            ],
        };
        let mut doc = Document {
            blocks: vec![Block::Table(Table::default()), Block::Table(details)],
        };
        let sig = signature();
        fill_details_section(&mut doc, &record(), Some(&sig));

        let details = doc.tables().nth(1).unwrap();
        let second_match_runs: Vec<&Run> = details.rows[3].cells[1]
            .paragraphs()
            .flat_map(Paragraph::runs)
            .collect();
        assert!(second_match_runs.iter().all(|r| !r.has_image()));
        assert_eq!(details.rows[3].cells[0].text(), "SIGNATURE OF TRAINEE");
    }
}
