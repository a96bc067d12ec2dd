//! Header-area fills: week-ending, training mode, and the week number.

use crate::document::Document;
use crate::record::WeeklyRecord;

use super::anchor::{contains_ci, WEEK_NO_PATTERN};
use super::writers::set_cell_label_value;

/// Fill the week-ending and training-mode fields in row 0 of the schedule
/// table.
///
/// The two checks are independent; either, both, or neither fires
/// depending on the template shape. A missing table, short row, or absent
/// label text skips the corresponding field.
pub fn fill_week_header(doc: &mut Document, record: &WeeklyRecord) {
    let Some(table) = doc.tables_mut().next() else {
        log::debug!("No tables in template, skipping week header");
        return;
    };
    let Some(first_row) = table.rows.first_mut() else {
        return;
    };

    if let Some(cell) = first_row.cells.first_mut() {
        if contains_ci(&cell.text(), "FOR THE WEEK ENDING") {
            set_cell_label_value(cell, "FOR THE WEEK ENDING", Some(&record.week_ending), true);
        }
    }
    if let Some(cell) = first_row.cells.get_mut(3) {
        if contains_ci(&cell.text(), "TRAINING MODE") {
            set_cell_label_value(cell, "TRAINING MODE", Some(&record.training_mode), true);
        }
    }
}

/// Rewrite the "WEEK NO" label paragraph in place with the record's week
/// number, preserving run styling.
///
/// Scans top-level paragraphs for the week-number pattern. Within the
/// first matching paragraph, the first run that itself matches is wholly
/// rewritten to `WEEK NO: {week_no}` and every other run is untouched.
/// When the label is split across runs so that no single run matches, the
/// minimal consecutive run span covering the match is rewritten instead:
/// the first spanned run receives the stamped text, the rest are emptied,
/// and every run keeps its own styling.
pub fn stamp_week_no(doc: &mut Document, week_no: &str) {
    let Some(paragraph) = doc
        .paragraphs_mut()
        .find(|p| WEEK_NO_PATTERN.is_match(&p.text()))
    else {
        log::debug!("Week-number label not found in template");
        return;
    };
    let stamped = format!("WEEK NO: {week_no}");

    if let Some(run) = paragraph
        .runs_mut()
        .find(|r| WEEK_NO_PATTERN.is_match(&r.text()))
    {
        run.set_text(&stamped);
        return;
    }

    // Label split across runs: locate the match in the paragraph text and
    // rewrite the run span that covers it.
    let text = paragraph.text();
    let Some(m) = WEEK_NO_PATTERN.find(&text) else {
        return;
    };
    let mut offset = 0;
    let mut first_in_span = true;
    for run in paragraph.runs_mut() {
        let (start, end) = (offset, offset + run.text().len());
        offset = end;
        if end <= m.start() || start >= m.end() {
            continue;
        }
        if first_in_span {
            run.set_text(&stamped);
            first_in_span = false;
        } else {
            run.set_text("");
        }
    }
}
