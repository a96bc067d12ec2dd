//! Anchor-based field filling.
//!
//! The engine locates template fields by the literal label text the
//! template author typed (see [`anchor`]) and rewrites them in place with
//! the low-level writers (see [`writers`]). Every step tolerates a missing
//! anchor by skipping silently, so a template that only partially matches
//! the expected shape is filled partially rather than rejected.

pub mod anchor;
pub mod days;
pub mod details;
pub mod header;
pub mod writers;

use crate::document::{Document, InlineImage};
use crate::record::WeeklyRecord;

pub use anchor::{contains_ci, first_cell_containing, first_row_containing, CellRef};
pub use days::fill_daily_activities;
pub use details::fill_details_section;
pub use header::{fill_week_header, stamp_week_no};
pub use writers::{set_cell_label_value, set_cell_text};

/// Run the full fill pipeline for one record against one freshly loaded
/// template document.
///
/// Stage order is fixed — header, week number, daily activities, details —
/// but the stages are independent: none of them adds or removes rows or
/// cells, so each stage addresses the original template structure. Each
/// stage is idempotent, which makes the whole pipeline idempotent for a
/// given record.
///
/// `signature` is the pre-loaded signature image; `None` fills everything
/// except the image placement.
pub fn fill_report(doc: &mut Document, record: &WeeklyRecord, signature: Option<&InlineImage>) {
    fill_week_header(doc, record);
    if !record.week_no.is_empty() {
        stamp_week_no(doc, &record.week_no);
    }
    fill_daily_activities(doc, &record.weekly_activities);
    fill_details_section(doc, record, signature);
}
