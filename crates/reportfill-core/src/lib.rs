//! # reportfill-core — weekly report template filling
//!
//! Core library for filling a fixed-layout weekly-report document template
//! with per-week structured data. The crate owns three things:
//!
//! - the in-memory [`document`] tree (tables → rows → cells → paragraphs →
//!   styled runs) that backends parse into and serialize from,
//! - the [`record`] input types describing one week's data, and
//! - the anchor-based [`fill`] engine that locates template fields by
//!   their literal label text and rewrites them in place.
//!
//! Document I/O lives in the backend crates; this crate is pure data
//! transformation and has no opinion about where documents come from.
//!
//! ## Quick start
//!
//! ```rust
//! use reportfill_core::document::Document;
//! use reportfill_core::fill::fill_report;
//! use reportfill_core::record::WeeklyRecord;
//!
//! let mut doc = Document::default(); // normally parsed from a template
//! let record = WeeklyRecord {
//!     week_no: "14".to_string(),
//!     week_ending: "2024-01-07".to_string(),
//!     ..WeeklyRecord::default()
//! };
//! fill_report(&mut doc, &record, None);
//! ```
//!
//! Filling never fails: template regions that don't match the expected
//! anchors are skipped and everything else proceeds. Errors ([`error`])
//! are reserved for the structural and I/O failures of the surrounding
//! pipeline.

pub mod assets;
pub mod document;
pub mod error;
pub mod fill;
pub mod record;

pub use document::{
    Block, Cell, CellItem, Document, ImageFormat, InlineImage, ParaItem, Paragraph, Row, Run,
    RunContent, RunStyle, Table, EMU_PER_INCH,
};
pub use error::{FillError, Result};
pub use record::{DayActivity, WeeklyRecord, WEEKDAYS};
