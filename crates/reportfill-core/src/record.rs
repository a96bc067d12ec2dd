//! Weekly record input data.
//!
//! One [`WeeklyRecord`] drives one filled output document. Records arrive
//! as a JSON array; every field defaults to empty so partial records fill
//! the template partially instead of failing deserialization.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Weekday names in template row order. Day matching iterates this fixed
/// order, so a day cell that contains more than one day name resolves to
/// the earlier-listed day.
pub const WEEKDAYS: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// One day's activity entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    /// Day name, matched case-insensitively against [`WEEKDAYS`].
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// One week's worth of input data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    #[serde(default)]
    pub week_no: String,
    #[serde(default)]
    pub week_ending: String,
    #[serde(default)]
    pub training_mode: String,
    #[serde(default)]
    pub weekly_activities: Vec<DayActivity>,
    #[serde(default)]
    pub details_notes: String,
    #[serde(default)]
    pub engineer_remarks: String,
    #[serde(default)]
    pub engineer_date: String,
    #[serde(default)]
    pub engineer_designation_signature: String,
}

impl WeeklyRecord {
    /// Output file name for this record, `Daily Report {week_no}.docx`.
    #[must_use]
    pub fn output_file_name(&self) -> String {
        format!("Daily Report {}.docx", self.week_no)
    }
}

/// Map uppercased, trimmed day name to its activity entry. Duplicate days
/// in one record resolve last-write-wins.
#[must_use]
pub fn activity_map(activities: &[DayActivity]) -> HashMap<String, &DayActivity> {
    let mut map = HashMap::new();
    for activity in activities {
        map.insert(activity.day.trim().to_uppercase(), activity);
    }
    map
}

/// Load the weekly records array from `path`.
///
/// An absent file yields an empty batch rather than an error; malformed
/// JSON is surfaced to the caller.
pub fn load_records(path: &Path) -> Result<Vec<WeeklyRecord>> {
    if !path.exists() {
        log::warn!("Data file not found, nothing to fill: {}", path.display());
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let records: Vec<WeeklyRecord> = serde_json::from_str(&content)?;
    log::debug!("Loaded {} weekly records from {}", records.len(), path.display());
    Ok(records)
}
