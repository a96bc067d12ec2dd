//! Daily activity fills for the weekday rows of the schedule table.

use crate::document::Document;
use crate::record::{activity_map, DayActivity, WEEKDAYS};

use super::writers::set_cell_text;

/// Number of header rows preceding the weekday rows in the schedule table.
const HEADER_ROWS: usize = 2;

/// Day-label cells are often typeset vertically, with the day name broken
/// across lines ("MON-" / "DAY"). Strip everything but letters before
/// matching so hyphenation and line breaks don't hide the day name.
fn normalize_day_text(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// First weekday name contained in the cell text, in [`WEEKDAYS`] order.
fn match_day(cell_text: &str) -> Option<&'static str> {
    let normalized = normalize_day_text(cell_text);
    WEEKDAYS.iter().copied().find(|day| normalized.contains(day))
}

/// Fill date and description cells for each weekday row that has a
/// matching activity entry.
///
/// Rows before index 2 are headers and never touched. A row whose day
/// cell matches no weekday, or whose day has no activity entry, is left
/// unmodified; rows with fewer than three cells are skipped entirely.
pub fn fill_daily_activities(doc: &mut Document, activities: &[DayActivity]) {
    if activities.is_empty() {
        return;
    }
    let map = activity_map(activities);
    let Some(table) = doc.tables_mut().next() else {
        log::debug!("No tables in template, skipping daily activities");
        return;
    };

    for row in table.rows.iter_mut().skip(HEADER_ROWS) {
        if row.cells.len() < 3 {
            continue;
        }
        let Some(day) = match_day(&row.cells[0].text()) else {
            continue;
        };
        let Some(activity) = map.get(day) else {
            continue;
        };
        set_cell_text(&mut row.cells[1], &activity.date);
        set_cell_text(&mut row.cells[2], &activity.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Cell, Paragraph, Row, Run, Table};

    fn cell(text: &str) -> Cell {
        let mut cell = Cell::default();
        for line in text.split('\n') {
            let mut p = Paragraph::default();
            p.push_run(Run::new(line));
            cell.push_paragraph(p);
        }
        cell
    }

    fn schedule_doc(day_labels: &[&str]) -> Document {
        let mut rows = vec![
            Row {
                properties: None,
                cells: vec![cell("FOR THE WEEK ENDING")],
            },
            Row {
                properties: None,
                cells: vec![cell("DAY"), cell("DATE"), cell("DESCRIPTION")],
            },
        ];
        for label in day_labels {
            rows.push(Row {
                properties: None,
                cells: vec![cell(label), cell(""), cell("")],
            });
        }
        Document {
            blocks: vec![Block::Table(Table {
                properties: None,
                rows,
            })],
        }
    }

    fn monday_site_visit() -> Vec<DayActivity> {
        vec![DayActivity {
            day: "Monday".to_string(),
            date: "2024-01-01".to_string(),
            description: "Site visit".to_string(),
        }]
    }

    #[test]
    fn match_day_sees_through_vertical_hyphenation() {
        assert_eq!(match_day("MON-\nDAY"), Some("MONDAY"));
        assert_eq!(match_day("WED-\nNES-\nDAY"), Some("WEDNESDAY"));
        assert_eq!(match_day("holiday"), None);
    }

    #[test]
    fn match_day_first_listed_day_wins() {
        // A cell naming two days resolves to the earlier-listed one.
        assert_eq!(match_day("SATURDAY / SUNDAY"), Some("SATURDAY"));
    }

    #[test]
    fn fills_only_rows_with_matching_activities() {
        let mut doc = schedule_doc(&["MON-\nDAY", "TUE-\nSDAY"]);
        fill_daily_activities(&mut doc, &monday_site_visit());

        let table = doc.tables().next().unwrap();
        let monday = &table.rows[2];
        assert_eq!(monday.cells[1].text(), "2024-01-01");
        assert_eq!(monday.cells[2].text(), "Site visit");

        let tuesday = &table.rows[3];
        assert_eq!(tuesday.cells[1].text(), "");
        assert_eq!(tuesday.cells[2].text(), "");
        assert_eq!(tuesday.cells[1].paragraphs().next().unwrap().runs().count(), 1);
    }

    #[test]
    fn tuesday_row_is_byte_identical_when_only_monday_filled() {
        let mut doc = schedule_doc(&["MON-\nDAY", "TUE-\nSDAY"]);
        let tuesday_before = doc.tables().next().unwrap().rows[3].clone();
        fill_daily_activities(&mut doc, &monday_site_visit());
        assert_eq!(doc.tables().next().unwrap().rows[3], tuesday_before);
    }

    #[test]
    fn header_rows_are_never_touched() {
        let mut doc = schedule_doc(&["MONDAY"]);
        let header_before = doc.tables().next().unwrap().rows[0].clone();
        let secondary_before = doc.tables().next().unwrap().rows[1].clone();
        fill_daily_activities(
            &mut doc,
            &[DayActivity {
                day: "Monday".to_string(),
                date: "d".to_string(),
                description: "x".to_string(),
            }],
        );
        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows[0], header_before);
        assert_eq!(table.rows[1], secondary_before);
    }

    #[test]
    fn short_rows_are_skipped() {
        let mut doc = Document {
            blocks: vec![Block::Table(Table {
                properties: None,
                rows: vec![
                    Row {
                        properties: None,
                        cells: vec![cell("h")],
                    },
                    Row {
                        properties: None,
                        cells: vec![cell("h")],
                    },
                    Row {
                        properties: None,
                        cells: vec![cell("MONDAY"), cell("")],
                    },
                ],
            })],
        };
        let before = doc.clone();
        fill_daily_activities(&mut doc, &monday_site_visit());
        assert_eq!(doc, before);
    }

    #[test]
    fn duplicate_day_entries_last_one_wins() {
        let mut doc = schedule_doc(&["MONDAY"]);
        fill_daily_activities(
            &mut doc,
            &[
                DayActivity {
                    day: "Monday".to_string(),
                    date: "2024-01-01".to_string(),
                    description: "first".to_string(),
                },
                DayActivity {
                    day: "monday".to_string(),
                    date: "2024-01-08".to_string(),
                    description: "second".to_string(),
                },
            ],
        );
        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows[2].cells[1].text(), "2024-01-08");
        assert_eq!(table.rows[2].cells[2].text(), "second");
    }

    #[test]
    fn empty_activity_list_is_a_no_op() {
        let mut doc = schedule_doc(&["MONDAY"]);
        let before = doc.clone();
        fill_daily_activities(&mut doc, &[]);
        assert_eq!(doc, before);
    }
}
