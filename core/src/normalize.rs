//! Dataset normalization: trimmed column names and parsed submission dates.
//!
//! Unparseable or missing dates become `Cell::Null` (the unknown marker),
//! never an error. Running `normalize_table` on its own output is a no-op.

use crate::model::{Cell, Column, RawTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub fn normalize_table(mut table: RawTable) -> RawTable {
    for name in table.columns.iter_mut() {
        let trimmed = name.trim();
        if trimmed.len() != name.len() {
            *name = trimmed.to_string();
        }
    }

    let Some(idx) = table.column_index(Column::SubmissionDate.name()) else {
        log::warn!(
            "normalize: column {} not found, claim ages unavailable",
            Column::SubmissionDate.name()
        );
        return table;
    };

    let mut unknown = 0usize;
    for row in table.rows.iter_mut() {
        if let Some(cell) = row.get_mut(idx) {
            *cell = match coerce_date(cell) {
                Some(date) => Cell::Date(date),
                None => {
                    unknown += 1;
                    Cell::Null
                }
            };
        }
    }
    if unknown > 0 {
        log::debug!("normalize: {unknown} submission dates unknown");
    }
    table
}

/// Interpret a cell as a calendar date, if it holds one.
pub fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_date(s),
        _ => None,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
