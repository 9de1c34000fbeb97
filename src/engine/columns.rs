// src/engine/columns.rs
// Header-driven column discovery.

use crate::core::html::Row;
use crate::core::sanitize::normalize_key;

const ID_KEY: &str = "crn";
const SEATS_KEY: &str = "seat";
const CAPACITY_KEY: &str = "cap";

/// Data-cell indices for the columns we read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: usize,
    pub seats: usize,
    pub capacity: Option<usize>,
}

/// Verdict on one header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderMatch {
    /// No identifier-like header; keep looking further down the table.
    NotQualifying,
    /// Identifier header present but the seats column is not; the table is unusable.
    MissingColumn,
    Qualified(ColumnMap),
}

/// Classify a row of `th` cells. Substring matches on lowercased,
/// whitespace-normalized header text; the first hit wins for each column.
pub fn discover(row: &Row) -> HeaderMatch {
    let headers: Vec<String> = row.header_cells().map(|c| normalize_key(c.text())).collect();
    discover_in(&headers)
}

pub fn discover_in<S: AsRef<str>>(headers: &[S]) -> HeaderMatch {
    let find = |key: &str| headers.iter().position(|h| h.as_ref().contains(key));

    let Some(id) = find(ID_KEY) else { return HeaderMatch::NotQualifying };
    let Some(seats) = find(SEATS_KEY) else { return HeaderMatch::MissingColumn };

    HeaderMatch::Qualified(ColumnMap { id, seats, capacity: find(CAPACITY_KEY) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_banner_style_headers() {
        let headers = [
            "crn ?", "course", "title", "schedule type ?", "modality", "cr hrs", "seats", "capacity ?",
        ];
        assert_eq!(
            discover_in(&headers),
            HeaderMatch::Qualified(ColumnMap { id: 0, seats: 6, capacity: Some(7) })
        );
    }

    #[test]
    fn capacity_is_optional() {
        assert_eq!(
            discover_in(&["seats open", "crn"]),
            HeaderMatch::Qualified(ColumnMap { id: 1, seats: 0, capacity: None })
        );
    }

    #[test]
    fn first_matching_header_wins() {
        let m = discover_in(&["crn", "seats avail", "seats total", "cap", "max cap"]);
        assert_eq!(m, HeaderMatch::Qualified(ColumnMap { id: 0, seats: 1, capacity: Some(3) }));
    }

    #[test]
    fn no_crn_does_not_qualify() {
        assert_eq!(discover_in(&["course", "seats"]), HeaderMatch::NotQualifying);
        assert_eq!(discover_in::<&str>(&[]), HeaderMatch::NotQualifying);
    }

    #[test]
    fn crn_without_seats_is_missing_column() {
        assert_eq!(discover_in(&["crn", "capacity"]), HeaderMatch::MissingColumn);
    }
}
