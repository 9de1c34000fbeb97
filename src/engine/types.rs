// src/engine/types.rs
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Normalized availability of one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Open,
    Full,
    Unknown,
    NotFound,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Open => "OPEN",
            SeatStatus::Full => "FULL",
            SeatStatus::Unknown => "UNKNOWN",
            SeatStatus::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified section. Built once per extraction call, never mutated.
/// Serializes with camelCase keys; a NOT_FOUND placeholder carries only
/// `identifier` and `status`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatRecord {
    pub identifier: String,
    pub seats_text: String,
    pub capacity_text: String,
    pub available_seats: Option<i64>,
    pub capacity: Option<i64>,
    pub status: SeatStatus,
}

impl SeatRecord {
    /// Placeholder for a target that no qualifying table mentioned.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            seats_text: s!(),
            capacity_text: s!(),
            available_seats: None,
            capacity: None,
            status: SeatStatus::NotFound,
        }
    }

    pub fn is_open(&self) -> bool { self.status == SeatStatus::Open }
}

impl Serialize for SeatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.status == SeatStatus::NotFound {
            let mut st = serializer.serialize_struct("SeatRecord", 2)?;
            st.serialize_field("identifier", &self.identifier)?;
            st.serialize_field("status", &self.status)?;
            return st.end();
        }
        let mut st = serializer.serialize_struct("SeatRecord", 6)?;
        st.serialize_field("identifier", &self.identifier)?;
        st.serialize_field("seatsText", &self.seats_text)?;
        st.serialize_field("capacityText", &self.capacity_text)?;
        st.serialize_field("availableSeats", &self.available_seats)?;
        st.serialize_field("capacity", &self.capacity)?;
        st.serialize_field("status", &self.status)?;
        st.end()
    }
}

/// Which row wins when the same identifier shows up more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DuplicatePolicy {
    /// Keep the first matching row.
    #[default]
    #[value(name = "first")]
    FirstWins,
    /// Later rows overwrite earlier ones; the record keeps its first position.
    #[value(name = "last")]
    LastWins,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub duplicates: DuplicatePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_serializes_identifier_and_status_only() {
        let v = serde_json::to_value(SeatRecord::not_found("13472")).unwrap();
        assert_eq!(v, json!({ "identifier": "13472", "status": "NOT_FOUND" }));
    }

    #[test]
    fn found_record_keeps_every_field() {
        let r = SeatRecord {
            identifier: s!("13470"),
            seats_text: s!("Full"),
            capacity_text: s!(),
            available_seats: None,
            capacity: None,
            status: SeatStatus::Full,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({
                "identifier": "13470",
                "seatsText": "Full",
                "capacityText": "",
                "availableSeats": null,
                "capacity": null,
                "status": "FULL"
            })
        );
    }
}
