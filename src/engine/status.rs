// src/engine/status.rs
use super::types::SeatStatus;

/// Classify a seats cell. First rule that matches wins:
/// positive count, "full", "open"/"avail", zero count, otherwise unknown.
pub fn derive_status(seats_text: &str, available: Option<i64>) -> SeatStatus {
    let text = seats_text.to_lowercase();

    match available {
        Some(n) if n > 0 => SeatStatus::Open,
        _ if text.contains("full") => SeatStatus::Full,
        _ if text.contains("open") || text.contains("avail") => SeatStatus::Open,
        Some(0) => SeatStatus::Full,
        _ => SeatStatus::Unknown,
    }
}
