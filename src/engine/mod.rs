// src/engine/mod.rs
mod engine;
pub mod columns;
pub mod status;
pub mod types;

pub use engine::{extract_from_document, extract_seats, extract_seats_with};
pub use types::{DuplicatePolicy, ExtractOptions, SeatRecord, SeatStatus};
