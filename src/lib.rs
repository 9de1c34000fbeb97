// src/lib.rs
#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod csv;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod notify;
pub mod watcher;

pub use engine::{extract_seats, extract_seats_with, DuplicatePolicy, ExtractOptions, SeatRecord, SeatStatus};
pub use error::ExtractError;
