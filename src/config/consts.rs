// src/config/consts.rs

// Page
pub const DEFAULT_URL: &str = "https://selfservice.banner.vt.edu/ssb/HZSKVTSC.P_DispRequest";
pub const DEFAULT_TARGETS: &str = "13470,13471";
pub const DEFAULT_SUBJECT: &str = "CS - Computer Science";
pub const DEFAULT_COURSE: &str = "3214";

// Net config
pub const USER_AGENT: &str = concat!("seat_watch/", env!("CARGO_PKG_VERSION"));
pub const PAGE_TIMEOUT_SECS: u64 = 45;
pub const WEBHOOK_TIMEOUT_SECS: u64 = 10;

// Polling
pub const DEFAULT_INTERVAL_MS: u64 = 300_000; // 5 min

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";
