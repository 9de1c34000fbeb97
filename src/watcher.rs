// src/watcher.rs
// Polling shell: fetch, extract, compare with last poll, notify.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::config::WatchOptions;
use crate::csv::status_line;
use crate::engine::{extract_seats_with, ExtractOptions, SeatRecord, SeatStatus};
use crate::error::{NotifyError, WatchError};
use crate::fetch::PageSource;
use crate::notify::{open_seat_message, Notifier};

/// Last status seen per identifier. Owned by the caller and handed to every
/// poll, so a fresh memory means "nothing seen yet".
#[derive(Clone, Debug, Default)]
pub struct StatusMemory {
    last: HashMap<String, SeatStatus>,
}

impl StatusMemory {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, identifier: &str) -> Option<SeatStatus> {
        self.last.get(identifier).copied()
    }

    /// Record the new status and return the previous one.
    pub fn observe(&mut self, record: &SeatRecord) -> Option<SeatStatus> {
        self.last.insert(record.identifier.clone(), record.status)
    }

    pub fn len(&self) -> usize { self.last.len() }
    pub fn is_empty(&self) -> bool { self.last.is_empty() }
}

/// Open now, and either we always notify or it wasn't open last time.
pub fn should_notify(current: SeatStatus, previous: Option<SeatStatus>, every_poll: bool) -> bool {
    current == SeatStatus::Open && (every_poll || previous != Some(SeatStatus::Open))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchSettings {
    pub targets: Vec<String>,
    pub course_label: String,
    pub notify_every_poll: bool,
    pub extract: ExtractOptions,
}

impl WatchSettings {
    pub fn from_options(opts: &WatchOptions) -> Self {
        Self {
            targets: opts.targets(),
            course_label: opts.course_label(),
            notify_every_poll: opts.notify_every_poll,
            extract: opts.extract_options(),
        }
    }
}

/// Outcome of one successful poll.
#[derive(Debug, Default)]
pub struct PollReport {
    pub records: Vec<SeatRecord>,
    /// Identifiers whose notification was delivered.
    pub notified: Vec<String>,
    /// Identifier and error text for deliveries that failed.
    pub failed: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug)]
pub struct Schedule {
    pub interval: Duration,
    /// Stop after this many polls; `None` runs forever.
    pub max_polls: Option<u64>,
}

impl Schedule {
    pub fn once() -> Self {
        Self { interval: Duration::ZERO, max_polls: Some(1) }
    }

    pub fn every(interval: Duration) -> Self {
        Self { interval, max_polls: None }
    }
}

pub struct Watcher<P, N> {
    source: P,
    notifier: N,
    settings: WatchSettings,
}

impl<P: PageSource, N: Notifier> Watcher<P, N> {
    pub fn new(source: P, notifier: N, settings: WatchSettings) -> Self {
        Self { source, notifier, settings }
    }

    pub fn settings(&self) -> &WatchSettings { &self.settings }

    /// One fetch/extract/notify cycle. Fetch and parse failures are returned;
    /// notification failures are reported in the `PollReport` instead.
    pub fn poll_once(&self, memory: &mut StatusMemory) -> Result<PollReport, WatchError> {
        let html = self.source.fetch()?;
        let records = extract_seats_with(&html, &self.settings.targets, &self.settings.extract)?;

        let mut due: Vec<&SeatRecord> = Vec::new();
        for r in &records {
            let previous = memory.observe(r);
            logf!("{}", status_line(r));
            if should_notify(r.status, previous, self.settings.notify_every_poll) {
                due.push(r);
            }
        }

        let (notified, failed) = self.deliver(&due);
        Ok(PollReport { records, notified, failed })
    }

    /// Send all notifications of a poll concurrently and wait for every one.
    fn deliver(&self, due: &[&SeatRecord]) -> (Vec<String>, Vec<(String, String)>) {
        let mut notified = Vec::new();
        let mut failed = Vec::new();
        if due.is_empty() {
            return (notified, failed);
        }

        let notifier = &self.notifier;
        let label = self.settings.course_label.as_str();

        let results: Vec<(String, Result<(), String>)> = thread::scope(|scope| {
            let handles: Vec<_> = due
                .iter()
                .map(|r| {
                    let msg = open_seat_message(r, label);
                    let handle = scope.spawn(move || notifier.send(&msg).map_err(|e: NotifyError| e.to_string()));
                    (r.identifier.clone(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, h)| {
                    let res = h.join().unwrap_or_else(|_| Err(s!("delivery thread panicked")));
                    (id, res)
                })
                .collect()
        });

        for (id, res) in results {
            match res {
                Ok(()) => {
                    logf!("Notified: CRN {id} is open");
                    notified.push(id);
                }
                Err(msg) => {
                    loge!("Failed to send notification for CRN {id}: {msg}");
                    failed.push((id, msg));
                }
            }
        }
        (notified, failed)
    }

    /// Poll immediately, then every `schedule.interval` until `max_polls`.
    /// A failed poll is logged and the loop carries on. Returns the poll count.
    pub fn run(
        &self,
        memory: &mut StatusMemory,
        schedule: Schedule,
        mut on_poll: impl FnMut(&PollReport),
    ) -> u64 {
        logf!("Watching {} CRN(s) via {}", self.settings.targets.len(), self.source.describe());

        let mut polls = 0u64;
        loop {
            match self.poll_once(memory) {
                Ok(report) => on_poll(&report),
                Err(e) => loge!("Error while checking seat availability: {e}"),
            }
            polls += 1;

            if schedule.max_polls.is_some_and(|max| polls >= max) {
                break;
            }
            thread::sleep(schedule.interval);
        }
        polls
    }
}
