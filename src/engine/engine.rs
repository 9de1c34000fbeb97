// src/engine/engine.rs
use std::collections::HashMap;

use crate::core::html::{Document, Row, Table};
use crate::core::sanitize::{first_int, normalize_ws};
use crate::error::ExtractError;
use crate::engine::columns::{self, ColumnMap, HeaderMatch};
use crate::engine::status::derive_status;
use crate::engine::types::*;

/// Extract one record per target from a results page, first matching row wins.
pub fn extract_seats<S: AsRef<str>>(html: &str, targets: &[S]) -> Result<Vec<SeatRecord>, ExtractError> {
    extract_seats_with(html, targets, &ExtractOptions::default())
}

pub fn extract_seats_with<S: AsRef<str>>(
    html: &str,
    targets: &[S],
    opts: &ExtractOptions,
) -> Result<Vec<SeatRecord>, ExtractError> {
    let doc = Document::parse(html)?;
    logd!("Extract: parsed {} bytes, {} table(s)", html.len(), doc.tables().len());
    Ok(extract_from_document(&doc, targets, opts))
}

/// Matched records in discovery order, then `NOT_FOUND` placeholders in target order.
pub fn extract_from_document<S: AsRef<str>>(
    doc: &Document,
    targets: &[S],
    opts: &ExtractOptions,
) -> Vec<SeatRecord> {
    let targets = TargetSet::new(targets);
    let mut found = Found::default();

    for (t, table) in doc.tables().iter().enumerate() {
        scan_table(t, table, &targets, opts.duplicates, &mut found);
    }

    let mut out = found.records;
    for id in targets.ordered() {
        if !found.by_key.contains_key(&key(id)) {
            out.push(SeatRecord::not_found(id.as_str()));
        }
    }
    out
}

fn scan_table(t: usize, table: &Table, targets: &TargetSet, policy: DuplicatePolicy, found: &mut Found) {
    let mut layout: Option<ColumnMap> = None;
    let mut matched = 0usize;

    for row in table.rows() {
        // Everything up to and including the qualifying header row is ignored.
        let Some(cols) = layout else {
            if row.has_header_cells() {
                match columns::discover(row) {
                    HeaderMatch::Qualified(map) => layout = Some(map),
                    HeaderMatch::MissingColumn => {
                        logd!("Extract: table #{t} has a CRN header but no seats column; skipped");
                        return;
                    }
                    HeaderMatch::NotQualifying => {}
                }
            }
            continue;
        };

        if row.data_cells().next().is_none() { continue; }

        let Some(identifier) = targets.lookup(row.data_text(cols.id)) else { continue };
        found.insert(build_record(identifier, row, cols), policy);
        matched += 1;
    }

    if layout.is_some() {
        logd!("Extract: table #{t} matched {matched} target row(s)");
    }
}

fn build_record(identifier: &str, row: &Row, cols: ColumnMap) -> SeatRecord {
    let seats_text = normalize_ws(row.data_text(cols.seats));
    let capacity_text = cols.capacity.map(|c| normalize_ws(row.data_text(c))).unwrap_or_default();
    let available_seats = first_int(&seats_text);
    let capacity = first_int(&capacity_text);
    let status = derive_status(&seats_text, available_seats);

    SeatRecord {
        identifier: s!(identifier),
        seats_text,
        capacity_text,
        available_seats,
        capacity,
        status,
    }
}

/* ---------------- helpers ---------------- */

/// Lookup key: normalized whitespace, ASCII case folded.
fn key(s: &str) -> String {
    normalize_ws(s).to_ascii_lowercase()
}

/// Cleaned target list: normalized, blanks dropped, duplicates collapsed onto
/// their first occurrence.
struct TargetSet {
    ordered: Vec<String>,
    by_key: HashMap<String, usize>,
}

impl TargetSet {
    fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut ordered = Vec::with_capacity(raw.len());
        let mut by_key = HashMap::with_capacity(raw.len());
        for t in raw {
            let id = normalize_ws(t.as_ref());
            if id.is_empty() { continue; }
            if let std::collections::hash_map::Entry::Vacant(slot) = by_key.entry(key(&id)) {
                slot.insert(ordered.len());
                ordered.push(id);
            }
        }
        Self { ordered, by_key }
    }

    fn ordered(&self) -> &[String] { &self.ordered }

    /// The caller's spelling of `cell`, if it is a target.
    fn lookup(&self, cell: &str) -> Option<&str> {
        if cell.is_empty() { return None; }
        self.by_key.get(&key(cell)).map(|&i| self.ordered[i].as_str())
    }
}

#[derive(Default)]
struct Found {
    records: Vec<SeatRecord>,
    by_key: HashMap<String, usize>,
}

impl Found {
    fn insert(&mut self, record: SeatRecord, policy: DuplicatePolicy) {
        let k = key(&record.identifier);
        match (self.by_key.get(&k).copied(), policy) {
            (None, _) => {
                self.by_key.insert(k, self.records.len());
                self.records.push(record);
            }
            (Some(_), DuplicatePolicy::FirstWins) => {
                logd!("Extract: CRN {} seen again; keeping first row", record.identifier);
            }
            (Some(i), DuplicatePolicy::LastWins) => {
                logd!("Extract: CRN {} seen again; replacing earlier row", record.identifier);
                self.records[i] = record;
            }
        }
    }
}
