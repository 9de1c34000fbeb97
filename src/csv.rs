// src/csv.rs
// Per-poll output: records as CSV/TSV rows, JSON, or the plain status lines.
use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::engine::SeatRecord;

pub const HEADERS: [&str; 6] = ["CRN", "Status", "Seats", "Available", "Capacity text", "Capacity"];

fn opt_num(n: Option<i64>) -> String {
    n.map(|v| v.to_string()).unwrap_or_default()
}

/// Flatten one record in `HEADERS` order. Absent numbers become empty cells.
pub fn record_row(r: &SeatRecord) -> Vec<String> {
    vec![
        r.identifier.clone(),
        s!(r.status.as_str()),
        r.seats_text.clone(),
        opt_num(r.available_seats),
        r.capacity_text.clone(),
        opt_num(r.capacity),
    ]
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 { write!(w, "{sep}")?; }
        let cell = cell.as_ref();
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// The line logged and printed for every record each poll.
pub fn status_line(r: &SeatRecord) -> String {
    format!("[CRN {}] Status: {} (Seats: {})", r.identifier, r.status, r.seats_text)
}

/// Render one poll's records in the chosen format.
pub fn write_records<W: Write>(mut w: W, records: &[SeatRecord], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for r in records {
                writeln!(w, "{}", status_line(r))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut w, records)?;
            writeln!(w)?;
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            let sep = format.delim().unwrap_or(',');
            write_row(&mut w, &HEADERS, sep)?;
            for r in records {
                write_row(&mut w, &record_row(r), sep)?;
            }
        }
    }
    w.flush()
}

pub fn records_to_string(records: &[SeatRecord], format: OutputFormat) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_records(&mut buf, records, format);

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SeatStatus;

    fn sample() -> Vec<SeatRecord> {
        vec![
            SeatRecord {
                identifier: s!("13471"),
                seats_text: s!("Avail, 14"),
                capacity_text: s!("150"),
                available_seats: Some(14),
                capacity: Some(150),
                status: SeatStatus::Open,
            },
            SeatRecord::not_found("99999"),
        ]
    }

    #[test]
    fn csv_quotes_and_blanks() {
        let s = records_to_string(&sample(), OutputFormat::Csv);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "CRN,Status,Seats,Available,Capacity text,Capacity");
        assert_eq!(lines[1], "13471,OPEN,\"Avail, 14\",14,150,150");
        assert_eq!(lines[2], "99999,NOT_FOUND,,,,");
    }

    #[test]
    fn tsv_needs_no_quotes_for_commas() {
        let s = records_to_string(&sample(), OutputFormat::Tsv);
        assert!(s.contains("13471\tOPEN\tAvail, 14\t14\t150\t150\n"));
    }

    #[test]
    fn json_uses_camel_case_and_status_names() {
        let s = records_to_string(&sample(), OutputFormat::Json);
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v[0]["identifier"], "13471");
        assert_eq!(v[0]["availableSeats"], 14);
        assert_eq!(v[0]["status"], "OPEN");
        assert_eq!(v[1]["status"], "NOT_FOUND");
        assert_eq!(v[1], serde_json::json!({ "identifier": "99999", "status": "NOT_FOUND" }));
    }

    #[test]
    fn text_lines() {
        let s = records_to_string(&sample(), OutputFormat::Text);
        assert_eq!(
            s,
            "[CRN 13471] Status: OPEN (Seats: Avail, 14)\n[CRN 99999] Status: NOT_FOUND (Seats: )\n"
        );
    }
}
