// src/core/html.rs
// Tolerant table scanner. Walks the markup once, case-insensitive on tag
// names, and keeps only what the extractor needs: tables, their rows, and the
// text of each th/td cell. Everything else is skipped.

use crate::error::ExtractError;
use super::sanitize::{decode_entities, normalize_ws};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind { Header, Data }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    text: String,
}

impl Cell {
    pub fn is_header(&self) -> bool { self.kind == CellKind::Header }

    /// Visible text, entities decoded and whitespace normalized.
    pub fn text(&self) -> &str { &self.text }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn cells(&self) -> &[Cell] { &self.cells }

    pub fn has_header_cells(&self) -> bool {
        self.cells.iter().any(Cell::is_header)
    }

    pub fn header_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_header())
    }

    pub fn data_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.is_header())
    }

    /// Text of the `idx`-th data cell, or "" when the row is shorter.
    pub fn data_text(&self, idx: usize) -> &str {
        self.data_cells().nth(idx).map(Cell::text).unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn rows(&self) -> &[Row] { &self.rows }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    tables: Vec<Table>,
}

impl Document {
    /// Every table, in document order of its opening tag. Nested tables are
    /// listed separately and their rows are not part of the outer table.
    pub fn tables(&self) -> &[Table] { &self.tables }

    pub fn parse(html: &str) -> Result<Self, ExtractError> {
        let mut b = Builder::default();
        let bytes = html.as_bytes();
        let mut i = 0usize;
        let mut text_start = 0usize;

        while let Some(rel) = html[i..].find('<') {
            let lt = i + rel;
            let rest = &bytes[lt + 1..];

            if rest.starts_with(b"!--") {
                b.text(&html[text_start..lt]);
                let end = html[lt + 4..]
                    .find("-->")
                    .ok_or(ExtractError::malformed(lt, "unterminated comment"))?;
                i = lt + 4 + end + 3;
                text_start = i;
                continue;
            }

            match rest.first().copied() {
                // <!DOCTYPE ...>, <![CDATA[...]]>, <?xml ...?>
                Some(b'!') | Some(b'?') => {
                    b.text(&html[text_start..lt]);
                    let end = html[lt..]
                        .find('>')
                        .ok_or(ExtractError::malformed(lt, "unterminated declaration"))?;
                    i = lt + end + 1;
                    text_start = i;
                }
                Some(b'/') if rest.get(1).is_some_and(u8::is_ascii_alphabetic) => {
                    b.text(&html[text_start..lt]);
                    let name = tag_name(bytes, lt + 2);
                    let end = html[lt..]
                        .find('>')
                        .ok_or(ExtractError::malformed(lt, "unterminated closing tag"))?;
                    b.close(&name);
                    i = lt + end + 1;
                    text_start = i;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    b.text(&html[text_start..lt]);
                    let name = tag_name(bytes, lt + 1);
                    let gt = tag_end(bytes, lt + 1 + name.len())
                        .ok_or(ExtractError::malformed(lt, "unterminated tag"))?;
                    i = gt + 1;

                    if name == "script" || name == "style" {
                        // Raw text: jump past the matching close tag.
                        let close = format!("</{name}");
                        i = match find_ci(html, &close, i) {
                            Some(at) => html[at..].find('>').map_or(html.len(), |e| at + e + 1),
                            None => html.len(),
                        };
                    } else {
                        b.open(&name);
                    }
                    text_start = i;
                }
                // Stray '<' in text; keep it as text.
                _ => i = lt + 1,
            }
        }
        b.text(&html[text_start..]);

        Ok(b.finish())
    }
}

/* ---------------- builder ---------------- */

struct OpenTable {
    index: usize,
    row: Option<Row>,
    cell: Option<(CellKind, String)>,
}

#[derive(Default)]
struct Builder {
    tables: Vec<Table>,
    stack: Vec<OpenTable>,
}

impl Builder {
    fn open(&mut self, name: &str) {
        if name == "table" {
            // Only a table inside a cell nests; anywhere else it ends the open one.
            if self.stack.last().is_some_and(|t| t.cell.is_none()) {
                self.close_table();
            }
            self.tables.push(Table::default());
            self.stack.push(OpenTable { index: self.tables.len() - 1, row: None, cell: None });
            return;
        }

        let Some(top) = self.stack.last_mut() else { return };
        match name {
            "tr" => {
                close_row(&mut self.tables, top);
                top.row = Some(Row::default());
            }
            "th" | "td" => {
                close_cell(top);
                top.row.get_or_insert_with(Row::default);
                let kind = if name == "th" { CellKind::Header } else { CellKind::Data };
                top.cell = Some((kind, s!()));
            }
            "thead" | "tbody" | "tfoot" => close_row(&mut self.tables, top),
            "br" => {
                if let Some((_, buf)) = top.cell.as_mut() { buf.push(' '); }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        if name == "table" {
            self.close_table();
            return;
        }

        let Some(top) = self.stack.last_mut() else { return };
        match name {
            "th" | "td" => close_cell(top),
            "tr" | "thead" | "tbody" | "tfoot" => close_row(&mut self.tables, top),
            _ => {}
        }
    }

    fn text(&mut self, s: &str) {
        if s.is_empty() { return; }
        if let Some((_, buf)) = self.stack.last_mut().and_then(|t| t.cell.as_mut()) {
            buf.push_str(s);
        }
    }

    fn close_table(&mut self) {
        if let Some(mut top) = self.stack.pop() {
            close_row(&mut self.tables, &mut top);
        }
    }

    /// End of input closes whatever is still open, innermost first.
    fn finish(mut self) -> Document {
        while !self.stack.is_empty() {
            self.close_table();
        }
        Document { tables: self.tables }
    }
}

fn close_cell(top: &mut OpenTable) {
    if let Some((kind, raw)) = top.cell.take() {
        let text = normalize_ws(&decode_entities(&raw));
        top.row.get_or_insert_with(Row::default).cells.push(Cell { kind, text });
    }
}

fn close_row(tables: &mut [Table], top: &mut OpenTable) {
    close_cell(top);
    if let Some(row) = top.row.take() {
        tables[top.index].rows.push(row);
    }
}

/* ---------------- byte helpers ---------------- */

/// ASCII-lowercased tag name starting at `from`.
fn tag_name(bytes: &[u8], from: usize) -> String {
    bytes[from..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .map(|b| b.to_ascii_lowercase() as char)
        .collect()
}

/// Index of the '>' closing a start tag. Quoted attribute values may contain '>'.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    let mut after_eq = false;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            q @ (b'"' | b'\'') if after_eq => {
                let close = bytes[i + 1..].iter().position(|&b| b == q)?;
                i += close + 2;
                after_eq = false;
                continue;
            }
            b'=' => after_eq = true,
            b if b.is_ascii_whitespace() => {}
            _ => after_eq = false,
        }
        i += 1;
    }
    None
}

/// Case-insensitive (ASCII) search for `pat` in `s[from..]`.
fn find_ci(s: &str, pat: &str, from: usize) -> Option<usize> {
    let hay = s.as_bytes().get(from..)?;
    let pat = pat.as_bytes();
    if pat.is_empty() || hay.len() < pat.len() { return None; }
    hay.windows(pat.len())
        .position(|w| w.eq_ignore_ascii_case(pat))
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(row: &Row) -> Vec<&str> {
        row.cells().iter().map(Cell::text).collect()
    }

    #[test]
    fn reads_headers_and_cells() {
        let doc = Document::parse(
            "<TABLE><Tr><TH>CRN ?</th><th>Seats</th></tr><tr><td> 13470 </td><td>Full&nbsp;0</td></tr></table>",
        ).unwrap();
        assert_eq!(doc.tables().len(), 1);
        let rows = doc.tables()[0].rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].has_header_cells());
        assert_eq!(texts(&rows[0]), ["CRN ?", "Seats"]);
        assert!(!rows[1].has_header_cells());
        assert_eq!(texts(&rows[1]), ["13470", "Full 0"]);
    }

    #[test]
    fn implicit_closes_and_sections() {
        let html = r#"
            <table>
              <thead><tr><th>CRN<th>Seats</thead>
              <tbody>
                <tr><td>1<td>Open
                <tr><td>2<td>Full
              </tbody>
            </table>"#;
        let doc = Document::parse(html).unwrap();
        let rows = doc.tables()[0].rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(texts(&rows[1]), ["1", "Open"]);
        assert_eq!(texts(&rows[2]), ["2", "Full"]);
    }

    #[test]
    fn nested_tables_are_separate() {
        let html = "<table><tr><td>outer<table><tr><td>inner</td></tr></table> tail</td></tr></table>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.tables().len(), 2);
        assert_eq!(texts(&doc.tables()[0].rows()[0]), ["outer tail"]);
        assert_eq!(texts(&doc.tables()[1].rows()[0]), ["inner"]);
    }

    #[test]
    fn skips_comments_scripts_and_nested_markup() {
        let html = r#"<!DOCTYPE html><table><tr>
            <td><a href="x?a=1&b=2" title="a > b">Avail</a><br/>14<!-- <td>bogus</td> --></td>
            <td><script>if (a < b) { document.write("<td>") }</script>ok</td>
        </tr></table>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(texts(&doc.tables()[0].rows()[0]), ["Avail 14", "ok"]);
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let doc = Document::parse("<table><tr><td>a < b</td></tr></table>").unwrap();
        assert_eq!(texts(&doc.tables()[0].rows()[0]), ["a < b"]);
    }

    #[test]
    fn data_text_out_of_range_is_empty() {
        let doc = Document::parse("<table><tr><th>x</th><td>a</td></tr></table>").unwrap();
        let row = &doc.tables()[0].rows()[0];
        assert_eq!(row.data_text(0), "a");
        assert_eq!(row.data_text(3), "");
    }

    #[test]
    fn no_tables_is_fine() {
        assert!(Document::parse("").unwrap().tables().is_empty());
        assert!(Document::parse("<p>nothing here</p>").unwrap().tables().is_empty());
    }

    #[test]
    fn truncated_markup_is_malformed() {
        assert!(Document::parse("<table><tr><td>1</td></tr></table><div class=\"x").is_err());
        assert!(Document::parse("<table></table><!-- never closed").is_err());
        assert!(Document::parse("<table><tr><td>1</td></tr></tab").is_err());
    }

    #[test]
    fn unclosed_tables_close_at_end_of_input() {
        let doc = Document::parse("<table><tr><th>CRN</th><td>1</td></tr><tr><td>2<td>Open").unwrap();
        assert_eq!(doc.tables().len(), 1);
        let rows = doc.tables()[0].rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows[1]), ["2", "Open"]);

        let doc = Document::parse("<table><tr><td>outer<table><tr><td>inner").unwrap();
        assert_eq!(doc.tables().len(), 2);
        assert_eq!(texts(&doc.tables()[0].rows()[0]), ["outer"]);
        assert_eq!(texts(&doc.tables()[1].rows()[0]), ["inner"]);
    }

    #[test]
    fn table_outside_a_cell_ends_the_open_table() {
        let html = "<table><tr><td>nav</td></tr><table><tr><th>CRN</th></tr><tr><td>1</td></tr></table>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.tables().len(), 2);
        assert_eq!(doc.tables()[0].rows().len(), 1);
        assert_eq!(texts(&doc.tables()[0].rows()[0]), ["nav"]);
        assert_eq!(doc.tables()[1].rows().len(), 2);
    }
}
