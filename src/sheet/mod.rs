pub mod coerce;
pub mod tables;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fetched spreadsheet range: rows of text cells, ragged width allowed.
///
/// Everything downstream of the fetch works off an immutable `Grid`
/// snapshot; nothing mutates it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a grid from the JSON cell values of a values-range response.
    /// Numbers and booleans are carried as their plain text form, nulls as
    /// empty strings.
    pub fn from_values(values: Vec<Vec<Value>>) -> Self {
        let rows = values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Column-name → position lookup built once per header row.
///
/// Header names are trimmed; on duplicate names the first column wins.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            positions.entry(name.trim().to_string()).or_insert(i);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

/// Borrowed view of one data row with header-keyed, default-safe access.
///
/// A missing column and a short row read the same way: text getters fall
/// back to their default, numeric getters to `0.0`. Rows never fail to
/// normalize.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    headers: &'a HeaderIndex,
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    pub fn new(headers: &'a HeaderIndex, cells: &'a [String]) -> Self {
        Self { headers, cells }
    }

    /// Raw cell under `name`, or `None` when the column is absent or the
    /// row is too short to reach it.
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        let position = self.headers.position(name)?;
        self.cells.get(position).map(String::as_str)
    }

    pub fn text(&self, name: &str) -> String {
        self.raw(name).unwrap_or_default().to_string()
    }

    /// Like [`text`](Self::text) but empty cells also fall back to
    /// `default`.
    pub fn text_or(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn amount(&self, name: &str) -> f64 {
        coerce::parse_amount(self.raw(name).unwrap_or_default())
    }

    pub fn number(&self, name: &str) -> f64 {
        coerce::parse_cell_number(self.raw(name).unwrap_or_default())
    }

    pub fn dmy_date(&self, name: &str) -> String {
        coerce::parse_dmy_date(self.raw(name).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> (HeaderIndex, Vec<String>) {
        let headers: Vec<String> = ["Name", "Paid", "Date", "Notes"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let cells: Vec<String> = ["Asha", "₹1,500", "17/06/2025 09:00"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        (HeaderIndex::new(&headers), cells)
    }

    #[test]
    fn row_view_reads_typed_cells() {
        let (index, cells) = sample_row();
        let row = RowView::new(&index, &cells);

        assert_eq!(row.text("Name"), "Asha");
        assert_eq!(row.amount("Paid"), 1500.0);
        assert_eq!(row.dmy_date("Date"), "2025-06-17");
    }

    #[test]
    fn short_rows_and_unknown_columns_read_as_defaults() {
        let (index, cells) = sample_row();
        let row = RowView::new(&index, &cells);

        // "Notes" exists in the header but the row stops before it
        assert_eq!(row.raw("Notes"), None);
        assert_eq!(row.text("Notes"), "");
        assert_eq!(row.text_or("Notes", "Unknown"), "Unknown");
        assert_eq!(row.amount("No Such Column"), 0.0);
    }

    #[test]
    fn text_or_replaces_empty_cells() {
        let headers = vec!["Sold By".to_string()];
        let index = HeaderIndex::new(&headers);
        let cells = vec![String::new()];
        let row = RowView::new(&index, &cells);

        assert_eq!(row.text_or("Sold By", "Unknown"), "Unknown");
    }

    #[test]
    fn header_index_trims_and_keeps_first_duplicate() {
        let headers: Vec<String> = [" Location ", "Total", "Location"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let index = HeaderIndex::new(&headers);

        assert_eq!(index.position("Location"), Some(0));
        assert_eq!(index.position("Total"), Some(1));
        assert_eq!(index.position("Missing"), None);
    }

    #[test]
    fn grid_from_values_stringifies_mixed_cells() {
        let grid = Grid::from_values(vec![
            vec![json!("Location"), json!("Jun-2025")],
            vec![json!("Kwality House"), json!(442)],
            vec![json!(null), json!(12.5)],
        ]);

        assert_eq!(grid.rows[1], vec!["Kwality House", "442"]);
        assert_eq!(grid.rows[2], vec!["", "12.5"]);
    }
}
