//! Aggregates over the stacked late-cancellation tables.
//!
//! These operate on [`LogicalTable`]s rather than normalized records: the
//! cancellation sheet is already an aggregate, so the work here is
//! regrouping its month columns, not re-deriving counts.

use indexmap::IndexMap;
use serde::Serialize;

use crate::sheet::tables::{LogicalTable, TableKind, TableRow, GRAND_TOTAL_COLUMN};

/// Month-by-month totals for one group (location, class name, trainer or
/// product depending on the table kind).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotals {
    pub key: String,
    pub by_month: IndexMap<String, f64>,
    pub total: f64,
}

fn group_key(kind: TableKind, row: &TableRow) -> String {
    let key = if kind.is_labeled() {
        row.label.as_deref().unwrap_or_default()
    } else {
        row.group.as_str()
    };
    if key.is_empty() {
        "Unknown".to_string()
    } else {
        key.to_string()
    }
}

/// Row total: the sheet's own `Grand Total` cell when present, otherwise
/// the sum of the row's month cells.
fn row_total(row: &TableRow) -> f64 {
    match row.values.get(GRAND_TOTAL_COLUMN) {
        Some(total) => *total,
        None => row
            .values
            .iter()
            .filter(|(column, _)| column.as_str() != GRAND_TOTAL_COLUMN)
            .map(|(_, value)| value)
            .sum(),
    }
}

/// Collapse a table into one totals entry per group, first-seen order.
///
/// Labeled tables repeat the same class/trainer/product across locations;
/// those rows merge into one entry with their month counts summed.
pub fn group_totals(table: &LogicalTable) -> Vec<GroupTotals> {
    let mut groups: IndexMap<String, GroupTotals> = IndexMap::new();
    for row in &table.rows {
        let key = group_key(table.kind, row);
        let entry = groups.entry(key.clone()).or_insert_with(|| GroupTotals {
            key,
            ..Default::default()
        });
        for (column, value) in &row.values {
            if column == GRAND_TOTAL_COLUMN {
                continue;
            }
            *entry.by_month.entry(column.clone()).or_insert(0.0) += value;
        }
        entry.total += row_total(row);
    }
    groups.into_values().collect()
}

/// Whole-table count per month column, in header order.
pub fn month_series(table: &LogicalTable) -> IndexMap<String, f64> {
    let mut months: IndexMap<String, f64> = IndexMap::new();
    for row in &table.rows {
        for (column, value) in &row.values {
            if column == GRAND_TOTAL_COLUMN {
                continue;
            }
            *months.entry(column.clone()).or_insert(0.0) += value;
        }
    }
    months
}

/// Whole-table total across every row.
pub fn table_total(table: &LogicalTable) -> f64 {
    table.rows.iter().map(row_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{tables::scan_tables, Grid};

    fn cancellation_grid() -> Grid {
        let rows: Vec<Vec<String>> = vec![
            vec!["Late Cancellations by Location"],
            vec!["Location", "Jun-2025", "Jul-2025", "Grand Total"],
            vec!["Kwality House, Kemps Corner", "442", "462", "904"],
            vec!["Supreme HQ, Bandra", "914", "882", "1,796"],
            vec![""],
            vec!["Late Cancellations by Trainer"],
            vec!["Location", "Trainer Name", "Jun-2025", "Jul-2025"],
            vec!["Kwality House, Kemps Corner", "Mike", "5", "7"],
            vec!["Supreme HQ, Bandra", "Mike", "3", "1"],
            vec!["Supreme HQ, Bandra", "Sara", "2", "2"],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect();
        Grid::new(rows)
    }

    #[test]
    fn location_totals_use_the_sheets_grand_total_column() {
        let tables = scan_tables(&cancellation_grid());
        let totals = group_totals(&tables[0]);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].key, "Kwality House, Kemps Corner");
        assert_eq!(totals[0].total, 904.0);
        assert_eq!(totals[0].by_month.get("Jun-2025"), Some(&442.0));
        assert_eq!(totals[1].total, 1796.0);
        // the grand-total column never appears as a month
        assert!(totals[0].by_month.get(GRAND_TOTAL_COLUMN).is_none());
    }

    #[test]
    fn labeled_rows_merge_across_locations() {
        let tables = scan_tables(&cancellation_grid());
        let totals = group_totals(&tables[1]);

        let keys: Vec<&str> = totals.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["Mike", "Sara"]);

        let mike = &totals[0];
        assert_eq!(mike.by_month.get("Jun-2025"), Some(&8.0));
        assert_eq!(mike.by_month.get("Jul-2025"), Some(&8.0));
        // no grand-total column here, so totals fall back to month sums
        assert_eq!(mike.total, 16.0);
    }

    #[test]
    fn blank_labels_group_under_unknown() {
        let rows: Vec<Vec<String>> = vec![
            vec!["Location", "Trainer Name", "Jun-2025"],
            vec!["Loc A", "", "4"],
            vec!["Loc B", "", "6"],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect();
        let tables = scan_tables(&Grid::new(rows));
        let totals = group_totals(&tables[0]);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].key, "Unknown");
        assert_eq!(totals[0].total, 10.0);
    }

    #[test]
    fn month_series_sums_whole_columns() {
        let tables = scan_tables(&cancellation_grid());
        let months = month_series(&tables[0]);

        let keys: Vec<&String> = months.keys().collect();
        assert_eq!(keys, vec!["Jun-2025", "Jul-2025"]);
        assert_eq!(months["Jun-2025"], 442.0 + 914.0);
        assert_eq!(months["Jul-2025"], 462.0 + 882.0);
    }

    #[test]
    fn table_total_covers_every_row() {
        let tables = scan_tables(&cancellation_grid());

        assert_eq!(table_total(&tables[0]), 904.0 + 1796.0);
        assert_eq!(table_total(&tables[1]), 20.0);
        let empty = LogicalTable {
            kind: TableKind::ByLocation,
            headers: Vec::new(),
            rows: Vec::new(),
        };
        assert_eq!(table_total(&empty), 0.0);
    }
}
