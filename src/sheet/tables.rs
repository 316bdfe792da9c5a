use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::{coerce, Grid};

/// First-column value that marks a header row and opens a new table.
const HEADER_SENTINEL: &str = "Location";

/// First-column fragments that mark decorative section titles.
const SECTION_TITLE_MARKERS: &[&str] = &["Late Cancellations", "Members with >1"];

/// Column header (and first-column marker) of the sheet's own totals.
pub const GRAND_TOTAL_COLUMN: &str = "Grand Total";

/// What a stacked table counts by, read from its second header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    ByLocation,
    ByClass,
    ByTrainer,
    ByProduct,
}

impl TableKind {
    fn from_second_header(cell: Option<&str>) -> Self {
        match cell {
            Some("Cleaned Class") => TableKind::ByClass,
            Some("Trainer Name") => TableKind::ByTrainer,
            Some("Cleaned Product") => TableKind::ByProduct,
            _ => TableKind::ByLocation,
        }
    }

    /// Labeled kinds carry an entity name in the second column, so their
    /// numeric columns start one position later than `ByLocation`.
    pub fn is_labeled(&self) -> bool {
        !matches!(self, TableKind::ByLocation)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::ByLocation => "by-location",
            TableKind::ByClass => "by-class",
            TableKind::ByTrainer => "by-trainer",
            TableKind::ByProduct => "by-product",
        }
    }
}

/// One data row of a stacked table: the location in column 0, an optional
/// entity label, and the numeric cells keyed by their header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub group: String,
    pub label: Option<String>,
    pub values: IndexMap<String, f64>,
}

/// One logical table recovered from a stacked sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalTable {
    pub kind: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Scan a sheet holding several tables stacked vertically and split it
/// into its logical tables.
///
/// Rows are classified in one pass: a row containing the header sentinel
/// opens a new table (its kind read from the second header cell), section
/// titles and the sheet's own `Grand Total` rows are dropped, rows with an
/// empty first cell are separators, and everything else is data for the
/// most recently opened table. Data before any header is skipped. A grid
/// shorter than two rows yields no tables.
pub fn scan_tables(grid: &Grid) -> Vec<LogicalTable> {
    if grid.rows.len() < 2 {
        return Vec::new();
    }

    let mut tables: Vec<LogicalTable> = Vec::new();
    for row in &grid.rows {
        let Some(first) = row.first().filter(|cell| !cell.is_empty()) else {
            continue;
        };

        if first == HEADER_SENTINEL || row.iter().any(|cell| cell == HEADER_SENTINEL) {
            let kind = TableKind::from_second_header(row.get(1).map(String::as_str));
            debug!(kind = kind.as_str(), columns = row.len(), "table header");
            tables.push(LogicalTable {
                kind,
                headers: row.clone(),
                rows: Vec::new(),
            });
            continue;
        }

        let is_title = SECTION_TITLE_MARKERS.iter().any(|marker| first.contains(marker));
        if is_title || first == GRAND_TOTAL_COLUMN {
            continue;
        }

        let Some(current) = tables.last_mut() else {
            continue;
        };

        let label = if current.kind.is_labeled() {
            row.get(1).filter(|cell| !cell.is_empty()).cloned()
        } else {
            None
        };
        let numeric_start = if current.kind.is_labeled() { 2 } else { 1 };

        let mut values = IndexMap::new();
        for (position, header) in current.headers.iter().enumerate().skip(numeric_start) {
            if header.is_empty() {
                continue;
            }
            let cell = row.get(position).map(String::as_str).unwrap_or_default();
            values.insert(header.clone(), coerce::parse_cell_number(cell));
        }

        current.rows.push(TableRow {
            group: first.clone(),
            label,
            values,
        });
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("studiometrics::sheet=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn labeled_table_aligns_numbers_after_the_label() {
        let grid = grid(&[
            &["Location", "Cleaned Class", "Jun-2025", "Grand Total"],
            &["Loc A", "Yoga", "10", "50"],
        ]);

        let tables = scan_tables(&grid);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].kind, TableKind::ByClass);

        let row = &tables[0].rows[0];
        assert_eq!(row.group, "Loc A");
        assert_eq!(row.label.as_deref(), Some("Yoga"));
        assert_eq!(row.values.get("Jun-2025"), Some(&10.0));
        assert_eq!(row.values.get("Grand Total"), Some(&50.0));
    }

    #[test]
    fn by_location_numbers_start_in_the_second_column() {
        let grid = grid(&[
            &["Location", "Jun-2025", "Jul-2025", "Grand Total"],
            &["Kwality House, Kemps Corner", "442", "462", "4,481"],
        ]);

        let tables = scan_tables(&grid);
        assert_eq!(tables[0].kind, TableKind::ByLocation);

        let row = &tables[0].rows[0];
        assert_eq!(row.label, None);
        assert_eq!(row.values.get("Jun-2025"), Some(&442.0));
        assert_eq!(row.values.get("Jul-2025"), Some(&462.0));
        assert_eq!(row.values.get("Grand Total"), Some(&4481.0));
    }

    #[test]
    fn stacked_tables_do_not_leak_rows_into_each_other() {
        init_test_logging();
        let grid = grid(&[
            &["Late Cancellations by Location"],
            &["Location", "Jun-2025"],
            &["Loc A", "5"],
            &["Loc B", "7"],
            &["Grand Total", "12"],
            &[""],
            &["Late Cancellations by Class"],
            &["Location", "Cleaned Class", "Jun-2025"],
            &["Loc A", "Barre 57", "3"],
            &[""],
            &["Late Cancellations by Trainer"],
            &["Location", "Trainer Name", "Jun-2025"],
            &["Loc A", "Mike", "2"],
            &["Loc B", "Sara", "4"],
        ]);

        let tables = scan_tables(&grid);
        assert_eq!(tables.len(), 3);
        assert_eq!(
            tables.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TableKind::ByLocation, TableKind::ByClass, TableKind::ByTrainer],
        );
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[1].rows.len(), 1);
        assert_eq!(tables[2].rows.len(), 2);
        assert_eq!(tables[1].rows[0].label.as_deref(), Some("Barre 57"));
    }

    #[test]
    fn rows_before_any_header_are_dropped() {
        let grid = grid(&[
            &["Orphan", "1", "2"],
            &["Location", "Jun-2025"],
            &["Loc A", "5"],
        ]);

        let tables = scan_tables(&grid);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 1);
        assert_eq!(tables[0].rows[0].group, "Loc A");
    }

    #[test]
    fn grand_total_rows_do_not_close_the_table() {
        let grid = grid(&[
            &["Location", "Jun-2025"],
            &["Loc A", "5"],
            &["Grand Total", "5"],
            &["Loc B", "9"],
        ]);

        let tables = scan_tables(&grid);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[1].group, "Loc B");
    }

    #[test]
    fn short_and_artifact_cells_read_as_zero() {
        let grid = grid(&[
            &["Location", "Jun-2025", "Jul-2025", "Aug-2025"],
            &["Loc A", "30-12-1899", "4"],
        ]);

        let tables = scan_tables(&grid);
        let row = &tables[0].rows[0];
        assert_eq!(row.values.get("Jun-2025"), Some(&0.0));
        assert_eq!(row.values.get("Jul-2025"), Some(&4.0));
        // the row is shorter than the header; missing cells count as zero
        assert_eq!(row.values.get("Aug-2025"), Some(&0.0));
    }

    #[test]
    fn fewer_than_two_rows_yields_nothing() {
        assert!(scan_tables(&grid(&[])).is_empty());
        assert!(scan_tables(&grid(&[&["Location", "Jun-2025"]])).is_empty());
    }
}
