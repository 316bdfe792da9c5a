use serde::Serialize;

use crate::sheet::{Grid, HeaderIndex, RowView};

/// One scheduled class occurrence with its attendance counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionRecord {
    /// ISO `YYYY-MM-DD`, or `""` when the source date was unparsable.
    pub date: String,
    pub day_of_week: String,
    pub time: String,
    pub location: String,
    pub cleaned_class: String,
    pub trainer_name: String,
    pub capacity: f64,
    pub booked: f64,
    pub attended: f64,
    pub late_cancelled: f64,
}

impl SessionRecord {
    pub fn from_row(row: &RowView<'_>) -> Self {
        Self {
            date: row.dmy_date("Class Date"),
            day_of_week: row.text("Day of Week"),
            time: row.text("Time"),
            location: row.text("Location"),
            cleaned_class: row.text("Cleaned Class"),
            trainer_name: row.text_or("Trainer Name", "Unknown"),
            capacity: row.number("Capacity"),
            booked: row.number("Booked"),
            attended: row.number("Attended"),
            late_cancelled: row.number("Late Cancelled"),
        }
    }

    pub fn from_grid(grid: &Grid) -> Vec<SessionRecord> {
        let Some(headers) = grid.rows.first() else {
            return Vec::new();
        };
        let index = HeaderIndex::new(headers);
        grid.rows[1..]
            .iter()
            .map(|cells| SessionRecord::from_row(&RowView::new(&index, cells)))
            .collect()
    }

    /// Class-format checks match on the cleaned class name, case
    /// insensitively. A name matching both formats counts in both.
    pub fn is_power_cycle(&self) -> bool {
        self.cleaned_class.to_lowercase().contains("powercycle")
    }

    pub fn is_barre(&self) -> bool {
        self.cleaned_class.to_lowercase().contains("barre")
    }

    /// Bookings that never showed up, floored at zero so overbooked or
    /// walk-in sessions cannot count negative.
    pub fn no_shows(&self) -> f64 {
        (self.booked - self.attended).max(0.0)
    }
}
