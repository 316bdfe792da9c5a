use serde::Serialize;

use crate::sheet::{coerce, Grid};

/// One row of the new-client cohort export.
///
/// This source has no stable header row, so fields are read positionally.
/// Column meanings follow the export's fixed 25-column layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewClientRecord {
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub first_visit_date: String,
    pub first_visit_entity_name: String,
    pub first_visit_type: String,
    pub first_visit_location: String,
    pub payment_method: String,
    pub membership_used: String,
    pub home_location: String,
    pub class_no: f64,
    pub trainer_name: String,
    pub is_new: String,
    pub visits_post_trial: f64,
    pub memberships_bought_post_trial: String,
    pub purchase_count_post_trial: f64,
    pub ltv: f64,
    pub retention_status: String,
    pub conversion_status: String,
    pub period: String,
    pub unique_id: String,
    pub first_purchase: String,
    /// Days from first visit to conversion; `0` for unconverted clients.
    pub conversion_span: f64,
}

impl NewClientRecord {
    pub fn from_cells(cells: &[String]) -> Self {
        let text = |i: usize| cells.get(i).cloned().unwrap_or_default();
        let number = |i: usize| coerce::parse_amount(cells.get(i).map(String::as_str).unwrap_or_default());

        Self {
            member_id: text(0),
            first_name: text(1),
            last_name: text(2),
            email: text(3),
            phone_number: text(4),
            first_visit_date: text(5),
            first_visit_entity_name: text(6),
            first_visit_type: text(7),
            first_visit_location: text(8),
            payment_method: text(9),
            membership_used: text(10),
            home_location: text(11),
            class_no: number(12),
            trainer_name: text(13),
            is_new: text(14),
            visits_post_trial: number(15),
            memberships_bought_post_trial: text(16),
            purchase_count_post_trial: number(17),
            ltv: number(18),
            retention_status: text(19),
            conversion_status: text(20),
            period: text(21),
            unique_id: text(22),
            first_purchase: text(23),
            conversion_span: number(24),
        }
    }

    /// Normalize every data row. The first row is a header and is skipped;
    /// a grid shorter than two rows yields nothing.
    pub fn from_grid(grid: &Grid) -> Vec<NewClientRecord> {
        if grid.rows.len() < 2 {
            return Vec::new();
        }
        grid.rows[1..].iter().map(|cells| NewClientRecord::from_cells(cells)).collect()
    }

    pub fn is_converted(&self) -> bool {
        self.conversion_status == "Converted"
    }

    pub fn is_retained(&self) -> bool {
        self.retention_status == "Retained"
    }
}
