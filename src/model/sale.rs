use serde::Serialize;

use crate::sheet::{Grid, HeaderIndex, RowView};

/// One sales transaction, normalized from a header-keyed sheet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaleRecord {
    pub member_id: String,
    pub customer_name: String,
    pub customer_email: String,
    /// ISO `YYYY-MM-DD`, or `""` when the source date was unparsable.
    pub payment_date: String,
    pub payment_value: f64,
    pub payment_item: String,
    pub payment_method: String,
    /// `"-"` in the sheet means an unattended channel and maps to
    /// `"Online/System"`; a blank cell maps to `"Unknown"`.
    pub sold_by: String,
    pub location: String,
    pub cleaned_product: String,
    pub cleaned_category: String,
    pub mrp_pre_tax: f64,
    pub mrp_post_tax: f64,
    pub discount_amount: f64,
    pub discount_percentage: f64,
    pub membership_type: String,
}

impl SaleRecord {
    pub fn from_row(row: &RowView<'_>) -> Self {
        let sold_by = match row.raw("Sold By") {
            Some("-") => "Online/System".to_string(),
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => "Unknown".to_string(),
        };

        Self {
            member_id: row.text("Member ID"),
            customer_name: row.text("Customer Name"),
            customer_email: row.text("Customer Email"),
            payment_date: row.dmy_date("Payment Date"),
            payment_value: row.amount("Payment Value"),
            payment_item: row.text("Payment Item"),
            payment_method: row.text("Payment Method"),
            sold_by,
            location: row.text("Calculated Location"),
            cleaned_product: row.text("Cleaned Product"),
            cleaned_category: row.text("Cleaned Category"),
            mrp_pre_tax: row.amount("Mrp - Pre Tax"),
            mrp_post_tax: row.amount("Mrp - Post Tax"),
            discount_amount: row.amount("Discount Amount -Mrp- Payment Value"),
            discount_percentage: row.amount("Discount Percentage - discount amount/mrp*100"),
            membership_type: row.text("Membership Type"),
        }
    }

    /// Normalize every data row of a sales grid. The first row is the
    /// header; a grid without at least one data row yields nothing.
    pub fn from_grid(grid: &Grid) -> Vec<SaleRecord> {
        let Some(headers) = grid.rows.first() else {
            return Vec::new();
        };
        let index = HeaderIndex::new(headers);
        grid.rows[1..]
            .iter()
            .map(|cells| SaleRecord::from_row(&RowView::new(&index, cells)))
            .collect()
    }

    pub fn has_discount(&self) -> bool {
        self.discount_amount > 0.0 || self.discount_percentage > 0.0
    }
}
