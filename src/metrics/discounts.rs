//! Discount and revenue aggregates over sales transactions.

use chrono::NaiveDate;
use serde::Serialize;

use super::{group_by_key, guarded_ratio};
use crate::model::SaleRecord;

/// Breakdown label for records with a blank product field.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Metrics over a discounted-transactions set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscountSummary {
    pub total_transactions: usize,
    pub total_discount_amount: f64,
    /// Revenue forgone to discounts; tracked separately from
    /// `total_discount_amount` even though both sum the same field today.
    pub total_revenue_lost: f64,
    pub avg_discount_percentage: f64,
    pub total_potential_revenue: f64,
    pub total_actual_revenue: f64,
    /// Actual revenue as a percentage of list-price revenue; `0` when no
    /// potential revenue exists.
    pub discount_effectiveness: f64,
    pub product_breakdown: Vec<ProductBreakdown>,
    pub monthly_breakdown: Vec<MonthBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductBreakdown {
    pub product: String,
    pub transactions: usize,
    pub total_discount: f64,
    pub avg_discount_percentage: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthBreakdown {
    /// `YYYY-MM`, or `"Unknown"` when the payment date was unparsable.
    pub month: String,
    pub transactions: usize,
    pub total_discount: f64,
    pub revenue: f64,
}

/// Summarize a set of sales transactions.
///
/// Callers decide what the set means: pass `has_discount`-filtered
/// records to analyze discounting, or the full set for gross figures.
pub fn summarize(records: &[SaleRecord]) -> DiscountSummary {
    if records.is_empty() {
        return DiscountSummary::default();
    }

    let total_transactions = records.len();
    let total_discount_amount: f64 = records.iter().map(|r| r.discount_amount).sum();
    let total_revenue_lost: f64 = records.iter().map(|r| r.discount_amount).sum();
    let avg_discount_percentage =
        records.iter().map(|r| r.discount_percentage).sum::<f64>() / total_transactions as f64;
    let total_potential_revenue: f64 = records.iter().map(|r| r.mrp_pre_tax).sum();
    let total_actual_revenue: f64 = records.iter().map(|r| r.payment_value).sum();

    DiscountSummary {
        total_transactions,
        total_discount_amount,
        total_revenue_lost,
        avg_discount_percentage,
        total_potential_revenue,
        total_actual_revenue,
        discount_effectiveness: guarded_ratio(total_actual_revenue, total_potential_revenue) * 100.0,
        product_breakdown: product_breakdown(records),
        monthly_breakdown: monthly_breakdown(records),
    }
}

fn product_key(record: &SaleRecord) -> String {
    if record.cleaned_product.is_empty() {
        UNKNOWN_PRODUCT.to_string()
    } else {
        record.cleaned_product.clone()
    }
}

/// Per-product totals in first-seen product order.
///
/// The average discount percentage is recomputed in a second pass over
/// each group's subset (average of the group, not a running mean); the
/// two diverge under floating-point rounding and downstream consumers
/// expect the group average.
pub fn product_breakdown(records: &[SaleRecord]) -> Vec<ProductBreakdown> {
    group_by_key(records, product_key)
        .into_iter()
        .map(|(product, subset)| {
            let transactions = subset.len();
            let total_discount: f64 = subset.iter().map(|r| r.discount_amount).sum();
            let revenue: f64 = subset.iter().map(|r| r.payment_value).sum();
            let avg_discount_percentage =
                subset.iter().map(|r| r.discount_percentage).sum::<f64>() / transactions as f64;
            ProductBreakdown {
                product,
                transactions,
                total_discount,
                avg_discount_percentage,
                revenue,
            }
        })
        .collect()
}

fn month_key(record: &SaleRecord) -> String {
    NaiveDate::parse_from_str(&record.payment_date, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m").to_string())
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Per-month totals in first-seen month order.
pub fn monthly_breakdown(records: &[SaleRecord]) -> Vec<MonthBreakdown> {
    group_by_key(records, month_key)
        .into_iter()
        .map(|(month, subset)| MonthBreakdown {
            month,
            transactions: subset.len(),
            total_discount: subset.iter().map(|r| r.discount_amount).sum(),
            revenue: subset.iter().map(|r| r.payment_value).sum(),
        })
        .collect()
}

/// Headline sales figures over the full (unfiltered-by-discount)
/// transaction set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesOverview {
    pub total_transactions: usize,
    pub total_revenue: f64,
    pub total_discounts: f64,
    pub discounted_transactions: usize,
    /// Mean discount percentage over discounted transactions only.
    pub avg_discount_percent: f64,
    pub avg_transaction_value: f64,
}

pub fn overview(records: &[SaleRecord]) -> SalesOverview {
    if records.is_empty() {
        return SalesOverview::default();
    }

    let total_transactions = records.len();
    let total_revenue: f64 = records.iter().map(|r| r.payment_value).sum();
    let total_discounts: f64 = records.iter().map(|r| r.discount_amount).sum();
    let discounted: Vec<&SaleRecord> =
        records.iter().filter(|r| r.discount_amount > 0.0).collect();
    let discount_percent_sum: f64 = discounted.iter().map(|r| r.discount_percentage).sum();

    SalesOverview {
        total_transactions,
        total_revenue,
        total_discounts,
        discounted_transactions: discounted.len(),
        avg_discount_percent: guarded_ratio(discount_percent_sum, discounted.len() as f64),
        avg_transaction_value: total_revenue / total_transactions as f64,
    }
}
