use std::{env, sync::Arc};

use anyhow::{Context, Result};
use chrono::{Months, Utc};
use reqwest::Client;
use studiometrics::{
    config::{Config, SourcesConfig},
    fetch::{FallbackSource, FixtureSource, RefreshTokenSource, SheetsClient},
    filter::{DateRange, SaleFilter},
    metrics::{cancellations, clients, discounts, sessions},
    sheet::Grid,
    snapshot::StudioSnapshot,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path =
        env::var("STUDIOMETRICS_CONFIG").unwrap_or_else(|_| "studiometrics.yaml".to_string());
    let config = Config::from_file(&config_path)
        .with_context(|| format!("loading {config_path}"))?;
    info!(config = %config_path, "config loaded");

    // ─── 3) build the grid source: live API, fixture fallback ────────
    let client = Client::new();
    let tokens = Arc::new(RefreshTokenSource::new(client.clone(), config.oauth.clone()));
    let live = SheetsClient::new(client, tokens);
    let source = FallbackSource::new(live, demo_fixture(&config.sources));

    // ─── 4) load one snapshot ────────────────────────────────────────
    let snapshot = StudioSnapshot::load(&source, &config.sources).await?;

    // ─── 5) sales overview over a recent window ──────────────────────
    let today = Utc::now().date_naive();
    let recent = SaleFilter {
        date_range: DateRange::new(today.checked_sub_months(Months::new(6)), Some(today)),
        ..Default::default()
    };
    let recent_sales = recent.apply(&snapshot.sales);
    let overview = discounts::overview(&recent_sales);
    info!(
        transactions = overview.total_transactions,
        revenue = overview.total_revenue,
        discounted = overview.discounted_transactions,
        avg_discount_percent = overview.avg_discount_percent,
        "sales overview, last six months"
    );

    // ─── 6) discount breakdowns ──────────────────────────────────────
    let discounted: Vec<_> = snapshot
        .sales
        .iter()
        .filter(|sale| sale.has_discount())
        .cloned()
        .collect();
    let discount_summary = discounts::summarize(&discounted);
    info!(
        transactions = discount_summary.total_transactions,
        total_discount = discount_summary.total_discount_amount,
        effectiveness = discount_summary.discount_effectiveness,
        "discount summary"
    );
    for product in &discount_summary.product_breakdown {
        info!(
            product = %product.product,
            transactions = product.transactions,
            total_discount = product.total_discount,
            "discounts by product"
        );
    }

    // ─── 7) session format comparison ────────────────────────────────
    let comparison = sessions::compare_formats(&snapshot.sessions);
    info!(
        sessions = comparison.power_cycle.total_sessions,
        fill_rate = comparison.power_cycle.avg_fill_rate,
        no_shows = comparison.power_cycle.no_shows,
        "powercycle"
    );
    info!(
        sessions = comparison.barre.total_sessions,
        fill_rate = comparison.barre.avg_fill_rate,
        no_shows = comparison.barre.no_shows,
        "barre"
    );

    // ─── 8) cancellation tables ──────────────────────────────────────
    for table in &snapshot.cancellations {
        let totals = cancellations::group_totals(table);
        info!(
            kind = table.kind.as_str(),
            groups = totals.len(),
            total = cancellations::table_total(table),
            "late cancellations"
        );
    }

    // ─── 9) new-client cohort ────────────────────────────────────────
    let cohort = clients::summarize(&snapshot.new_clients);
    info!(
        clients = cohort.total_clients,
        conversion_rate = cohort.conversion_rate,
        retention_rate = cohort.retention_rate,
        avg_ltv = cohort.avg_ltv,
        "new-client cohort"
    );

    info!("done");
    Ok(())
}

/// Development fallback mirroring the live sheets' shapes, served when the
/// API is unreachable so the pipeline stays demonstrable offline.
fn demo_fixture(sources: &SourcesConfig) -> FixtureSource {
    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    let sales = grid(&[
        &[
            "Member ID",
            "Customer Name",
            "Customer Email",
            "Payment Date",
            "Payment Value",
            "Payment Item",
            "Payment Method",
            "Sold By",
            "Calculated Location",
            "Cleaned Product",
            "Cleaned Category",
            "Mrp - Pre Tax",
            "Mrp - Post Tax",
            "Discount Amount -Mrp- Payment Value",
            "Discount Percentage - discount amount/mrp*100",
            "Membership Type",
        ],
        &[
            "M001",
            "John Doe",
            "john.doe@email.com",
            "15/01/2025 10:30:00",
            "₹12,000",
            "Unlimited Monthly",
            "Credit Card",
            "-",
            "Kwality House, Kemps Corner",
            "Unlimited Monthly",
            "Membership",
            "15,000",
            "17,700",
            "3,000",
            "20",
            "Premium",
        ],
        &[
            "M002",
            "Jane Smith",
            "jane@email.com",
            "20/02/2025 16:00:00",
            "₹4,500",
            "Class Pack 10",
            "UPI",
            "Priya Shah",
            "Supreme HQ, Bandra",
            "Class Pack 10",
            "Class Pack",
            "5,000",
            "5,900",
            "500",
            "10",
            "",
        ],
        &[
            "M003",
            "Arjun Mehta",
            "arjun@email.com",
            "05/03/2025 09:15:00",
            "₹1,500",
            "Drop In",
            "Cash",
            "",
            "Kenkere House",
            "Drop In",
            "Single Class",
            "1,500",
            "1,770",
            "0",
            "0",
            "",
        ],
    ]);

    let sessions = grid(&[
        &[
            "Class Date",
            "Day of Week",
            "Time",
            "Location",
            "Cleaned Class",
            "Trainer Name",
            "Capacity",
            "Booked",
            "Attended",
            "Late Cancelled",
        ],
        &["17/06/2025", "Tuesday", "07:30", "Supreme HQ, Bandra", "PowerCycle", "Mike Wilson", "14", "12", "10", "1"],
        &["17/06/2025", "Tuesday", "09:00", "Kwality House, Kemps Corner", "Barre 57", "Sarah Johnson", "20", "18", "17", "0"],
        &["18/06/2025", "Wednesday", "18:30", "Supreme HQ, Bandra", "PowerCycle Express", "Mike Wilson", "14", "14", "11", "2"],
        &["19/06/2025", "Thursday", "08:00", "Kenkere House", "Barre 57", "Ana Gomez", "16", "9", "0", "1"],
    ]);

    let cancellations = grid(&[
        &["Late Cancellations by Location"],
        &["Location", "Jun-2025", "Jul-2025", "Aug-2025", "Grand Total"],
        &["Kwality House, Kemps Corner", "442", "462", "500", "1,404"],
        &["Supreme HQ, Bandra", "914", "882", "1,005", "2,801"],
        &["Kenkere House", "79", "71", "44", "194"],
        &["Grand Total", "1,435", "1,415", "1,549", "4,399"],
        &[""],
        &["Late Cancellations by Trainer"],
        &["Location", "Trainer Name", "Jun-2025", "Jul-2025", "Aug-2025"],
        &["Supreme HQ, Bandra", "Mike Wilson", "38", "41", "47"],
        &["Kwality House, Kemps Corner", "Sarah Johnson", "25", "22", "30"],
    ]);

    let new_clients = grid(&[
        &[
            "Member ID", "First Name", "Last Name", "Email", "Phone Number",
            "First Visit Date", "First Visit Entity Name", "First Visit Type",
            "First Visit Location", "Payment Method", "Membership Used", "Home Location",
            "Class No", "Trainer Name", "Is New", "Visits Post Trial",
            "Memberships Bought Post Trial", "Purchase Count Post Trial", "LTV",
            "Retention Status", "Conversion Status", "Period", "Unique ID",
            "First Purchase", "Conversion Span",
        ],
        &[
            "M001", "John", "Doe", "john.doe@email.com", "+91-9876543210", "2024-01-15",
            "Kwality House, Kemps Corner", "Trial Class", "Kwality House, Kemps Corner",
            "Credit Card", "Unlimited Monthly", "Kwality House, Kemps Corner", "12",
            "Sarah Johnson", "Yes", "8", "Unlimited Monthly", "2", "45,000", "Retained",
            "Converted", "Jan-2024", "U-001", "2024-01-20", "5",
        ],
        &[
            "M002", "Jane", "Smith", "jane@email.com", "+91-9876500000", "2024-02-03",
            "Supreme HQ, Bandra", "Trial Class", "Supreme HQ, Bandra", "UPI", "Class Pack 10",
            "Supreme HQ, Bandra", "4", "Mike Wilson", "Yes", "2", "", "0", "6,000",
            "Not Retained", "Not Converted", "Feb-2024", "U-002", "", "0",
        ],
    ]);

    FixtureSource::new()
        .with_grid(&sources.sales.tab, sales)
        .with_grid(&sources.sessions.tab, sessions)
        .with_grid(&sources.late_cancellations.tab, cancellations)
        .with_grid(&sources.new_clients.tab, new_clients)
}
