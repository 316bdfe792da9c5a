//! Conversion and retention aggregates over new-client cohorts.

use serde::Serialize;

use super::{group_by_key, guarded_ratio};
use crate::model::NewClientRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientCohortSummary {
    pub total_clients: usize,
    pub converted: usize,
    pub retained: usize,
    /// Converted clients as a percentage of the cohort.
    pub conversion_rate: f64,
    pub retention_rate: f64,
    pub total_ltv: f64,
    pub avg_ltv: f64,
    pub avg_visits_post_trial: f64,
    /// Mean days to conversion, over converted clients only.
    pub avg_conversion_span: f64,
    pub location_breakdown: Vec<LocationCohort>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationCohort {
    pub location: String,
    pub clients: usize,
    pub converted: usize,
    pub retained: usize,
    pub total_ltv: f64,
}

fn location_key(client: &NewClientRecord) -> String {
    if client.first_visit_location.is_empty() {
        "Unknown".to_string()
    } else {
        client.first_visit_location.clone()
    }
}

pub fn summarize(clients: &[NewClientRecord]) -> ClientCohortSummary {
    if clients.is_empty() {
        return ClientCohortSummary::default();
    }

    let total_clients = clients.len();
    let converted: Vec<&NewClientRecord> =
        clients.iter().filter(|c| c.is_converted()).collect();
    let retained = clients.iter().filter(|c| c.is_retained()).count();
    let total_ltv: f64 = clients.iter().map(|c| c.ltv).sum();
    let visits: f64 = clients.iter().map(|c| c.visits_post_trial).sum();
    let conversion_span_sum: f64 = converted.iter().map(|c| c.conversion_span).sum();

    let location_breakdown = group_by_key(clients, location_key)
        .into_iter()
        .map(|(location, subset)| LocationCohort {
            location,
            clients: subset.len(),
            converted: subset.iter().filter(|c| c.is_converted()).count(),
            retained: subset.iter().filter(|c| c.is_retained()).count(),
            total_ltv: subset.iter().map(|c| c.ltv).sum(),
        })
        .collect();

    ClientCohortSummary {
        total_clients,
        converted: converted.len(),
        retained,
        conversion_rate: converted.len() as f64 / total_clients as f64 * 100.0,
        retention_rate: retained as f64 / total_clients as f64 * 100.0,
        total_ltv,
        avg_ltv: total_ltv / total_clients as f64,
        avg_visits_post_trial: visits / total_clients as f64,
        avg_conversion_span: guarded_ratio(conversion_span_sum, converted.len() as f64),
        location_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(location: &str, conversion: &str, retention: &str, ltv: f64, span: f64) -> NewClientRecord {
        NewClientRecord {
            first_visit_location: location.to_string(),
            conversion_status: conversion.to_string(),
            retention_status: retention.to_string(),
            ltv,
            conversion_span: span,
            visits_post_trial: 4.0,
            ..Default::default()
        }
    }

    #[test]
    fn empty_cohort_yields_all_zero_summary() {
        assert_eq!(summarize(&[]), ClientCohortSummary::default());
    }

    #[test]
    fn rates_and_averages() {
        let cohort = vec![
            client("Kwality House, Kemps Corner", "Converted", "Retained", 40000.0, 10.0),
            client("Supreme HQ, Bandra", "Converted", "Not Retained", 20000.0, 20.0),
            client("Kwality House, Kemps Corner", "Not Converted", "Retained", 0.0, 0.0),
            client("Kenkere House", "", "", 5000.0, 0.0),
        ];
        let summary = summarize(&cohort);

        assert_eq!(summary.total_clients, 4);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.retained, 2);
        assert_eq!(summary.conversion_rate, 50.0);
        assert_eq!(summary.retention_rate, 50.0);
        assert_eq!(summary.total_ltv, 65000.0);
        assert_eq!(summary.avg_ltv, 16250.0);
        assert_eq!(summary.avg_visits_post_trial, 4.0);
        // span averages over the two converted clients, not the cohort
        assert_eq!(summary.avg_conversion_span, 15.0);
    }

    #[test]
    fn status_matching_is_verbatim() {
        let cohort = vec![client("Loc", "converted", "RETAINED", 100.0, 5.0)];
        let summary = summarize(&cohort);

        assert_eq!(summary.converted, 0);
        assert_eq!(summary.retained, 0);
        assert_eq!(summary.avg_conversion_span, 0.0);
    }

    #[test]
    fn location_breakdown_keeps_first_seen_order() {
        let cohort = vec![
            client("Kwality House, Kemps Corner", "Converted", "Retained", 40000.0, 10.0),
            client("Supreme HQ, Bandra", "Not Converted", "Retained", 10000.0, 0.0),
            client("Kwality House, Kemps Corner", "Not Converted", "", 2000.0, 0.0),
            client("", "Converted", "", 8000.0, 4.0),
        ];
        let summary = summarize(&cohort);

        let locations: Vec<&str> = summary
            .location_breakdown
            .iter()
            .map(|b| b.location.as_str())
            .collect();
        assert_eq!(
            locations,
            vec!["Kwality House, Kemps Corner", "Supreme HQ, Bandra", "Unknown"]
        );

        let kwality = &summary.location_breakdown[0];
        assert_eq!(kwality.clients, 2);
        assert_eq!(kwality.converted, 1);
        assert_eq!(kwality.total_ltv, 42000.0);
    }
}
