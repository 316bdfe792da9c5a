//! Attendance and utilization aggregates over class sessions.

use serde::Serialize;

use super::{group_by_key, guarded_ratio};
use crate::model::SessionRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_sessions: usize,
    pub total_attendance: f64,
    pub total_capacity: f64,
    pub total_bookings: f64,
    /// Sessions where nobody attended.
    pub empty_sessions: usize,
    /// Attendance over capacity, as a percentage; `0` with no capacity.
    pub avg_fill_rate: f64,
    pub avg_session_size: f64,
    /// Average attendance counting only sessions somebody attended.
    pub avg_session_size_excl_empty: f64,
    pub no_shows: f64,
    pub late_cancellations: f64,
}

pub fn summarize(sessions: &[SessionRecord]) -> SessionSummary {
    if sessions.is_empty() {
        return SessionSummary::default();
    }

    let total_sessions = sessions.len();
    let total_attendance: f64 = sessions.iter().map(|s| s.attended).sum();
    let total_capacity: f64 = sessions.iter().map(|s| s.capacity).sum();
    let total_bookings: f64 = sessions.iter().map(|s| s.booked).sum();
    let empty_sessions = sessions.iter().filter(|s| s.attended == 0.0).count();
    let attended_count = (total_sessions - empty_sessions) as f64;

    SessionSummary {
        total_sessions,
        total_attendance,
        total_capacity,
        total_bookings,
        empty_sessions,
        avg_fill_rate: guarded_ratio(total_attendance, total_capacity) * 100.0,
        avg_session_size: total_attendance / total_sessions as f64,
        avg_session_size_excl_empty: guarded_ratio(total_attendance, attended_count),
        no_shows: sessions.iter().map(SessionRecord::no_shows).sum(),
        late_cancellations: sessions.iter().map(|s| s.late_cancelled).sum(),
    }
}

/// Side-by-side summaries of the studio's two signature formats.
///
/// Membership is decided per format independently, so a session whose
/// class name matches both formats contributes to both columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormatComparison {
    pub power_cycle: SessionSummary,
    pub barre: SessionSummary,
}

pub fn compare_formats(sessions: &[SessionRecord]) -> FormatComparison {
    let power_cycle: Vec<SessionRecord> =
        sessions.iter().filter(|s| s.is_power_cycle()).cloned().collect();
    let barre: Vec<SessionRecord> = sessions.iter().filter(|s| s.is_barre()).cloned().collect();

    FormatComparison {
        power_cycle: summarize(&power_cycle),
        barre: summarize(&barre),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainerBreakdown {
    pub trainer: String,
    pub summary: SessionSummary,
}

/// Per-trainer summaries in first-seen trainer order.
pub fn trainer_breakdown(sessions: &[SessionRecord]) -> Vec<TrainerBreakdown> {
    group_by_key(sessions, |s| s.trainer_name.clone())
        .into_iter()
        .map(|(trainer, subset)| {
            let owned: Vec<SessionRecord> = subset.into_iter().cloned().collect();
            TrainerBreakdown {
                trainer,
                summary: summarize(&owned),
            }
        })
        .collect()
}
