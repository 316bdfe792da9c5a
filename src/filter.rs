//! Pure, order-preserving record filters.
//!
//! Filters are declarative: an empty inclusion set imposes no restriction,
//! numeric bounds are inclusive, and date bounds compare calendar dates.
//! A record whose date cell is blank or unparsable is excluded whenever a
//! date bound is active.

use chrono::NaiveDate;

use crate::model::{SaleRecord, SessionRecord};

/// Inclusive calendar-date window; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }

    fn admits(&self, raw_date: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match parse_record_date(raw_date) {
            Some(date) => self.contains(date),
            None => false,
        }
    }
}

/// Parse a record date stored either as `DD/MM/YYYY[ time]` or as ISO
/// `YYYY-MM-DD` text.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains('/') {
        let date_part = trimmed.split_whitespace().next()?;
        NaiveDate::parse_from_str(date_part, "%d/%m/%Y").ok()
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
    }
}

fn included(set: &[String], value: &str) -> bool {
    set.is_empty() || set.iter().any(|member| member == value)
}

/// Filter criteria for sales transactions.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub date_range: DateRange,
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    pub products: Vec<String>,
    pub payment_methods: Vec<String>,
    pub sold_by: Vec<String>,
    pub min_discount: Option<f64>,
    pub max_discount: Option<f64>,
}

impl SaleFilter {
    pub fn matches(&self, record: &SaleRecord) -> bool {
        if !self.date_range.admits(&record.payment_date) {
            return false;
        }
        if !included(&self.locations, &record.location)
            || !included(&self.categories, &record.cleaned_category)
            || !included(&self.products, &record.cleaned_product)
            || !included(&self.payment_methods, &record.payment_method)
            || !included(&self.sold_by, &record.sold_by)
        {
            return false;
        }
        if let Some(min) = self.min_discount {
            if record.discount_amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_discount {
            if record.discount_amount > max {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[SaleRecord]) -> Vec<SaleRecord> {
        records.iter().filter(|record| self.matches(record)).cloned().collect()
    }
}

/// Filter criteria for class sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub date_range: DateRange,
    pub locations: Vec<String>,
    pub trainers: Vec<String>,
    pub classes: Vec<String>,
}

impl SessionFilter {
    pub fn matches(&self, session: &SessionRecord) -> bool {
        if !self.date_range.admits(&session.date) {
            return false;
        }
        included(&self.locations, &session.location)
            && included(&self.trainers, &session.trainer_name)
            && included(&self.classes, &session.cleaned_class)
    }

    pub fn apply(&self, sessions: &[SessionRecord]) -> Vec<SessionRecord> {
        sessions.iter().filter(|session| self.matches(session)).cloned().collect()
    }
}
