//! Typed records derived from raw grid rows.
//!
//! Normalization is total: every field has an explicit fallback, so turning
//! a row into a record never fails and never leaves a field unset. Rows
//! that make no business sense still normalize; post-filters decide what
//! to keep.

pub mod client;
pub mod sale;
pub mod session;

pub use client::NewClientRecord;
pub use sale::SaleRecord;
pub use session::SessionRecord;
