//! Pipeline turning spreadsheet-shaped studio business data into typed
//! records and derived metrics.
//!
//! Data flows fetch → parse → normalize → filter → aggregate. The fetch
//! is the only suspension point; everything after it is a pure pass over
//! an immutable [`sheet::Grid`]. Spreadsheet input is assumed unclean, so
//! cell-level problems coerce to safe defaults and only transport
//! failures surface as errors.

pub mod config;
pub mod fetch;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod sheet;
pub mod snapshot;

pub use config::Config;
pub use snapshot::StudioSnapshot;
