//! # Fintrack Analytics
//!
//! Pure logic that turns raw form text into enriched financial records.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** No I/O, no locks, no async. Depends only on `core-types`.
//! - **Two stages:** the `normalizer` coerces text into base-unit figures, the
//!   `engine` derives ratios from those figures. `pipeline` wires the two
//!   together for the create and edit flows.
//!
//! ## Public API
//!
//! - `prepare_create` / `prepare_edit`: raw form in, `RecordDraft` out.
//! - `RatioCalculator`: the stateless ratio derivation.
//! - `group_by_company`: chart series from chart rows.
//! - `AnalyticsError`: the malformed-input failure.

pub mod chart;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod pipeline;

// Re-export the key components to create a clean, public-facing API.
pub use chart::group_by_company;
pub use engine::{safe_div, RatioCalculator};
pub use error::AnalyticsError;
pub use pipeline::{prepare_create, prepare_edit};
