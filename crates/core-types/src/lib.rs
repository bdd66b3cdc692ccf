//! # Fintrack Core Types
//!
//! Layer 0 of the workspace: the data structures every other crate speaks.
//! Raw form input, normalized figures, derived ratios and the persisted
//! record/comment rows all live here.

pub mod enums;
pub mod error;
pub mod forms;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::UnitMultiplier;
pub use error::CoreError;
pub use forms::{CommentForm, CreateRecordForm, Credentials, EditRecordForm, RawFigures};
pub use structs::{
    ChartPoint, ChartRow, ChartSeries, Comment, DerivedRatios, ExportRow, FinancialFigures,
    FinancialRecord, RecordDraft, RecordWithComments, Session, User,
};
