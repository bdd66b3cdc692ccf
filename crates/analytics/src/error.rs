use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Malformed numeric input for '{field}': {value:?}")]
    MalformedNumber { field: String, value: String },
}
