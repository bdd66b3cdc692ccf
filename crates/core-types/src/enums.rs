use serde::{Deserialize, Serialize};

/// The denomination a user typed their figures in.
///
/// Every magnitude is multiplied by the factor before it is stored, so that
/// all persisted figures share one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitMultiplier {
    #[default]
    Base,
    Thousands,
    Millions,
}

impl UnitMultiplier {
    /// Resolves the raw `unit` form value.
    ///
    /// Only `"1"`, `"1000"` and `"1000000"` are recognised. Anything else,
    /// including a missing value, falls back to `Base`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("1000") => UnitMultiplier::Thousands,
            Some("1000000") => UnitMultiplier::Millions,
            _ => UnitMultiplier::Base,
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            UnitMultiplier::Base => 1.0,
            UnitMultiplier::Thousands => 1_000.0,
            UnitMultiplier::Millions => 1_000_000.0,
        }
    }
}
