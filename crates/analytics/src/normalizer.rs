use crate::error::AnalyticsError;
use core_types::{FinancialFigures, RawFigures, UnitMultiplier};

/// Thousands separators accepted in numeric input: ASCII and full-width comma.
const SEPARATORS: [char; 2] = [',', '\u{FF0C}'];

/// Strips separators and every whitespace character from a raw form value.
fn clean(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .chars()
        .filter(|c| !SEPARATORS.contains(c) && !c.is_whitespace())
        .collect()
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces a raw value into a float.
///
/// An absent or blank value is `0.0`. Anything left over after cleanup that is
/// not a finite number is a malformed request.
pub fn coerce_float(field: &str, raw: Option<&str>) -> Result<f64, AnalyticsError> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    parse_finite(&cleaned).ok_or_else(|| {
        tracing::warn!(field, value = ?raw, "Rejected malformed numeric input.");
        AnalyticsError::MalformedNumber {
            field: field.to_string(),
            value: raw.unwrap_or_default().to_string(),
        }
    })
}

/// Coerces a raw value into an integer by parsing it as a float and
/// truncating toward zero, so `"12.0"` is `12`.
///
/// Unlike `coerce_float` this never fails: unparseable text is `0`.
pub fn coerce_int(raw: Option<&str>) -> i64 {
    parse_finite(&clean(raw)).map(|v| v.trunc() as i64).unwrap_or(0)
}

/// Normalizes the nine raw figure fields into base-unit magnitudes.
///
/// Every magnitude is multiplied by `unit`; the employee count is not.
pub fn normalize_figures(
    raw: &RawFigures,
    unit: UnitMultiplier,
) -> Result<FinancialFigures, AnalyticsError> {
    let factor = unit.factor();
    let mut scaled = [0.0_f64; 8];
    for (slot, (field, value)) in scaled.iter_mut().zip(raw.magnitudes()) {
        *slot = coerce_float(field, value)? * factor;
    }
    let [
        sales,
        gross_profit,
        net_income,
        total_assets,
        equity,
        current_assets,
        current_liabilities,
        liabilities,
    ] = scaled;

    Ok(FinancialFigures {
        sales,
        gross_profit,
        net_income,
        total_assets,
        equity,
        current_assets,
        current_liabilities,
        liabilities,
        employees: coerce_int(raw.employees.as_deref()),
    })
}

/// Resolves the unit selector, logging values that were supplied but rejected.
pub fn resolve_unit(raw: Option<&str>) -> UnitMultiplier {
    let unit = UnitMultiplier::from_raw(raw);
    if let Some(value) = raw {
        if unit == UnitMultiplier::Base && value.trim() != "1" {
            tracing::debug!(value, "Unrecognised unit multiplier, using base unit.");
        }
    }
    unit
}

/// Trims a descriptive text field; absent becomes empty.
pub fn clean_text(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_string()
}
