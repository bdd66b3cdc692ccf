use core_types::{DerivedRatios, FinancialFigures};

/// Divides, returning exactly `0.0` when the denominator is zero.
///
/// Ratios must always be present on a stored record, so a zero denominator
/// is a zero ratio rather than an error, `NaN` or infinity.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// A stateless calculator for deriving financial ratios from normalized figures.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatioCalculator;

impl RatioCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Derives the six ratios. No rounding is applied.
    ///
    /// Pure: the figures are only borrowed, and identical input always gives
    /// bit-identical output.
    pub fn calculate(&self, figures: &FinancialFigures) -> DerivedRatios {
        let employees = figures.employees as f64;
        DerivedRatios {
            gross_profit_margin: safe_div(figures.gross_profit, figures.sales),
            roe: safe_div(figures.net_income, figures.equity),
            current_ratio: safe_div(figures.current_assets, figures.current_liabilities),
            debt_ratio: safe_div(figures.liabilities, figures.total_assets),
            sales_per_employee: safe_div(figures.sales, employees),
            productivity: safe_div(figures.net_income, employees),
        }
    }
}
