use crate::engine::RatioCalculator;
use crate::error::AnalyticsError;
use crate::normalizer::{clean_text, coerce_int, normalize_figures, resolve_unit};
use core_types::{CreateRecordForm, EditRecordForm, RawFigures, RecordDraft, UnitMultiplier};

/// Runs the create flow: resolve the unit, normalize, derive ratios.
pub fn prepare_create(form: &CreateRecordForm) -> Result<RecordDraft, AnalyticsError> {
    let unit = resolve_unit(form.unit.as_deref());
    build_draft(
        form.company_name.as_deref(),
        form.industry.as_deref(),
        form.year.as_deref(),
        &form.figures,
        unit,
    )
}

/// Runs the edit flow.
///
/// The edit form carries no unit selector and its figures are taken as
/// base-unit magnitudes, whereas the create flow scales them. The two paths
/// therefore store different values for the same typed input when a
/// non-base unit was used at creation time. This asymmetry is kept on
/// purpose until a decision is made on how edits should treat units.
pub fn prepare_edit(form: &EditRecordForm) -> Result<RecordDraft, AnalyticsError> {
    build_draft(
        form.company_name.as_deref(),
        form.industry.as_deref(),
        form.year.as_deref(),
        &form.figures,
        UnitMultiplier::Base,
    )
}

fn build_draft(
    company_name: Option<&str>,
    industry: Option<&str>,
    year: Option<&str>,
    raw: &RawFigures,
    unit: UnitMultiplier,
) -> Result<RecordDraft, AnalyticsError> {
    let figures = normalize_figures(raw, unit)?;
    let ratios = RatioCalculator::new().calculate(&figures);

    Ok(RecordDraft {
        company_name: clean_text(company_name),
        industry: clean_text(industry),
        year: i32::try_from(coerce_int(year)).unwrap_or_default(),
        figures,
        ratios,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn scenario_figures() -> RawFigures {
        RawFigures {
            sales: s("1,000,000"),
            gross_profit: s("250,000"),
            net_income: s("100000"),
            total_assets: s("2000000"),
            equity: s("500000"),
            current_assets: s("300000"),
            current_liabilities: s("150000"),
            liabilities: s("800000"),
            employees: s("10"),
        }
    }

    #[test]
    fn create_scales_by_unit_and_derives_ratios() {
        let form = CreateRecordForm {
            company_name: s(" Acme "),
            industry: s("Retail"),
            year: s("2024"),
            unit: s("1000"),
            figures: scenario_figures(),
        };

        let draft = prepare_create(&form).unwrap();

        assert_eq!(draft.company_name, "Acme");
        assert_eq!(draft.year, 2024);
        assert_eq!(draft.figures.sales, 1_000_000_000.0);
        assert_eq!(draft.figures.employees, 10);
        assert_eq!(draft.ratios.gross_profit_margin, 0.25);
        assert_eq!(draft.ratios.roe, 0.2);
        assert_eq!(draft.ratios.current_ratio, 2.0);
        assert_eq!(draft.ratios.debt_ratio, 0.4);
        assert_eq!(draft.ratios.sales_per_employee, 100_000_000.0);
        assert_eq!(draft.ratios.productivity, 10_000_000.0);
    }

    #[test]
    fn edit_ignores_units_entirely() {
        let form = EditRecordForm {
            company_name: s("Acme"),
            industry: s("Retail"),
            year: s("2024"),
            figures: scenario_figures(),
        };

        let draft = prepare_edit(&form).unwrap();

        assert_eq!(draft.figures.sales, 1_000_000.0);
        assert_eq!(draft.ratios.sales_per_employee, 100_000.0);
        assert_eq!(draft.ratios.roe, 0.2);
    }

    #[test]
    fn empty_form_yields_a_zeroed_draft() {
        let draft = prepare_create(&CreateRecordForm::default()).unwrap();
        assert_eq!(draft.company_name, "");
        assert_eq!(draft.year, 0);
        assert_eq!(draft.figures, Default::default());
        assert_eq!(draft.ratios, Default::default());
    }

    #[test]
    fn fractional_employee_text_is_accepted() {
        let mut form = CreateRecordForm::default();
        form.figures.employees = s("12.0");
        form.figures.sales = s("1200");
        let draft = prepare_create(&form).unwrap();
        assert_eq!(draft.figures.employees, 12);
        assert_eq!(draft.ratios.sales_per_employee, 100.0);
    }

    #[test]
    fn malformed_figure_fails_the_whole_submission() {
        let mut form = CreateRecordForm::default();
        form.figures.sales = s("ten");
        assert!(prepare_create(&form).is_err());
    }
}
