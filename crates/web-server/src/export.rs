use crate::error::AppError;
use core_types::ExportRow;

/// Header row of the export. Every record column except `id` and `user_id`,
/// followed by the joined comments.
pub const EXPORT_HEADER: [&str; 19] = [
    "company_name",
    "industry",
    "year",
    "sales",
    "gross_profit",
    "net_income",
    "total_assets",
    "equity",
    "current_assets",
    "current_liabilities",
    "liabilities",
    "employees",
    "gross_profit_margin",
    "roe",
    "current_ratio",
    "debt_ratio",
    "sales_per_employee",
    "productivity",
    "comments",
];

pub const EXPORT_FILE_NAME: &str = "financial_data.csv";

/// Writes already-persisted records as CSV. Values are written as stored.
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for row in rows {
        let (r, f, x) = (&row.record, &row.record.figures, &row.record.ratios);
        writer.write_record([
            r.company_name.clone(),
            r.industry.clone(),
            r.year.to_string(),
            f.sales.to_string(),
            f.gross_profit.to_string(),
            f.net_income.to_string(),
            f.total_assets.to_string(),
            f.equity.to_string(),
            f.current_assets.to_string(),
            f.current_liabilities.to_string(),
            f.liabilities.to_string(),
            f.employees.to_string(),
            x.gross_profit_margin.to_string(),
            x.roe.to_string(),
            x.current_ratio.to_string(),
            x.debt_ratio.to_string(),
            x.sales_per_employee.to_string(),
            x.productivity.to_string(),
            row.comments.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DerivedRatios, FinancialFigures, FinancialRecord};

    #[test]
    fn header_only_when_there_are_no_records() {
        let bytes = write_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("company_name,industry,year,sales"));
        assert!(!text.contains("user_id"));
    }

    #[test]
    fn rows_carry_values_and_quoted_comments() {
        let row = ExportRow {
            record: FinancialRecord {
                id: 9,
                user_id: "alice".into(),
                company_name: "Acme, Inc".into(),
                industry: "Retail".into(),
                year: 2024,
                figures: FinancialFigures { sales: 1000.0, employees: 4, ..Default::default() },
                ratios: DerivedRatios { sales_per_employee: 250.0, ..Default::default() },
            },
            comments: Some("good / bad".into()),
        };

        let text = String::from_utf8(write_csv(&[row]).unwrap()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert!(line.starts_with("\"Acme, Inc\",Retail,2024,1000,"));
        assert!(line.contains(",4,"));
        assert!(line.contains(",250,"));
        assert!(line.ends_with("good / bad"));
        assert!(!line.contains("alice"));
    }
}
