use core_types::{ChartPoint, ChartRow, ChartSeries};

/// Groups chart rows into one series per company.
///
/// Rows are expected sorted by company then year, as the repository returns
/// them; series keep first-seen company order.
pub fn group_by_company(rows: Vec<ChartRow>) -> Vec<ChartSeries> {
    let mut series: Vec<ChartSeries> = Vec::new();
    for row in rows {
        let point = ChartPoint {
            year: row.year,
            sales: row.sales,
            roe: row.roe,
            productivity: row.productivity,
        };
        match series.last_mut() {
            Some(current) if current.company_name == row.company_name => current.points.push(point),
            _ => series.push(ChartSeries {
                company_name: row.company_name,
                points: vec![point],
            }),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(company: &str, year: i32, sales: f64) -> ChartRow {
        ChartRow { company_name: company.into(), year, sales, roe: 0.1, productivity: 2.0 }
    }

    #[test]
    fn consecutive_rows_of_a_company_share_a_series() {
        let series = group_by_company(vec![
            row("Acme", 2022, 1.0),
            row("Acme", 2023, 2.0),
            row("Globex", 2023, 3.0),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].company_name, "Acme");
        assert_eq!(series[0].points.iter().map(|p| p.year).collect::<Vec<_>>(), vec![2022, 2023]);
        assert_eq!(series[1].points[0].sales, 3.0);
    }

    #[test]
    fn no_rows_no_series() {
        assert!(group_by_company(Vec::new()).is_empty());
    }
}
