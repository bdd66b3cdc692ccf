use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The eight magnitudes and the headcount of one company-year, in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FinancialFigures {
    pub sales: f64,
    pub gross_profit: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub equity: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub liabilities: f64,
    /// Headcount. Never scaled by the unit multiplier.
    pub employees: i64,
}

/// The six ratios derived from a `FinancialFigures`.
///
/// These are never user-entered; they are recomputed on every write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DerivedRatios {
    pub gross_profit_margin: f64,
    pub roe: f64,
    pub current_ratio: f64,
    pub debt_ratio: f64,
    pub sales_per_employee: f64,
    pub productivity: f64,
}

/// A fully normalized and enriched record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub company_name: String,
    pub industry: String,
    pub year: i32,
    pub figures: FinancialFigures,
    pub ratios: DerivedRatios,
}

/// Represents a row from the `financials` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FinancialRecord {
    pub id: i64,
    pub user_id: String,
    pub company_name: String,
    pub industry: String,
    pub year: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub figures: FinancialFigures,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ratios: DerivedRatios,
}

/// Represents a row from the `comments` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub financial_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// A record together with the comments its owner left on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWithComments {
    #[serde(flatten)]
    pub record: FinancialRecord,
    pub comments: Vec<Comment>,
}

// Deliberately not `Serialize`: the hash must never leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub username: String,
    /// Unix timestamp, in seconds.
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }
}

/// The subset of a record plotted on the chart page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChartRow {
    pub company_name: String,
    pub year: i32,
    pub sales: f64,
    pub roe: f64,
    pub productivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub year: i32,
    pub sales: f64,
    pub roe: f64,
    pub productivity: f64,
}

/// All chart points of one company, in year order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub company_name: String,
    pub points: Vec<ChartPoint>,
}

/// A record joined with its owner's comments, concatenated with `" / "`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExportRow {
    #[sqlx(flatten)]
    pub record: FinancialRecord,
    pub comments: Option<String>,
}
