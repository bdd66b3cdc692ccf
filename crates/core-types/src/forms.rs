use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// The nine raw figure fields exactly as they arrive from the input form.
///
/// Every field is optional text; coercion into numbers is the normalizer's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFigures {
    pub sales: Option<String>,
    pub gross_profit: Option<String>,
    pub net_income: Option<String>,
    pub total_assets: Option<String>,
    pub equity: Option<String>,
    pub current_assets: Option<String>,
    pub current_liabilities: Option<String>,
    pub liabilities: Option<String>,
    pub employees: Option<String>,
}

impl RawFigures {
    /// The eight magnitude fields paired with their names, in storage order.
    pub fn magnitudes(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("sales", self.sales.as_deref()),
            ("gross_profit", self.gross_profit.as_deref()),
            ("net_income", self.net_income.as_deref()),
            ("total_assets", self.total_assets.as_deref()),
            ("equity", self.equity.as_deref()),
            ("current_assets", self.current_assets.as_deref()),
            ("current_liabilities", self.current_liabilities.as_deref()),
            ("liabilities", self.liabilities.as_deref()),
        ]
    }
}

/// Submission of the main input form. Carries the `unit` selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordForm {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub year: Option<String>,
    pub unit: Option<String>,
    #[serde(flatten)]
    pub figures: RawFigures,
}

/// Submission of the edit form.
///
/// There is no `unit` field: figures on this path are already base-unit
/// magnitudes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRecordForm {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub year: Option<String>,
    #[serde(flatten)]
    pub figures: RawFigures,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Rejects blank usernames and passwords. The username is trimmed.
    pub fn validate(self) -> Result<Self, CoreError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(CoreError::InvalidInput(
                "username".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(CoreError::InvalidInput(
                "password".to_string(),
                "must not be empty".to_string(),
            ));
        }
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub content: String,
}
