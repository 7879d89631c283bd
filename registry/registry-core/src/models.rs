use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// One row of the registry. Field order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub id: u64,
    pub owner: String,
    pub token_name: String,
    pub balance: f64,
    pub funding_source: String,
    pub fee: f64,
    pub liquidity: f64,
    pub supply_percent_added: f64,
    pub timestamp: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(id: u64, token: NewToken, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: token.owner,
            token_name: token.token_name,
            balance: token.balance,
            funding_source: token.funding_source,
            fee: token.fee,
            liquidity: token.liquidity,
            supply_percent_added: token.supply_percent_added,
            timestamp,
        }
    }
}

/// A checked create request: every record field the caller owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    pub owner: String,
    pub token_name: String,
    pub balance: f64,
    pub funding_source: String,
    pub fee: f64,
    pub liquidity: f64,
    pub supply_percent_added: f64,
}

/// A numeric field as a caller may send it: a JSON number, or text typed into a form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

/// Create payload before validation. Unknown keys (including `id` and
/// `timestamp`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDraft {
    pub owner: Option<String>,
    pub token_name: Option<String>,
    pub balance: Option<NumberInput>,
    pub funding_source: Option<String>,
    pub fee: Option<NumberInput>,
    pub liquidity: Option<NumberInput>,
    pub supply_percent_added: Option<NumberInput>,
}

impl TokenDraft {
    pub fn validate(self) -> RegistryResult<NewToken> {
        Ok(NewToken {
            owner: required_text("owner", self.owner)?,
            token_name: required_text("tokenName", self.token_name)?,
            balance: required_amount("balance", self.balance)?,
            funding_source: required_text("fundingSource", self.funding_source)?,
            fee: required_amount("fee", self.fee)?,
            liquidity: required_amount("liquidity", self.liquidity)?,
            supply_percent_added: required_amount("supplyPercentAdded", self.supply_percent_added)?,
        })
    }
}

fn required_text(field: &str, value: Option<String>) -> RegistryResult<String> {
    let value = value.ok_or_else(|| missing(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn required_amount(field: &str, value: Option<NumberInput>) -> RegistryResult<f64> {
    let amount = match value.ok_or_else(|| missing(field))? {
        NumberInput::Number(n) => n,
        NumberInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            RegistryError::Validation(format!("{field} must be a number, got {s:?}"))
        })?,
    };

    if !amount.is_finite() {
        return Err(RegistryError::Validation(format!("{field} must be a finite number")));
    }
    if amount < 0.0 {
        return Err(RegistryError::Validation(format!("{field} must not be negative")));
    }
    Ok(amount)
}

fn missing(field: &str) -> RegistryError {
    RegistryError::Validation(format!("{field} is required"))
}
