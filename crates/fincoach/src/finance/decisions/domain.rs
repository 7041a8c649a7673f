use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::finance::accounts::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(pub String);

impl DecisionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDecision {
    pub id: DecisionId,
    pub user_id: UserId,
    pub title: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub alternative_option: Option<String>,
    pub expected_return: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Creation payload; required fields are optional here so validation can report them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDecisionRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub alternative_option: Option<String>,
    pub expected_return: Option<f64>,
}

impl NewDecisionRequest {
    pub fn into_decision(
        self,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<FinancialDecision, String> {
        const REQUIRED: &str = "Title, amount, date, and category are required";

        let title = non_blank(self.title).ok_or(REQUIRED)?;
        let category = non_blank(self.category).ok_or(REQUIRED)?;
        let raw_date = non_blank(self.date).ok_or(REQUIRED)?;
        let amount = self.amount.filter(|amount| *amount != 0.0).ok_or(REQUIRED)?;

        if !amount.is_finite() || amount < 0.0 {
            return Err("amount must be a positive number".to_string());
        }
        if let Some(expected) = self.expected_return {
            if !expected.is_finite() {
                return Err("expectedReturn must be a finite percentage".to_string());
            }
        }
        let date = parse_decision_date(&raw_date)
            .ok_or_else(|| format!("date '{raw_date}' must be YYYY-MM-DD or RFC 3339"))?;

        Ok(FinancialDecision {
            id: DecisionId::generate(),
            user_id: owner,
            title,
            amount,
            date,
            category,
            alternative_option: non_blank(self.alternative_option),
            expected_return: self.expected_return,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub alternative_option: Option<String>,
    pub expected_return: Option<f64>,
}

impl AnalyzeRequest {
    pub fn validate(self) -> Result<(String, f64), String> {
        match (non_blank(self.alternative_option), self.expected_return) {
            (Some(option), Some(expected)) if expected.is_finite() => Ok((option, expected)),
            (Some(_), Some(_)) => Err("expectedReturn must be a finite percentage".to_string()),
            _ => Err("Alternative option and expected return are required".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionCreated {
    pub message: &'static str,
    pub financial_decision: FinancialDecision,
}

/// Accepts plain dates and full timestamps; timestamps keep their UTC calendar date.
pub fn parse_decision_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.with_timezone(&Utc).date_naive())
        })
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
