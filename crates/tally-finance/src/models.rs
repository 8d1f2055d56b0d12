//! Transaction rows and the add form.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::{
    AppError, AppResult, UserId,
    forms::{non_empty, parse_date},
};

pub type TransactionId = i64;

/// Longest accepted category name.
pub const MAX_CATEGORY_LEN: usize = 50;
/// Longest accepted description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Direction of a transaction. Stored as `income` / `expense` in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(AppError::validation(format!(
                "Type must be 'income' or 'expense', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub user_id: UserId,
}

/// Validated values for an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub description: Option<String>,
}

/// Raw form body of `POST /add_transaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

impl TransactionForm {
    pub fn validate(&self) -> AppResult<NewTransaction> {
        let date = parse_date(&self.date)?;

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid amount '{}'", self.amount.trim())))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("Amount must be a positive number"));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(AppError::validation("Category is required"));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(AppError::validation(format!(
                "Category must be at most {MAX_CATEGORY_LEN} characters"
            )));
        }

        let kind = TransactionKind::try_from(self.kind.clone())?;

        let description = non_empty(&self.description);
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(AppError::validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(NewTransaction {
            date,
            amount,
            category: category.to_string(),
            kind,
            description,
        })
    }
}
