//! Dashboard aggregates: totals, running balance and expense breakdown.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

/// Totals and chart series for one user's transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub balance: f64,
    /// Cumulative balance at the end of each day that has transactions, ascending.
    pub balance_series: Vec<(NaiveDate, f64)>,
    /// Expense totals per category, ascending by category.
    pub expense_breakdown: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Pie,
}

/// Chart data drawn client-side by `/static/tally.js`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut per_category: BTreeMap<&str, f64> = BTreeMap::new();

    for t in transactions {
        match t.kind {
            TransactionKind::Income => summary.total_income += t.amount,
            TransactionKind::Expense => {
                summary.total_expense += t.amount;
                *per_category.entry(t.category.as_str()).or_default() += t.amount;
            }
        }
        *per_day.entry(t.date).or_default() += t.kind.signed(t.amount);
    }

    summary.balance = summary.total_income - summary.total_expense;

    let mut running = 0.0;
    summary.balance_series = per_day
        .into_iter()
        .map(|(date, delta)| {
            running += delta;
            (date, running)
        })
        .collect();
    summary.expense_breakdown = per_category
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();

    summary
}

impl Summary {
    /// No transactions at all, so nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.balance_series.is_empty()
    }

    /// Balance line and expense pie, or nothing for an empty history.
    pub fn charts(&self) -> Vec<Chart> {
        if self.is_empty() {
            return Vec::new();
        }

        let balance = Chart {
            title: "Balance over time".to_string(),
            kind: ChartKind::Line,
            labels: self.balance_series.iter().map(|(d, _)| d.to_string()).collect(),
            values: self.balance_series.iter().map(|(_, v)| *v).collect(),
        };
        let expenses = Chart {
            title: "Expenses by category".to_string(),
            kind: ChartKind::Pie,
            labels: self.expense_breakdown.iter().map(|(c, _)| c.clone()).collect(),
            values: self.expense_breakdown.iter().map(|(_, v)| *v).collect(),
        };
        vec![balance, expenses]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(day: u32, amount: f64, category: &str, kind: TransactionKind) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            amount,
            category: category.to_string(),
            kind,
            description: None,
            user_id: 1,
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary.balance, 0.0);
        assert!(summary.is_empty());
        assert!(summary.charts().is_empty());
    }

    #[test]
    fn test_salary_and_food() {
        let summary = summarize(&[
            t(1, 100.0, "Salary", TransactionKind::Income),
            t(5, 40.0, "Food", TransactionKind::Expense),
        ]);
        assert_eq!(summary.total_income, 100.0);
        assert_eq!(summary.total_expense, 40.0);
        assert_eq!(summary.balance, 60.0);
        assert_eq!(summary.expense_breakdown, vec![("Food".to_string(), 40.0)]);
    }

    #[test]
    fn test_running_balance_groups_days_in_order() {
        let summary = summarize(&[
            t(5, 40.0, "Food", TransactionKind::Expense),
            t(1, 100.0, "Salary", TransactionKind::Income),
            t(5, 10.0, "Bonus", TransactionKind::Income),
        ]);
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(summary.balance_series, vec![(day(1), 100.0), (day(5), 70.0)]);
    }

    #[test]
    fn test_breakdown_sorted_and_expense_only() {
        let summary = summarize(&[
            t(1, 5.0, "Rent", TransactionKind::Expense),
            t(2, 7.0, "Food", TransactionKind::Expense),
            t(3, 3.0, "Food", TransactionKind::Expense),
            t(4, 50.0, "Salary", TransactionKind::Income),
        ]);
        assert_eq!(
            summary.expense_breakdown,
            vec![("Food".to_string(), 10.0), ("Rent".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_chart_json_shape() {
        let summary = summarize(&[t(1, 100.0, "Salary", TransactionKind::Income)]);
        let charts = summary.charts();
        assert_eq!(charts.len(), 2);

        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(json["kind"], "line");
        assert_eq!(json["labels"][0], "2024-01-01");
        assert_eq!(json["values"][0], 100.0);
        assert_eq!(serde_json::to_value(&charts[1]).unwrap()["kind"], "pie");
    }
}
