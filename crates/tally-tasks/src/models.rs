//! Task rows and the add/edit form.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::FromRow;
use tally_core::{
    AppError, AppResult, UserId,
    forms::{non_empty, parse_date},
};

pub type TaskId = i64;

/// Longest accepted title.
pub const MAX_TITLE_LEN: usize = 100;

#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub user_id: UserId,
}

/// Validated values written by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub deadline: NaiveDate,
}

/// Raw form body. Every field defaults to empty so that a missing field
/// reaches validation instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: String,
}

impl TaskForm {
    pub fn validate(&self) -> AppResult<TaskFields> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(TaskFields {
            title: title.to_string(),
            description: non_empty(&self.description),
            deadline: parse_date(&self.deadline)?,
        })
    }

    /// Pre-filled form for editing `task`.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            deadline: task
                .deadline
                .map(|d| d.format(tally_core::forms::DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str, deadline: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let fields = form(" Write report ", "", "2024-03-01").validate().unwrap();
        assert_eq!(fields.title, "Write report");
        assert_eq!(fields.description, None);
        assert_eq!(fields.deadline, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_missing_title() {
        assert!(matches!(
            form("  ", "x", "2024-03-01").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_deadline() {
        let err = form("Write report", "", "tomorrow").validate().unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_title_too_long() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(form(&long, "", "2024-03-01").validate().is_err());
    }

    #[test]
    fn test_from_task_prefills_deadline() {
        let task = Task {
            id: 1,
            title: "Write report".into(),
            description: Some("draft".into()),
            deadline: NaiveDate::from_ymd_opt(2024, 3, 1),
            completed: false,
            user_id: 7,
        };
        let form = TaskForm::from_task(&task);
        assert_eq!(form.deadline, "2024-03-01");
        assert_eq!(form.description, "draft");
    }
}
