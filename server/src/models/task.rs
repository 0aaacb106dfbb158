use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Assignee.
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update payload for a task, keyed by the optional `id`.
///
/// Without an `id` both `event_id` and `title` are required and a new task is
/// created. With an `id` the stored task is updated in place; a present
/// `event_id` must name the task's own event.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTaskInput {
    pub id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl Task {
    pub fn new(event_id: Uuid, title: String, input: UpsertTaskInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id: input.user_id,
            title,
            description: input.description,
            due_date: input.due_date,
            status: input.status.unwrap_or_default(),
            priority: input.priority,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields into this record and stamp `updated_at`.
    /// `id` and `event_id` never change.
    pub fn apply(&mut self, input: UpsertTaskInput, now: DateTime<Utc>) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
        if let Some(due_date) = input.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(priority) = input.priority {
            self.priority = Some(priority);
        }
        if let Some(user_id) = input.user_id {
            self.user_id = Some(user_id);
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_task_defaults_to_todo() {
        let now = Utc::now();
        let event_id = Uuid::new_v4();
        let task = Task::new(event_id, "Book venue".into(), UpsertTaskInput::default(), now);

        assert_eq!(task.event_id, event_id);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, None);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_apply_keeps_status_when_absent() {
        let now = Utc::now();
        let mut task = Task::new(
            Uuid::new_v4(),
            "Book venue".into(),
            UpsertTaskInput {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
            now,
        );

        task.apply(
            UpsertTaskInput {
                priority: Some(TaskPriority::High),
                ..Default::default()
            },
            now + Duration::seconds(1),
        );

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Some(TaskPriority::High));
        assert_eq!(task.title, "Book venue");
        assert!(task.updated_at > task.created_at);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in-progress"
        );
        let status: TaskStatus = serde_json::from_str(r#""in-progress""#).unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert!(serde_json::from_str::<TaskStatus>(r#""blocked""#).is_err());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let input = UpsertTaskInput {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
