//! Core data types for the dependency engine.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EngineError;

/// Stable task identifier, as assigned by the persistence layer.
pub type TaskId = i64;

/// A unit of work. Owned by the persistence collaborator; the engine only reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Used as a proxy finish time when present.
    pub due_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

impl Task {
    /// Create a task, rejecting an empty or whitespace-only title.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "task title is required".to_string(),
            ));
        }
        Ok(Self {
            id,
            title,
            created_at,
            due_date: None,
            image_url: None,
        })
    }

    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    /// Proxy finish time: the due date if set, otherwise the creation time.
    #[inline]
    pub fn finish_time(&self) -> DateTime<Utc> {
        self.due_date.unwrap_or(self.created_at)
    }

    /// True when the task has a due date strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

/// Directed edge: `from_id` depends on `to_id`.
///
/// `from_id` cannot be considered started before `to_id` is finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyEdge {
    pub from_id: TaskId,
    pub to_id: TaskId,
}

impl DependencyEdge {
    pub fn new(from_id: TaskId, to_id: TaskId) -> Self {
        Self { from_id, to_id }
    }

    #[inline]
    pub fn is_self_dependency(&self) -> bool {
        self.from_id == self.to_id
    }
}

/// Parse a task id supplied as text (e.g. a path segment or form field).
pub fn parse_task_id(raw: &str) -> Result<TaskId, EngineError> {
    raw.trim()
        .parse::<TaskId>()
        .map_err(|_| EngineError::InvalidArgument(format!("invalid task id: {raw:?}")))
}

/// Parse an optional due date.
///
/// Blank input means "no due date". A bare `YYYY-MM-DD` is taken as midnight
/// UTC; anything else must be RFC 3339.
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, EngineError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Some(dt.and_utc()))
            .ok_or_else(|| EngineError::InvalidArgument(format!("invalid due date: {raw:?}")));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| EngineError::InvalidArgument(format!("invalid due date: {raw:?}")))
}
