//! Study plan (task) record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted study plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub goal: String,
    /// Ordered plan steps; never contains blank entries.
    pub steps: Vec<String>,
    /// Free-form deadline as given by the user, e.g. `"Friday"`.
    pub deadline: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task stamped with the current time.
    pub fn new(goal: impl Into<String>, steps: Vec<String>, deadline: Option<String>) -> Self {
        Self {
            goal: goal.into(),
            steps,
            deadline,
            created_at: Utc::now(),
        }
    }
}
