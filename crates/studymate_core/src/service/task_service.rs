//! Study-plan use-case service.
//!
//! # Invariants
//! - Steps are derived deterministically from the plan text.
//! - Stored steps are never blank.

use crate::model::task::Task;
use crate::repo::task_repo::TaskRepository;
use crate::repo::StoreResult;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

// One leading bullet glyph or `1.` / `2)` number, followed by whitespace or end of line.
static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•‣◦–—]|\d+[.)])(?:\s+|$)").expect("valid list marker regex")
});

/// Study-plan service facade over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Splits `plan_text` into steps and stores the plan.
    pub fn create_plan(
        &self,
        goal: impl Into<String>,
        plan_text: &str,
        deadline: Option<String>,
    ) -> StoreResult<Task> {
        let task = Task::new(goal, split_plan_steps(plan_text), deadline);
        self.repo.append_task(&task)?;
        info!(
            "event=plan_save module=service status=ok steps={} has_deadline={}",
            task.steps.len(),
            task.deadline.is_some()
        );
        Ok(task)
    }

    /// Lists every plan in insertion order.
    pub fn list(&self) -> StoreResult<Vec<Task>> {
        self.repo.list_tasks()
    }
}

/// Splits model plan text into steps.
///
/// Each line is trimmed and stripped of one leading list marker; lines left
/// empty are dropped.
pub fn split_plan_steps(plan_text: &str) -> Vec<String> {
    plan_text
        .lines()
        .map(str::trim)
        .map(|line| LIST_MARKER_RE.replace(line, "").trim().to_string())
        .filter(|step| !step.is_empty())
        .collect()
}
