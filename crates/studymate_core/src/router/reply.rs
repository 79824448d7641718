//! User-facing response text.

use crate::model::note::Note;
use crate::model::task::Task;

pub const PLAN_HEADER: &str = "Here's your study plan:";
pub const NOTES_HEADER: &str = "Here are some matching notes:";
pub const NO_MATCHING_NOTES: &str = "I couldn't find any notes matching that.";
pub const NO_SAVED_PLANS: &str = "You don't have any saved study plans yet.";
pub const MISSING_DEADLINE: &str = "none";

/// Plan text prefixed with the fixed header.
pub fn plan_created(plan_text: &str) -> String {
    format!("{PLAN_HEADER}\n\n{plan_text}")
}

pub fn note_saved(title: &str) -> String {
    format!("Note saved: {title}")
}

/// One `**title**` / content block per hit.
pub fn matching_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return NO_MATCHING_NOTES.to_string();
    }
    let blocks: Vec<String> = notes
        .iter()
        .map(|note| format!("**{}**\n{}\n", note.title, note.content))
        .collect();
    format!("{NOTES_HEADER}\n\n{}", blocks.join("\n"))
}

/// Goal, deadline and bullet steps per plan, separated by blank lines.
pub fn saved_plans(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return NO_SAVED_PLANS.to_string();
    }
    let mut lines = Vec::new();
    for task in tasks {
        lines.push(format!("Goal: {}", task.goal));
        lines.push(format!(
            "Deadline: {}",
            task.deadline.as_deref().unwrap_or(MISSING_DEADLINE)
        ));
        lines.push("Steps:".to_string());
        lines.extend(task.steps.iter().map(|step| format!("- {step}")));
        lines.push(String::new());
    }
    lines.join("\n")
}
