//! Prompt text sent to the model.

use crate::model::decision::{
    ACTION_CHAT, ACTION_LIST_TASKS, ACTION_PLAN, ACTION_SAVE_NOTE, ACTION_SEARCH_NOTES,
};

/// Persona shared by every model call.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI Study Assistant for a B.Tech / college student.
You can:
- create study plans,
- save notes,
- search previous notes,
- list existing plans.

Think step by step. When using tools, be concise in your explanation to the user.
";

/// Builds the intent-classification instruction for `user_text`.
pub fn classification_prompt(user_text: &str) -> String {
    format!(
        "User message: \"{user_text}\"

Decide the best action and arguments.

Available actions:
1. {ACTION_PLAN}(goal, deadline) - when the user wants a schedule or study plan.
2. {ACTION_SAVE_NOTE}(title, content) - when the user wants to store notes or a summary.
3. {ACTION_SEARCH_NOTES}(query) - when the user wants to recall something they stored.
4. {ACTION_LIST_TASKS}() - when the user wants to see existing plans.
5. {ACTION_CHAT}(message) - normal conversation.

Return a JSON object like:
{{\"action\": \"{ACTION_PLAN}\", \"arguments\": {{\"goal\": \"...\", \"deadline\": \"...\"}}}}

Only return the JSON object, nothing else.
"
    )
}

/// Builds the plan-generation instruction.
pub fn plan_prompt(goal: &str, deadline: Option<&str>) -> String {
    format!(
        "Create a concise, step-by-step study plan for this goal: {goal}. \
         Deadline (optional): {}. Use bullet points.",
        deadline.unwrap_or("none")
    )
}
