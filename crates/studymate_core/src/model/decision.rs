//! Routing decision parsed from model output.
//!
//! # Responsibility
//! - Define the closed set of actions the router can dispatch.
//! - Turn free-form model text into a typed `Decision`.
//!
//! # Invariants
//! - `Decision::parse_or_chat` is total: any malformed input maps to
//!   `Decision::Chat` carrying the original user text.
//! - Unknown argument keys are ignored; known keys must be scalars.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("valid code fence regex")
});

/// Stable action name for study-plan generation.
pub const ACTION_PLAN: &str = "plan";
/// Stable action name for note storage.
pub const ACTION_SAVE_NOTE: &str = "save_note";
/// Stable action name for note search.
pub const ACTION_SEARCH_NOTES: &str = "search_notes";
/// Stable action name for plan listing.
pub const ACTION_LIST_TASKS: &str = "list_tasks";
/// Stable action name for free conversation.
pub const ACTION_CHAT: &str = "chat";

/// Action tag without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Plan,
    SaveNote,
    SearchNotes,
    ListTasks,
    Chat,
}

impl Action {
    /// Wire name used in model replies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plan => ACTION_PLAN,
            Self::SaveNote => ACTION_SAVE_NOTE,
            Self::SearchNotes => ACTION_SEARCH_NOTES,
            Self::ListTasks => ACTION_LIST_TASKS,
            Self::Chat => ACTION_CHAT,
        }
    }

    /// Parses a wire name, ignoring surrounding whitespace and ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            ACTION_PLAN => Some(Self::Plan),
            ACTION_SAVE_NOTE => Some(Self::SaveNote),
            ACTION_SEARCH_NOTES => Some(Self::SearchNotes),
            ACTION_LIST_TASKS => Some(Self::ListTasks),
            ACTION_CHAT => Some(Self::Chat),
            _ => None,
        }
    }
}

/// Typed routing decision. Absent arguments are resolved to defaults at
/// dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Plan {
        goal: Option<String>,
        deadline: Option<String>,
    },
    SaveNote {
        title: Option<String>,
        content: Option<String>,
    },
    SearchNotes {
        query: Option<String>,
    },
    ListTasks,
    Chat {
        message: Option<String>,
    },
}

/// Reasons a model reply could not be read as a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionParseError {
    /// Reply is not valid JSON.
    NotJson(String),
    /// Reply is JSON but not an object.
    NotObject,
    /// Object has no string `action` field.
    MissingAction,
    /// `action` names something outside the known set.
    UnknownAction(String),
    /// `arguments` is present but not an object.
    ArgumentsNotObject,
    /// A known argument holds an array or object.
    InvalidArgument(&'static str),
}

impl Display for DecisionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotJson(message) => write!(f, "decision is not valid JSON: {message}"),
            Self::NotObject => write!(f, "decision is not a JSON object"),
            Self::MissingAction => write!(f, "decision has no string `action` field"),
            Self::UnknownAction(action) => write!(f, "unknown decision action `{action}`"),
            Self::ArgumentsNotObject => write!(f, "decision `arguments` is not an object"),
            Self::InvalidArgument(key) => {
                write!(f, "decision argument `{key}` is not a scalar value")
            }
        }
    }
}

impl Error for DecisionParseError {}

impl DecisionParseError {
    /// Stable snake_case tag; carries no model text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotJson(_) => "not_json",
            Self::NotObject => "not_object",
            Self::MissingAction => "missing_action",
            Self::UnknownAction(_) => "unknown_action",
            Self::ArgumentsNotObject => "arguments_not_object",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

impl Decision {
    /// Default decision for `user_text` when the model reply is unusable.
    pub fn fallback_chat(user_text: &str) -> Self {
        Self::Chat {
            message: Some(user_text.to_string()),
        }
    }

    /// Returns the action tag of this decision.
    pub fn action(&self) -> Action {
        match self {
            Self::Plan { .. } => Action::Plan,
            Self::SaveNote { .. } => Action::SaveNote,
            Self::SearchNotes { .. } => Action::SearchNotes,
            Self::ListTasks => Action::ListTasks,
            Self::Chat { .. } => Action::Chat,
        }
    }

    /// Parses a model reply, falling back to chat with `user_text` on any
    /// failure.
    pub fn parse_or_chat(raw: &str, user_text: &str) -> Self {
        match Self::try_parse(raw) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(
                    "event=decision_parse module=router status=fallback reply_len={} error_kind={}",
                    raw.len(),
                    err.kind()
                );
                Self::fallback_chat(user_text)
            }
        }
    }

    /// Strict parse of a model reply.
    ///
    /// Accepts a bare JSON object or one wrapped in a Markdown code fence.
    /// `arguments` may be missing or `null`.
    pub fn try_parse(raw: &str) -> Result<Self, DecisionParseError> {
        let body = strip_code_fence(raw);
        let value: Value = serde_json::from_str(body)
            .map_err(|err| DecisionParseError::NotJson(err.to_string()))?;
        let Value::Object(object) = value else {
            return Err(DecisionParseError::NotObject);
        };

        let action_name = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or(DecisionParseError::MissingAction)?;
        let action = Action::parse(action_name)
            .ok_or_else(|| DecisionParseError::UnknownAction(action_name.to_string()))?;

        let empty = Map::new();
        let arguments = match object.get("arguments") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => return Err(DecisionParseError::ArgumentsNotObject),
        };

        let decision = match action {
            Action::Plan => Self::Plan {
                goal: scalar_argument(arguments, "goal")?,
                deadline: scalar_argument(arguments, "deadline")?,
            },
            Action::SaveNote => Self::SaveNote {
                title: scalar_argument(arguments, "title")?,
                content: scalar_argument(arguments, "content")?,
            },
            Action::SearchNotes => Self::SearchNotes {
                query: scalar_argument(arguments, "query")?,
            },
            Action::ListTasks => Self::ListTasks,
            Action::Chat => Self::Chat {
                message: scalar_argument(arguments, "message")?,
            },
        };
        Ok(decision)
    }
}

fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE_RE.captures(raw).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

fn scalar_argument(
    arguments: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, DecisionParseError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(Value::Bool(value)) => Ok(Some(value.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(DecisionParseError::InvalidArgument(key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Decision, DecisionParseError};

    const USER_TEXT: &str = "what is a B-tree?";

    fn fallback() -> Decision {
        Decision::fallback_chat(USER_TEXT)
    }

    #[test]
    fn parses_plan_with_all_arguments() {
        let decision = Decision::parse_or_chat(
            r#"{"action": "plan", "arguments": {"goal": "finish DBMS syllabus", "deadline": "Friday"}}"#,
            USER_TEXT,
        );
        assert_eq!(
            decision,
            Decision::Plan {
                goal: Some("finish DBMS syllabus".to_string()),
                deadline: Some("Friday".to_string()),
            }
        );
    }

    #[test]
    fn missing_or_null_arguments_leave_fields_absent() {
        assert_eq!(
            Decision::parse_or_chat(r#"{"action": "save_note"}"#, USER_TEXT),
            Decision::SaveNote {
                title: None,
                content: None,
            }
        );
        assert_eq!(
            Decision::parse_or_chat(
                r#"{"action": "search_notes", "arguments": null}"#,
                USER_TEXT
            ),
            Decision::SearchNotes { query: None }
        );
        assert_eq!(
            Decision::parse_or_chat(
                r#"{"action": "plan", "arguments": {"goal": "graphs", "deadline": null}}"#,
                USER_TEXT
            ),
            Decision::Plan {
                goal: Some("graphs".to_string()),
                deadline: None,
            }
        );
    }

    #[test]
    fn list_tasks_ignores_arguments() {
        assert_eq!(
            Decision::parse_or_chat(
                r#"{"action": "list_tasks", "arguments": {"anything": [1, 2]}}"#,
                USER_TEXT
            ),
            Decision::ListTasks
        );
    }

    #[test]
    fn accepts_fenced_json_and_action_case_variants() {
        let raw = "```json\n{\"action\": \"Search_Notes\", \"arguments\": {\"query\": \"heap\"}}\n```";
        assert_eq!(
            Decision::parse_or_chat(raw, USER_TEXT),
            Decision::SearchNotes {
                query: Some("heap".to_string()),
            }
        );
    }

    #[test]
    fn numeric_arguments_are_stringified() {
        assert_eq!(
            Decision::parse_or_chat(
                r#"{"action": "plan", "arguments": {"goal": "revise", "deadline": 5}}"#,
                USER_TEXT
            ),
            Decision::Plan {
                goal: Some("revise".to_string()),
                deadline: Some("5".to_string()),
            }
        );
    }

    #[test]
    fn malformed_replies_fall_back_to_chat_with_user_text() {
        let cases = [
            "I'm not sure",
            "",
            "[]",
            "\"plan\"",
            r#"{"arguments": {"goal": "x"}}"#,
            r#"{"action": 3}"#,
            r#"{"action": "dance"}"#,
            r#"{"action": "plan", "arguments": "goal=x"}"#,
            r#"{"action": "save_note", "arguments": {"title": ["a"]}}"#,
            r#"{"action": "plan""#,
        ];
        for raw in cases {
            assert_eq!(Decision::parse_or_chat(raw, USER_TEXT), fallback(), "{raw}");
        }
    }

    #[test]
    fn try_parse_reports_specific_errors() {
        assert!(matches!(
            Decision::try_parse("nope"),
            Err(DecisionParseError::NotJson(_))
        ));
        assert_eq!(
            Decision::try_parse("{}"),
            Err(DecisionParseError::MissingAction)
        );
        assert_eq!(
            Decision::try_parse(r#"{"action": "fly"}"#),
            Err(DecisionParseError::UnknownAction("fly".to_string()))
        );
    }

    #[test]
    fn error_kind_omits_model_text() {
        let err = Decision::try_parse(r#"{"action": "email my grades to prof@uni.edu"}"#).unwrap_err();
        assert_eq!(err.kind(), "unknown_action");
        assert!(err.to_string().contains("prof@uni.edu"));

        let err = Decision::try_parse("My secret diary entry").unwrap_err();
        assert_eq!(err.kind(), "not_json");
        assert_eq!(
            Decision::try_parse(r#"{"action": "plan", "arguments": {"goal": ["x"]}}"#)
                .unwrap_err()
                .kind(),
            "invalid_argument"
        );
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            Action::Plan,
            Action::SaveNote,
            Action::SearchNotes,
            Action::ListTasks,
            Action::Chat,
        ] {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }
}
