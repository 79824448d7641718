//! Intent routing: classify a message with the model, then dispatch it.
//!
//! # Responsibility
//! - Ask the model for a structured decision and parse it totally.
//! - Run exactly one handler per request.
//! - Surface gateway and store failures as fatal request errors.
//!
//! # Invariants
//! - The only local recovery is the chat fallback for unparseable decisions.
//! - Requests are independent; no conversation state is kept.

pub mod prompt;
pub mod reply;

use crate::config::AssistantConfig;
use crate::gateway::{build_gateway, GatewayError, ModelGateway};
use crate::model::decision::Decision;
use crate::model::note::UNTITLED_NOTE_TITLE;
use crate::repo::note_repo::{JsonNoteRepository, NoteRepository};
use crate::repo::task_repo::{JsonTaskRepository, TaskRepository};
use crate::repo::StoreError;
use crate::service::note_service::NoteService;
use crate::service::task_service::TaskService;
use log::{error, info};
use prompt::{classification_prompt, plan_prompt, SYSTEM_PROMPT};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Fatal per-request error.
#[derive(Debug)]
pub enum AssistantError {
    Gateway(GatewayError),
    Store(StoreError),
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssistantError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<GatewayError> for AssistantError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<StoreError> for AssistantError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Classify-then-dispatch request handler.
pub struct IntentRouter<G, N, T>
where
    G: ModelGateway,
    N: NoteRepository,
    T: TaskRepository,
{
    gateway: G,
    notes: NoteService<N>,
    tasks: TaskService<T>,
}

/// Router wired to the configured gateway and JSON-file collections.
pub type Assistant = IntentRouter<Box<dyn ModelGateway>, JsonNoteRepository, JsonTaskRepository>;

impl Assistant {
    /// Builds the production router from startup configuration.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let gateway = build_gateway(&config.model)?;
        Ok(IntentRouter::new(
            gateway,
            JsonNoteRepository::new(&config.store),
            JsonTaskRepository::new(&config.store),
        ))
    }
}

impl<G, N, T> IntentRouter<G, N, T>
where
    G: ModelGateway,
    N: NoteRepository,
    T: TaskRepository,
{
    pub fn new(gateway: G, notes: N, tasks: T) -> Self {
        Self {
            gateway,
            notes: NoteService::new(notes),
            tasks: TaskService::new(tasks),
        }
    }

    /// Handles one message end to end.
    pub fn handle(&self, user_text: &str) -> Result<String, AssistantError> {
        let started_at = Instant::now();
        let result = self
            .classify(user_text)
            .and_then(|decision| {
                let action = decision.action();
                self.dispatch(decision, user_text)
                    .map(|response| (action, response))
            });

        match result {
            Ok((action, response)) => {
                info!(
                    "event=request module=router status=ok action={} duration_ms={}",
                    action.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(response)
            }
            Err(err) => {
                error!(
                    "event=request module=router status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Handles one message; fatal errors become a user-visible apology.
    pub fn reply(&self, user_text: &str) -> String {
        match self.handle(user_text) {
            Ok(response) => response,
            Err(err) => format!("Sorry, I couldn't complete that: {err}"),
        }
    }

    /// Asks the model which action fits `user_text`.
    ///
    /// Unparseable replies fall back to chat; only gateway failures error.
    pub fn classify(&self, user_text: &str) -> Result<Decision, AssistantError> {
        let raw = self
            .gateway
            .respond(SYSTEM_PROMPT, &classification_prompt(user_text))?;
        Ok(Decision::parse_or_chat(&raw, user_text))
    }

    /// Runs the handler named by `decision`.
    ///
    /// Absent arguments default to `user_text` (or the fixed note title).
    /// Chat always sends `user_text` verbatim.
    pub fn dispatch(&self, decision: Decision, user_text: &str) -> Result<String, AssistantError> {
        match decision {
            Decision::Plan { goal, deadline } => {
                self.handle_plan(goal.as_deref().unwrap_or(user_text), deadline)
            }
            Decision::SaveNote { title, content } => self.handle_save_note(
                title.as_deref().unwrap_or(UNTITLED_NOTE_TITLE),
                content.as_deref().unwrap_or(user_text),
            ),
            Decision::SearchNotes { query } => {
                self.handle_search_notes(query.as_deref().unwrap_or(user_text))
            }
            Decision::ListTasks => self.handle_list_tasks(),
            // The model's `message` is often its own answer; chat forwards the user text.
            Decision::Chat { .. } => self.handle_chat(user_text),
        }
    }

    fn handle_plan(&self, goal: &str, deadline: Option<String>) -> Result<String, AssistantError> {
        let plan_text = self
            .gateway
            .respond(SYSTEM_PROMPT, &plan_prompt(goal, deadline.as_deref()))?;
        self.tasks.create_plan(goal, &plan_text, deadline)?;
        Ok(reply::plan_created(&plan_text))
    }

    fn handle_save_note(&self, title: &str, content: &str) -> Result<String, AssistantError> {
        let note = self.notes.save_note(title, content)?;
        Ok(reply::note_saved(&note.title))
    }

    fn handle_search_notes(&self, query: &str) -> Result<String, AssistantError> {
        let hits = self.notes.search(query)?;
        Ok(reply::matching_notes(&hits))
    }

    fn handle_list_tasks(&self) -> Result<String, AssistantError> {
        let tasks = self.tasks.list()?;
        Ok(reply::saved_plans(&tasks))
    }

    fn handle_chat(&self, user_text: &str) -> Result<String, AssistantError> {
        Ok(self.gateway.respond(SYSTEM_PROMPT, user_text)?)
    }
}
