//! Core logic for the StudyMate assistant.
//! Routes free-text requests to study-plan, note and chat handlers.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod repo;
pub mod router;
pub mod search;
pub mod service;

pub use config::{AssistantConfig, ConfigError, ModelConfig, StoreConfig};
pub use gateway::{
    build_gateway, EchoGateway, GatewayError, GatewayResult, HttpGateway, ModelGateway,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::decision::{Action, Decision, DecisionParseError};
pub use model::note::{Note, UNTITLED_NOTE_TITLE};
pub use model::task::Task;
pub use repo::note_repo::{JsonNoteRepository, NoteRepository};
pub use repo::task_repo::{JsonTaskRepository, TaskRepository};
pub use repo::{StoreError, StoreResult};
pub use router::{Assistant, AssistantError, IntentRouter};
pub use search::substring::{search_notes, SearchQuery, DEFAULT_SEARCH_LIMIT};
pub use service::note_service::NoteService;
pub use service::task_service::{split_plan_steps, TaskService};
