//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Turn handler arguments into persisted records.
//! - Keep the router decoupled from storage details.

pub mod note_service;
pub mod task_service;
