//! Domain model for notes, study plans and routing decisions.
//!
//! # Responsibility
//! - Define the persisted record shapes (`Note`, `Task`).
//! - Define the transient routing `Decision` produced per request.
//!
//! # Invariants
//! - Persisted records are immutable after creation.
//! - A `Decision` is never persisted.

pub mod decision;
pub mod note;
pub mod task;
pub mod timestamp;
