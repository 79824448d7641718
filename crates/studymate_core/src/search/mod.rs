//! Note search entry points.
//!
//! # Responsibility
//! - Expose keyword lookup over stored notes.
//! - Keep result shaping (ordering, truncation) inside core.

pub mod substring;
