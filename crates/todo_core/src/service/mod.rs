//! Core use-case services.
//!
//! # Responsibility
//! - Expose the todo store operations to presentation callers.
//! - Keep callers decoupled from storage and codec details.

pub mod todo_store;
