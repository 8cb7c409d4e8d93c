//! Todo domain model.
//!
//! # Responsibility
//! - Define the data structures the store owns and derives views from.
//!
//! # Invariants
//! - Every todo is identified by a stable `TodoId`.
//! - Deletion is a hard removal from the collection.

pub mod todo;
