//! Storage abstraction and implementations for Malla.
//!
//! This crate provides a trait-based interface for persisting the set of
//! completed courses, with a JSON file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result, COMPLETED_MARKER};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
