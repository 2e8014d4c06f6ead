//! Progress Tracking
//!
//! Completion store, consistency enforcement and the mutation engine that
//! keeps a student's completed courses consistent with the prerequisite
//! graph.

#![warn(missing_docs)]

pub mod error;
pub mod store;
pub mod enforcer;
pub mod observer;
pub mod engine;

pub use error::{EngineError, Result};
pub use store::CompletionStore;
pub use enforcer::{enforce, Enforcement};
pub use observer::Observer;
pub use engine::{Engine, EngineConfig};
