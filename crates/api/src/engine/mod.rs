//! Generation execution engine.
//!
//! Contains the background dispatcher that drains the queue of pending
//! generation requests, runs each through the artifact producer, stores the
//! result, and records the terminal outcome.

pub mod dispatcher;

pub use dispatcher::GenerationDispatcher;
