//! The allocation protocol for Grapevine.
//!
//! This crate is the heart of the system. It answers, for any player at any
//! moment, "what should you do next?", while guaranteeing that concurrent
//! players never collide on a slot and that no submission is ever rejected
//! on an allocation race; a lost race forks an extra branch instead.
//!
//! The protocol itself is stateless; all state lives in the stores and in
//! each player's [`SessionProgress`], which is threaded explicitly through
//! every call.
//!
//! [`SessionProgress`]: grapevine_types::SessionProgress

pub mod engine;
pub mod error;
pub mod session;

pub use engine::{GameEngine, NewGameParams, PlayState, RespondOutcome, Task};
pub use error::{EngineError, EngineResult};
pub use session::SessionStore;
