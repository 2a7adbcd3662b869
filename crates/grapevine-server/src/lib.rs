//! HTTP server for Grapevine.
//!
//! Exposes the play/respond cycle, the inspect surface, and game
//! administration over a JSON API, plus static serving of the recorded
//! media. Session progress rides on a UUID cookie mapped to the server-side
//! session store; handlers load it, thread it through the engine, and save
//! it back.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::GrapevineServer;
pub use state::AppState;
