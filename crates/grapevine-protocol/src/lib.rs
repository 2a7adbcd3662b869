//! HTTP API contract for Grapevine.
//!
//! Defines the endpoint paths and the request/response shapes exchanged
//! between the server, the recorder client, and the CLI. The annotated tree
//! views produced here (media URLs plus per-message action URLs) are the
//! exact JSON the inspect page renders.

pub mod endpoint;
pub mod message;

pub use endpoint::{routes, HealthResponse};
pub use message::{
    ChainView, GameView, MessageNodeView, NewGameRequest, PlayView, RespondResponse, TaskView,
};
