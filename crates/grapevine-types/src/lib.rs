//! Foundation types for Grapevine, the telephone-game experiment platform.
//!
//! This crate provides the entity, identity, and session types used
//! throughout the Grapevine system. Every other Grapevine crate depends on
//! `grapevine-types`.
//!
//! # Key Types
//!
//! - [`GameId`] / [`ChainId`] / [`MessageId`] — creation-ordered entity ids
//! - [`Game`] — a collection of chains plus the chain-selection policy
//! - [`Chain`] — an ordered tree of messages rooted at one seed
//! - [`Message`] — a single audio slot, empty until filled
//! - [`SessionProgress`] — per-player state surviving across requests
//! - [`AudioRef`] — a recording's storage path, relative to the media root

pub mod audio;
pub mod chain;
pub mod error;
pub mod game;
pub mod id;
pub mod message;
pub mod session;

pub use audio::{validate_wav, AudioRef};
pub use chain::{Chain, SelectionMethod};
pub use error::{AudioError, PickError};
pub use game::{ChainOrder, Game, GameStatus};
pub use id::{ChainId, GameId, MessageId};
pub use message::Message;
pub use session::{SessionId, SessionProgress};
