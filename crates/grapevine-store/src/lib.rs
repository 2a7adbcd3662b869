//! Storage boundary for Grapevine.
//!
//! Two trait boundaries live here:
//!
//! - [`GameStore`] — games, chains, and messages, including the one
//!   concurrency primitive the whole design needs: the atomic
//!   check-and-set [`GameStore::fill_message`].
//! - [`AudioStore`] — recording payloads at deterministic relative paths,
//!   with in-memory and filesystem backends.
//!
//! In-memory implementations back tests and embedding; the filesystem audio
//! store backs deployments (entity rows are small enough that the in-memory
//! game store serves a running experiment directly).

pub mod audio;
pub mod error;
pub mod memory;
pub mod traits;

pub use audio::{FsAudioStore, InMemoryAudioStore};
pub use error::{PruneBlock, StoreError, StoreResult};
pub use memory::InMemoryGameStore;
pub use traits::{AudioStore, GameStore};
