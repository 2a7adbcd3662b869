use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioRef;
use crate::chain::Chain;
use crate::id::{ChainId, MessageId};

/// A single audio slot in a chain's tree.
///
/// A message is *empty* until a recording is attached; empty messages are
/// the allocation candidates handed to players. The seed of a chain is the
/// one message with no parent, at generation 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chain: ChainId,
    /// `None` only at the chain's seed.
    pub parent: Option<MessageId>,
    /// Seed is 0; every other message is its parent's generation + 1.
    /// Computed at creation, never supplied by callers.
    pub generation: u32,
    /// `None` means "empty slot awaiting a recording".
    pub audio: Option<AudioRef>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// `true` iff no recording has been attached yet.
    pub fn is_empty(&self) -> bool {
        self.audio.is_none()
    }

    /// `true` iff this is the chain's seed.
    pub fn is_seed(&self) -> bool {
        self.parent.is_none()
    }

    /// The canonical storage path for this message's recording.
    ///
    /// `game-{game}/chain-{chain}/{generation}.wav`, stable across
    /// reimplementations; export tooling and tests depend on it. Forks
    /// landing on an occupied generation are disambiguated by the audio
    /// store, not here.
    pub fn canonical_audio_path(&self, chain: &Chain) -> String {
        format!("{}/{}.wav", chain.dirpath(), self.generation)
    }

    /// Player-facing name, falling back to `message-{id}`.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("message-{}", self.id))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::SelectionMethod;
    use crate::id::GameId;

    fn make_message(id: u64, generation: u32) -> Message {
        Message {
            id: MessageId::new(id),
            chain: ChainId::new(3),
            parent: (generation > 0).then(|| MessageId::new(id - 1)),
            generation,
            audio: None,
            name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_until_filled() {
        let mut message = make_message(1, 0);
        assert!(message.is_empty());
        message.audio = Some(AudioRef::new("game-1/chain-3/0.wav"));
        assert!(!message.is_empty());
    }

    #[test]
    fn seed_has_no_parent() {
        assert!(make_message(1, 0).is_seed());
        assert!(!make_message(2, 1).is_seed());
    }

    #[test]
    fn canonical_path_is_game_chain_generation() {
        let chain = Chain {
            id: ChainId::new(3),
            game: GameId::new(1),
            selection_method: SelectionMethod::Youngest,
        };
        let message = make_message(5, 2);
        assert_eq!(message.canonical_audio_path(&chain), "game-1/chain-3/2.wav");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut message = make_message(9, 1);
        assert_eq!(message.display_name(), "message-9");
        message.name = Some("seed-take-2".into());
        assert_eq!(message.display_name(), "seed-take-2");
    }
}
