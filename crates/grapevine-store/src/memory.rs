//! In-memory game store.
//!
//! [`InMemoryGameStore`] keeps all entities in `BTreeMap`s behind a single
//! `RwLock`, which is what makes [`fill_message`] a true check-and-set: the
//! emptiness test and the write happen inside one write-lock critical
//! section. Entity counts are bounded by player activity (tens to low
//! hundreds of messages per chain), so a single process comfortably serves
//! a running experiment.
//!
//! [`fill_message`]: crate::GameStore::fill_message

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use grapevine_types::{
    AudioRef, Chain, ChainId, ChainOrder, Game, GameId, GameStatus, Message, MessageId,
    SelectionMethod,
};

use crate::error::{PruneBlock, StoreError, StoreResult};
use crate::traits::GameStore;

#[derive(Default)]
struct Inner {
    games: BTreeMap<u64, Game>,
    chains: BTreeMap<u64, Chain>,
    messages: BTreeMap<u64, Message>,
    next_game: u64,
    next_chain: u64,
    next_message: u64,
}

impl Inner {
    fn alloc_game(&mut self) -> GameId {
        self.next_game += 1;
        GameId::new(self.next_game)
    }

    fn alloc_chain(&mut self) -> ChainId {
        self.next_chain += 1;
        ChainId::new(self.next_chain)
    }

    fn alloc_message(&mut self) -> MessageId {
        self.next_message += 1;
        MessageId::new(self.next_message)
    }

    /// Seed-or-child creation shared by `create_chain` and `create_message`.
    fn insert_message(
        &mut self,
        chain: ChainId,
        parent: Option<MessageId>,
    ) -> StoreResult<Message> {
        if !self.chains.contains_key(&chain.value()) {
            return Err(StoreError::ChainNotFound(chain));
        }

        let generation = match parent {
            None => {
                let seed = self
                    .messages
                    .values()
                    .find(|message| message.chain == chain && message.is_seed());
                if let Some(seed) = seed {
                    return Err(StoreError::SeedExists {
                        chain,
                        seed: seed.id,
                    });
                }
                0
            }
            Some(parent_id) => {
                let parent = self
                    .messages
                    .get(&parent_id.value())
                    .ok_or(StoreError::MessageNotFound(parent_id))?;
                if parent.chain != chain {
                    return Err(StoreError::ForeignParent {
                        parent: parent_id,
                        chain,
                    });
                }
                parent.generation + 1
            }
        };

        let message = Message {
            id: self.alloc_message(),
            chain,
            parent,
            generation,
            audio: None,
            name: None,
            created_at: Utc::now(),
        };
        self.messages.insert(message.id.value(), message.clone());
        debug!(message = %message.id, chain = %chain, generation, "created message");
        Ok(message)
    }
}

/// An in-memory implementation of [`GameStore`].
///
/// All data lives behind a `RwLock` and is lost when the store is dropped.
pub struct InMemoryGameStore {
    inner: RwLock<Inner>,
}

impl InMemoryGameStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Total number of messages across all chains.
    pub fn message_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").messages.len()
    }
}

impl Default for InMemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore for InMemoryGameStore {
    fn create_game(&self, name: Option<String>, chain_order: ChainOrder) -> StoreResult<Game> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let game = Game {
            id: inner.alloc_game(),
            name,
            chain_order,
            status: GameStatus::Active,
            created_at: Utc::now(),
        };
        inner.games.insert(game.id.value(), game.clone());
        debug!(game = %game.id, order = %game.chain_order, "created game");
        Ok(game)
    }

    fn set_game_status(&self, game: GameId, status: GameStatus) -> StoreResult<Game> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let game = inner
            .games
            .get_mut(&game.value())
            .ok_or(StoreError::GameNotFound(game))?;
        game.status = status;
        Ok(game.clone())
    }

    fn game(&self, id: GameId) -> StoreResult<Game> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .games
            .get(&id.value())
            .cloned()
            .ok_or(StoreError::GameNotFound(id))
    }

    fn games(&self) -> StoreResult<Vec<Game>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.games.values().cloned().collect())
    }

    fn create_chain(
        &self,
        game: GameId,
        selection_method: SelectionMethod,
    ) -> StoreResult<(Chain, Message)> {
        let mut inner = self.inner.write().expect("lock poisoned");
        if !inner.games.contains_key(&game.value()) {
            return Err(StoreError::GameNotFound(game));
        }

        let chain = Chain {
            id: inner.alloc_chain(),
            game,
            selection_method,
        };
        inner.chains.insert(chain.id.value(), chain);
        let seed = inner.insert_message(chain.id, None)?;
        debug!(chain = %chain.id, game = %game, seed = %seed.id, "created chain");
        Ok((chain, seed))
    }

    fn chain(&self, id: ChainId) -> StoreResult<Chain> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .chains
            .get(&id.value())
            .copied()
            .ok_or(StoreError::ChainNotFound(id))
    }

    fn chains(&self, game: GameId) -> StoreResult<Vec<Chain>> {
        let inner = self.inner.read().expect("lock poisoned");
        if !inner.games.contains_key(&game.value()) {
            return Err(StoreError::GameNotFound(game));
        }
        Ok(inner
            .chains
            .values()
            .filter(|chain| chain.game == game)
            .copied()
            .collect())
    }

    fn create_message(&self, chain: ChainId, parent: Option<MessageId>) -> StoreResult<Message> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.insert_message(chain, parent)
    }

    fn message(&self, id: MessageId) -> StoreResult<Message> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .messages
            .get(&id.value())
            .cloned()
            .ok_or(StoreError::MessageNotFound(id))
    }

    fn messages(&self, chain: ChainId) -> StoreResult<Vec<Message>> {
        let inner = self.inner.read().expect("lock poisoned");
        if !inner.chains.contains_key(&chain.value()) {
            return Err(StoreError::ChainNotFound(chain));
        }
        Ok(inner
            .messages
            .values()
            .filter(|message| message.chain == chain)
            .cloned()
            .collect())
    }

    fn fill_message(&self, id: MessageId, audio: AudioRef) -> StoreResult<Message> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let message = inner
            .messages
            .get_mut(&id.value())
            .ok_or(StoreError::MessageNotFound(id))?;

        // Check-and-set under the write lock: losers of a fill race see
        // AlreadyFilled and fork a sibling instead.
        if message.audio.is_some() {
            return Err(StoreError::AlreadyFilled(id));
        }
        message.audio = Some(audio);
        debug!(message = %id, chain = %message.chain, "filled message");
        Ok(message.clone())
    }

    fn delete_message(&self, id: MessageId) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let message = inner
            .messages
            .get(&id.value())
            .ok_or(StoreError::MessageNotFound(id))?;

        if message.audio.is_some() {
            return Err(StoreError::NotPrunable {
                message: id,
                reason: PruneBlock::HasAudio,
            });
        }
        let has_children = inner
            .messages
            .values()
            .any(|other| other.parent == Some(id));
        if has_children {
            return Err(StoreError::NotPrunable {
                message: id,
                reason: PruneBlock::HasChildren,
            });
        }

        inner.messages.remove(&id.value());
        debug!(message = %id, "pruned message");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryGameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryGameStore")
            .field("games", &inner.games.len())
            .field("chains", &inner.chains.len())
            .field("messages", &inner.messages.len())
            .finish()
    }
}
