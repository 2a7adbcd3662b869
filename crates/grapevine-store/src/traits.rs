use grapevine_types::{
    AudioRef, Chain, ChainId, ChainOrder, Game, GameId, GameStatus, Message, MessageId,
    SelectionMethod,
};

use crate::error::StoreResult;

/// Entity store for games, chains, and messages.
///
/// All implementations must satisfy these invariants:
/// - Ids are allocated monotonically in creation order, starting at 1.
/// - A chain is created together with its seed message; at no point does a
///   chain without a root exist.
/// - At most one parent-less message per chain; generations are computed
///   from the parent at creation and never change.
/// - [`fill_message`] is an atomic check-and-set: under concurrent calls on
///   one empty message, exactly one succeeds and the rest observe
///   `AlreadyFilled`. This is the only cross-player synchronization in the
///   system.
/// - [`delete_message`] refuses messages with audio or children and leaves
///   the tree unchanged when it refuses.
///
/// [`fill_message`]: GameStore::fill_message
/// [`delete_message`]: GameStore::delete_message
pub trait GameStore: Send + Sync {
    /// Create a game. Chains are added separately via [`create_chain`].
    ///
    /// [`create_chain`]: GameStore::create_chain
    fn create_game(&self, name: Option<String>, chain_order: ChainOrder) -> StoreResult<Game>;

    /// Toggle a game's lifecycle status.
    fn set_game_status(&self, game: GameId, status: GameStatus) -> StoreResult<Game>;

    /// Fetch a game by id.
    fn game(&self, id: GameId) -> StoreResult<Game>;

    /// All games in creation order.
    fn games(&self) -> StoreResult<Vec<Game>>;

    /// Active games, newest first: the public game listing.
    fn active_games(&self) -> StoreResult<Vec<Game>> {
        let mut games: Vec<Game> = self
            .games()?
            .into_iter()
            .filter(Game::is_active)
            .collect();
        games.reverse();
        Ok(games)
    }

    /// Create a chain in a game, seeded with one empty root message.
    fn create_chain(
        &self,
        game: GameId,
        selection_method: SelectionMethod,
    ) -> StoreResult<(Chain, Message)>;

    /// Fetch a chain by id.
    fn chain(&self, id: ChainId) -> StoreResult<Chain>;

    /// A game's chains in creation order.
    fn chains(&self, game: GameId) -> StoreResult<Vec<Chain>>;

    /// Create an empty message in a chain.
    ///
    /// With `parent = None` this creates the chain's seed and fails with
    /// `SeedExists` if one is already present; otherwise the generation is
    /// the parent's + 1 and the parent must belong to the same chain.
    fn create_message(&self, chain: ChainId, parent: Option<MessageId>) -> StoreResult<Message>;

    /// Fetch a message by id.
    fn message(&self, id: MessageId) -> StoreResult<Message>;

    /// A chain's messages in creation order.
    fn messages(&self, chain: ChainId) -> StoreResult<Vec<Message>>;

    /// Attach a recording to an empty message (atomic check-and-set).
    ///
    /// Returns the updated message, or `AlreadyFilled` if another player got
    /// there first. Never overwrites.
    fn fill_message(&self, id: MessageId, audio: AudioRef) -> StoreResult<Message>;

    /// Remove an empty leaf message ("close"/prune).
    ///
    /// Fails with `NotPrunable` when the message has audio or children.
    fn delete_message(&self, id: MessageId) -> StoreResult<()>;
}

/// Payload store for audio recordings.
///
/// Paths are relative to a media root and deterministic from chain and
/// generation (`game-{g}/chain-{c}/{generation}.wav`). The store never
/// overwrites: a write to an occupied path lands at the next free
/// `-{n}`-suffixed sibling, and the actually-used path is returned.
pub trait AudioStore: Send + Sync {
    /// Persist a payload at (or next to) the requested relative path,
    /// returning the path actually used.
    fn store(&self, path: &str, bytes: &[u8]) -> StoreResult<AudioRef>;

    /// Read a payload back. `Ok(None)` if the path holds nothing.
    fn read(&self, audio: &AudioRef) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether a payload exists at the path.
    fn exists(&self, audio: &AudioRef) -> StoreResult<bool>;
}
