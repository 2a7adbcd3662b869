//! The game engine: orchestration of pick → select → fill → replicate.
//!
//! All gameplay flows through [`GameEngine`]. The per-player state machine
//! is `UNINSTRUCTED → PLAYING → COMPLETE`; the engine derives the current
//! state from the session on every call rather than storing it anywhere.
//!
//! Two properties carry the whole design:
//!
//! - exhaustion is control flow: "nothing left for this player" becomes
//!   [`PlayState::Complete`], never an error;
//! - submissions never fail on a race: a conflicting fill forks a sibling
//!   from the same parent and fills that instead.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use grapevine_store::{AudioStore, GameStore, StoreError};
use grapevine_tree::{ChainTree, NestedChain, TreeError};
use grapevine_types::{
    validate_wav, AudioRef, Chain, ChainId, ChainOrder, Game, GameId, Message, MessageId,
    SelectionMethod, SessionProgress,
};

use crate::error::{EngineError, EngineResult};

/// How many chains the task loop will transiently exclude after finding
/// them drained before giving up and completing the session.
const DEFAULT_MAX_PICK_ATTEMPTS: usize = 8;

/// Parameters for the "new game" action.
#[derive(Clone, Debug)]
pub struct NewGameParams {
    pub name: Option<String>,
    /// Chains to create up front, each seeded with one empty root message.
    pub num_chains: u32,
    pub chain_order: ChainOrder,
    pub selection_method: SelectionMethod,
}

impl Default for NewGameParams {
    fn default() -> Self {
        Self {
            name: None,
            num_chains: 1,
            chain_order: ChainOrder::default(),
            selection_method: SelectionMethod::default(),
        }
    }
}

/// A unit of work handed to a player: record into `message`.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub game: GameId,
    pub message: Message,
    /// The recording to imitate, i.e. the parent's audio. `None` when the task
    /// is a seed, where the player starts the conversation.
    pub prompt_audio: Option<AudioRef>,
}

/// What a player should see right now.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayState {
    /// First visit: show the instructions page.
    Instruct { game: Game },
    /// Mid-game: record into the given message.
    Task(Task),
    /// Nothing left for this player; hand over the completion code.
    Complete {
        game: GameId,
        completion_code: String,
    },
}

/// Result of a submission: what was filled and what comes next.
#[derive(Clone, Debug, PartialEq)]
pub struct RespondOutcome {
    /// The message that actually received the recording; a fork sibling of
    /// the submitted one when a conflict redirected the write.
    pub message: Message,
    pub forked: bool,
    pub next: PlayState,
}

/// Stateless orchestrator over the entity and audio stores.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    audio: Arc<dyn AudioStore>,
    max_pick_attempts: usize,
}

impl GameEngine {
    pub fn new(store: Arc<dyn GameStore>, audio: Arc<dyn AudioStore>) -> Self {
        Self {
            store,
            audio,
            max_pick_attempts: DEFAULT_MAX_PICK_ATTEMPTS,
        }
    }

    /// Override the transient-exclusion retry bound.
    pub fn with_max_pick_attempts(mut self, attempts: usize) -> Self {
        self.max_pick_attempts = attempts;
        self
    }

    /// The entity store backing this engine.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    // ---------------------------------------------------------------
    // Game management
    // ---------------------------------------------------------------

    /// Create a game with its initial chains, each seeded with one empty
    /// root message.
    pub fn new_game(&self, params: NewGameParams) -> EngineResult<Game> {
        let game = self.store.create_game(params.name, params.chain_order)?;
        for _ in 0..params.num_chains.max(1) {
            self.store.create_chain(game.id, params.selection_method)?;
        }
        info!(game = %game.id, chains = params.num_chains.max(1), "created game");
        Ok(game)
    }

    pub fn game(&self, id: GameId) -> EngineResult<Game> {
        Ok(self.store.game(id)?)
    }

    /// Active games, newest first: the public listing.
    pub fn active_games(&self) -> EngineResult<Vec<Game>> {
        Ok(self.store.active_games()?)
    }

    pub fn chains(&self, game: GameId) -> EngineResult<Vec<Chain>> {
        Ok(self.store.chains(game)?)
    }

    // ---------------------------------------------------------------
    // The play cycle
    // ---------------------------------------------------------------

    /// What should this player see right now?
    pub fn play(&self, game: GameId, session: &SessionProgress) -> EngineResult<PlayState> {
        let game = self.store.game(game)?;
        if !session.instructed {
            return Ok(PlayState::Instruct { game });
        }
        match self.next_task(&game, session)? {
            Some(task) => Ok(PlayState::Task(task)),
            None => Ok(self.completed(game.id, session)),
        }
    }

    /// The player accepted the instructions; move to `PLAYING`.
    pub fn accept_instructions(&self, session: &mut SessionProgress) {
        session.instructed = true;
    }

    /// Forget this player's progress; back to `UNINSTRUCTED`. No messages
    /// are touched, so a second pass hears the now-filled recordings.
    pub fn clear_session(&self, session: &mut SessionProgress) {
        session.clear();
    }

    /// Handle a submission against `message`.
    ///
    /// The write itself never fails on a race (see [`fill_with_fork`]);
    /// afterwards the session gains a receipt and the next task is looked
    /// up in the same pass.
    ///
    /// [`fill_with_fork`]: GameEngine::fill_with_fork
    pub fn respond(
        &self,
        session: &mut SessionProgress,
        message: MessageId,
        bytes: &[u8],
    ) -> EngineResult<RespondOutcome> {
        let (filled, forked) = self.fill_with_fork(message, bytes)?;
        session.record_response(filled.chain, filled.id);

        let chain = self.store.chain(filled.chain)?;
        let game = self.store.game(chain.game)?;
        let next = match self.next_task(&game, session)? {
            Some(task) => PlayState::Task(task),
            None => self.completed(game.id, session),
        };
        Ok(RespondOutcome {
            message: filled,
            forked,
            next,
        })
    }

    // ---------------------------------------------------------------
    // Admin surface
    // ---------------------------------------------------------------

    /// Directly attach a recording to a message (admin upload). Same fork
    /// and replication semantics as a player submission, minus the session.
    pub fn upload(&self, message: MessageId, bytes: &[u8]) -> EngineResult<Message> {
        let (filled, _) = self.fill_with_fork(message, bytes)?;
        Ok(filled)
    }

    /// Manually fork an additional empty child off a message ("split").
    pub fn sprout(&self, message: MessageId) -> EngineResult<NestedChain> {
        let message = self.store.message(message)?;
        let child = self.store.create_message(message.chain, Some(message.id))?;
        debug!(parent = %message.id, child = %child.id, "sprouted branch");
        self.inspect_chain(message.chain)
    }

    /// Prune an empty leaf message ("close"). Refused with `NotPrunable`
    /// for filled or non-leaf messages, leaving the tree unchanged.
    pub fn close(&self, message: MessageId) -> EngineResult<NestedChain> {
        let message = self.store.message(message)?;
        self.store.delete_message(message.id)?;
        debug!(message = %message.id, "closed message");
        self.inspect_chain(message.chain)
    }

    /// Every chain in the game, nested for the inspect surface.
    pub fn inspect(&self, game: GameId) -> EngineResult<Vec<NestedChain>> {
        self.store
            .chains(game)?
            .into_iter()
            .map(|chain| self.inspect_chain(chain.id))
            .collect()
    }

    /// One chain, nested.
    pub fn inspect_chain(&self, chain: ChainId) -> EngineResult<NestedChain> {
        let chain = self.store.chain(chain)?;
        let tree = ChainTree::build(chain, self.store.messages(chain.id)?)?;
        Ok(tree.nest())
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn completed(&self, game: GameId, session: &SessionProgress) -> PlayState {
        PlayState::Complete {
            game,
            completion_code: session.completion_code(game),
        }
    }

    /// Pick a chain, then an empty slot in it.
    ///
    /// A chain that turns out drained between pick and select (someone else
    /// consumed its last slot) is excluded transiently and the pick reruns,
    /// up to the attempt bound. `Ok(None)` means this player is done.
    fn next_task(&self, game: &Game, session: &SessionProgress) -> EngineResult<Option<Task>> {
        let chains = self.store.chains(game.id)?;
        let mut excluded: HashSet<ChainId> = session.receipt_set();
        let mut rng = rand::thread_rng();

        for _ in 0..self.max_pick_attempts {
            let chain = match game.pick_next_chain(&chains, &excluded, &mut rng) {
                Ok(chain) => *chain,
                // Game-level exhaustion: this player is done.
                Err(_) => return Ok(None),
            };

            let tree = ChainTree::build(chain, self.store.messages(chain.id)?)?;
            match tree.select_empty_message(&mut rng) {
                Ok(message) => {
                    let prompt_audio = message
                        .parent
                        .and_then(|parent| tree.get(parent))
                        .and_then(|parent| parent.audio.clone());
                    return Ok(Some(Task {
                        game: game.id,
                        message: message.clone(),
                        prompt_audio,
                    }));
                }
                Err(TreeError::NoEmptyMessage(_)) => {
                    debug!(chain = %chain.id, "chain drained between pick and select; retrying");
                    excluded.insert(chain.id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(game = %game.id, attempts = self.max_pick_attempts, "pick attempts exhausted");
        Ok(None)
    }

    /// Validate, then fill, forking a sibling instead of failing whenever
    /// the target turns out to be taken.
    ///
    /// A fork sibling shares its parent and therefore its generation, so
    /// the payload written for the original target is already at the right
    /// path for the sibling; no re-store is needed on the redirect.
    fn fill_with_fork(
        &self,
        message: MessageId,
        bytes: &[u8],
    ) -> EngineResult<(Message, bool)> {
        validate_wav(bytes)?;

        let mut target = self.store.message(message)?;
        if !target.is_empty() {
            // Someone filled this slot while the player was recording.
            target = self.fork_sibling(&target)?;
        }

        let chain = self.store.chain(target.chain)?;
        let stored = self.audio.store(&target.canonical_audio_path(&chain), bytes)?;

        let filled = loop {
            match self.store.fill_message(target.id, stored.clone()) {
                Ok(filled) => break filled,
                // Lost a race inside the submit window itself; fork again.
                Err(StoreError::AlreadyFilled(_)) => {
                    target = self.fork_sibling(&target)?;
                }
                Err(err) => return Err(err.into()),
            }
        };
        let forked = filled.id != message;

        // Replicate: every filled message spawns one empty child, keeping
        // the chain growable.
        self.store.create_message(filled.chain, Some(filled.id))?;
        Ok((filled, forked))
    }

    fn fork_sibling(&self, taken: &Message) -> EngineResult<Message> {
        let parent = taken.parent.ok_or(EngineError::SeedConflict(taken.id))?;
        let sibling = self.store.create_message(taken.chain, Some(parent))?;
        info!(
            taken = %taken.id,
            sibling = %sibling.id,
            "submission conflict; forked a sibling"
        );
        Ok(sibling)
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("max_pick_attempts", &self.max_pick_attempts)
            .finish()
    }
}
