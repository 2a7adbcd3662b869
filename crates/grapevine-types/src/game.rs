use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::error::PickError;
use crate::id::{ChainId, GameId};

/// How a game hands out chains to players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainOrder {
    /// Oldest unvisited chain first. Deterministic, so a player who reloads
    /// mid-task lands on the same chain again.
    #[default]
    Sequential,
    /// Uniformly random among unvisited chains.
    Random,
}

impl fmt::Display for ChainOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Game lifecycle status. Only active games are listed for play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Top-level control over calls.
///
/// A game owns a set of chains. When played, the game decides which chain a
/// player contributes to next; when inspected, it exposes every chain's full
/// tree. Chains are reached through the store, never held inline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Visible to players; never used for storage paths.
    pub name: Option<String>,
    pub chain_order: ChainOrder,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Determine which chain should be played next.
    ///
    /// `chains` is this game's full chain set in creation order; `excluded`
    /// is the player's receipt set for this session. Only receipt exclusion
    /// is applied; chains are never balanced by message count.
    ///
    /// Fails with [`PickError::NoChains`] when the game owns no chains and
    /// [`PickError::AllChainsVisited`] when every chain is excluded.
    pub fn pick_next_chain<'a, R: Rng>(
        &self,
        chains: &'a [Chain],
        excluded: &HashSet<ChainId>,
        rng: &mut R,
    ) -> Result<&'a Chain, PickError> {
        if chains.is_empty() {
            return Err(PickError::NoChains);
        }

        let remaining: Vec<&Chain> = chains
            .iter()
            .filter(|chain| !excluded.contains(&chain.id))
            .collect();
        if remaining.is_empty() {
            return Err(PickError::AllChainsVisited);
        }

        let picked: &Chain = match self.chain_order {
            ChainOrder::Sequential => remaining
                .iter()
                .min_by_key(|chain| chain.id)
                .copied()
                .expect("remaining is non-empty"),
            ChainOrder::Random => remaining[rng.gen_range(0..remaining.len())],
        };
        Ok(picked)
    }

    /// The directory holding all of this game's recordings.
    pub fn dirname(&self) -> String {
        format!("game-{}", self.id)
    }

    /// Player-facing name, falling back to the directory name.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.dirname())
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::SelectionMethod;
    use rand::rngs::mock::StepRng;

    fn make_game(order: ChainOrder) -> Game {
        Game {
            id: GameId::new(1),
            name: None,
            chain_order: order,
            status: GameStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn make_chain(id: u64) -> Chain {
        Chain {
            id: ChainId::new(id),
            game: GameId::new(1),
            selection_method: SelectionMethod::Youngest,
        }
    }

    fn no_exclusions() -> HashSet<ChainId> {
        HashSet::new()
    }

    #[test]
    fn dirname_uses_id_not_name() {
        let mut game = make_game(ChainOrder::Sequential);
        game.name = Some("The Game Name".into());
        assert_eq!(game.dirname(), "game-1");
        assert_eq!(game.display_name(), "The Game Name");
    }

    #[test]
    fn display_name_falls_back_to_dirname() {
        let game = make_game(ChainOrder::Sequential);
        assert_eq!(game.display_name(), "game-1");
    }

    #[test]
    fn sequential_pick_returns_smallest_id() {
        let game = make_game(ChainOrder::Sequential);
        let chains = vec![make_chain(1), make_chain(2), make_chain(3)];
        let mut rng = StepRng::new(0, 1);

        let picked = game
            .pick_next_chain(&chains, &no_exclusions(), &mut rng)
            .unwrap();
        assert_eq!(picked.id, ChainId::new(1));
    }

    #[test]
    fn sequential_pick_walks_the_exclusion_set() {
        let game = make_game(ChainOrder::Sequential);
        let chains = vec![make_chain(1), make_chain(2), make_chain(3)];
        let mut rng = StepRng::new(0, 1);

        let mut excluded = HashSet::new();
        excluded.insert(ChainId::new(1));
        let picked = game.pick_next_chain(&chains, &excluded, &mut rng).unwrap();
        assert_eq!(picked.id, ChainId::new(2));

        excluded.insert(ChainId::new(2));
        let picked = game.pick_next_chain(&chains, &excluded, &mut rng).unwrap();
        assert_eq!(picked.id, ChainId::new(3));
    }

    #[test]
    fn empty_game_has_no_chains() {
        let game = make_game(ChainOrder::Sequential);
        let mut rng = StepRng::new(0, 1);
        let err = game
            .pick_next_chain(&[], &no_exclusions(), &mut rng)
            .unwrap_err();
        assert_eq!(err, PickError::NoChains);
    }

    #[test]
    fn fully_excluded_game_is_visited() {
        let game = make_game(ChainOrder::Sequential);
        let chains = vec![make_chain(1), make_chain(2)];
        let excluded: HashSet<ChainId> = chains.iter().map(|c| c.id).collect();
        let mut rng = StepRng::new(0, 1);

        let err = game.pick_next_chain(&chains, &excluded, &mut rng).unwrap_err();
        assert_eq!(err, PickError::AllChainsVisited);
    }

    #[test]
    fn random_pick_only_returns_non_excluded() {
        let game = make_game(ChainOrder::Random);
        let chains = vec![make_chain(1), make_chain(2), make_chain(3)];
        let mut excluded = HashSet::new();
        excluded.insert(ChainId::new(2));

        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let picked = game.pick_next_chain(&chains, &excluded, &mut rng).unwrap();
            assert_ne!(picked.id, ChainId::new(2));
        }
    }

    #[test]
    fn defaults_match_new_games() {
        assert_eq!(ChainOrder::default(), ChainOrder::Sequential);
        assert_eq!(GameStatus::default(), GameStatus::Active);
    }
}
