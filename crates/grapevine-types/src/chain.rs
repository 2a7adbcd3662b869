use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ChainId, GameId};

/// How a chain hands out empty message slots to players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Smallest generation first, ties broken by creation order. Keeps the
    /// tree growing shallow instead of always deepening one branch.
    #[default]
    Youngest,
    /// Uniformly random among empty slots.
    Random,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Youngest => write!(f, "youngest"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// A collection of messages forming one branching conversation.
///
/// Every chain is rooted at exactly one parent-less seed message. The tree
/// itself lives in the store; selection and traversal are provided by
/// `grapevine-tree` over the chain's message rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: ChainId,
    pub game: GameId,
    pub selection_method: SelectionMethod,
}

impl Chain {
    /// The directory holding this chain's recordings, relative to the game.
    pub fn dirname(&self) -> String {
        format!("chain-{}", self.id)
    }

    /// The chain's directory relative to the media root.
    pub fn dirpath(&self) -> String {
        format!("game-{}/{}", self.game, self.dirname())
    }
}
