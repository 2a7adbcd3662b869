use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::{ChainId, GameId, MessageId};

/// Opaque identifier tying a browser session to its server-side progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-player progress through a game.
///
/// Survives across requests for the duration of the browser session and is
/// always passed explicitly into allocation calls; there is no ambient
/// "current session". Clearing it forgets the player's progress without
/// touching any messages; a second pass through the same game then hears
/// the now-filled recordings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    /// Has the player accepted the instructions page?
    pub instructed: bool,
    /// Chains already responded to this session, in response order.
    pub receipts: Vec<ChainId>,
    /// Messages filled this session, in fill order. Basis of the
    /// completion code.
    pub messages: Vec<MessageId>,
}

impl SessionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The receipts as a set, for chain exclusion.
    pub fn receipt_set(&self) -> HashSet<ChainId> {
        self.receipts.iter().copied().collect()
    }

    /// Record a successful response: one receipt, one filled message.
    pub fn record_response(&mut self, chain: ChainId, message: MessageId) {
        self.receipts.push(chain);
        self.messages.push(message);
    }

    /// The completion code handed to external reward verification:
    /// `G{game}-{dash-joined message ids in fill order}`. Format is stable.
    pub fn completion_code(&self, game: GameId) -> String {
        let receipts = self
            .messages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("-");
        format!("G{game}-{receipts}")
    }

    /// Forget all progress, returning the player to the instructions page.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
