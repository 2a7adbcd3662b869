use thiserror::Error;

/// Failures when picking the next chain for a player.
///
/// Both variants are expected, recoverable outcomes: the allocation protocol
/// treats them as "this player is done", never as server errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    /// The game owns no chains at all.
    #[error("no chains in game")]
    NoChains,

    /// Every chain in the game appears in the player's receipts.
    #[error("all chains already visited this session")]
    AllChainsVisited,
}

/// Failures when validating a submitted audio payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The payload was empty or shorter than a WAV header.
    #[error("audio payload is missing or truncated ({len} bytes)")]
    Truncated { len: usize },

    /// The payload does not carry a RIFF/WAVE header.
    #[error("audio payload is not a WAV file")]
    NotWav,
}
