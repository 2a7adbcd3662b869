use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// A recording's storage path, relative to the media root.
///
/// The canonical layout is `game-{game}/chain-{chain}/{generation}.wav`.
/// External tooling (export, download links) depends on this layout, so the
/// path stored here is the one the audio store actually wrote, suffix and
/// all.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(String);

impl AudioRef {
    /// Wrap a relative storage path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The relative path, as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AudioRef {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Minimum size of a well-formed WAV file: the 44-byte canonical header.
const WAV_HEADER_LEN: usize = 44;

/// Check that a submitted payload looks like a WAV recording.
///
/// Sniffs the RIFF/WAVE container header. Browsers submit what the recorder
/// widget produced, so a full codec parse is not warranted here; a malformed
/// body is rejected before any state changes.
pub fn validate_wav(bytes: &[u8]) -> Result<(), AudioError> {
    if bytes.len() < WAV_HEADER_LEN {
        return Err(AudioError::Truncated { len: bytes.len() });
    }
    if &bytes[..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::NotWav);
    }
    Ok(())
}

/// Build a minimal valid WAV payload around raw sample bytes.
///
/// Test helper for the rest of the workspace; not used on the request path.
pub fn wav_stub(samples: &[u8]) -> Vec<u8> {
    let data_len = samples.len() as u32;
    let riff_len = 36 + data_len;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + samples.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&44_100u32.to_le_bytes());
    out.extend_from_slice(&88_200u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(samples);
    out
}
