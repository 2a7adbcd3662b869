//! Audio payload stores.
//!
//! Recordings live at paths deterministic from chain and generation:
//! `game-{g}/chain-{c}/{generation}.wav`. Export tooling reconstructs a
//! whole experiment from this layout, so the first write at a generation
//! always takes the canonical name. A fork landing on an occupied
//! generation is shunted to the next free `-{n}` suffix.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use grapevine_types::AudioRef;

use crate::error::{StoreError, StoreResult};
use crate::traits::AudioStore;

/// Split `game-1/chain-2/3.wav` into (`game-1/chain-2/3`, `.wav`).
fn split_extension(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => path.split_at(dot),
        _ => (path, ""),
    }
}

/// Reject absolute paths and traversal components before touching storage.
fn check_relative(path: &str) -> StoreResult<()> {
    let p = Path::new(path);
    let escapes = p.is_absolute()
        || p.components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes || path.is_empty() {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// In-memory audio store for tests and embedding.
pub struct InMemoryAudioStore {
    payloads: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAudioStore {
    pub fn new() -> Self {
        Self {
            payloads: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.payloads.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryAudioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioStore for InMemoryAudioStore {
    fn store(&self, path: &str, bytes: &[u8]) -> StoreResult<AudioRef> {
        check_relative(path)?;
        let mut payloads = self.payloads.write().expect("lock poisoned");

        let (stem, ext) = split_extension(path);
        let mut candidate = path.to_string();
        let mut n = 0u32;
        while payloads.contains_key(&candidate) {
            n += 1;
            candidate = format!("{stem}-{n}{ext}");
        }

        payloads.insert(candidate.clone(), bytes.to_vec());
        Ok(AudioRef::new(candidate))
    }

    fn read(&self, audio: &AudioRef) -> StoreResult<Option<Vec<u8>>> {
        let payloads = self.payloads.read().expect("lock poisoned");
        Ok(payloads.get(audio.as_str()).cloned())
    }

    fn exists(&self, audio: &AudioRef) -> StoreResult<bool> {
        let payloads = self.payloads.read().expect("lock poisoned");
        Ok(payloads.contains_key(audio.as_str()))
    }
}

/// Filesystem audio store rooted at a media directory.
///
/// Writes go through a lock so the collision probe and the write are one
/// step; directories are created on demand.
pub struct FsAudioStore {
    root: PathBuf,
    write_lock: RwLock<()>,
}

impl FsAudioStore {
    /// Create a store rooted at `root`. The directory itself is created
    /// lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: RwLock::new(()),
        }
    }

    /// The media root this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl AudioStore for FsAudioStore {
    fn store(&self, path: &str, bytes: &[u8]) -> StoreResult<AudioRef> {
        check_relative(path)?;
        let _guard = self.write_lock.write().expect("lock poisoned");

        let (stem, ext) = split_extension(path);
        let mut candidate = path.to_string();
        let mut n = 0u32;
        while self.full_path(&candidate).exists() {
            n += 1;
            candidate = format!("{stem}-{n}{ext}");
        }

        let full = self.full_path(&candidate);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, bytes)?;
        debug!(path = %candidate, bytes = bytes.len(), "stored recording");
        Ok(AudioRef::new(candidate))
    }

    fn read(&self, audio: &AudioRef) -> StoreResult<Option<Vec<u8>>> {
        check_relative(audio.as_str())?;
        match std::fs::read(self.full_path(audio.as_str())) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self, audio: &AudioRef) -> StoreResult<bool> {
        check_relative(audio.as_str())?;
        Ok(self.full_path(audio.as_str()).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "game-1/chain-2/0.wav";

    // -----------------------------------------------------------------------
    // Shared behavior, exercised against both backends
    // -----------------------------------------------------------------------

    fn first_write_takes_canonical_name(store: &dyn AudioStore) {
        let audio = store.store(CANONICAL, b"take one").unwrap();
        assert_eq!(audio.as_str(), CANONICAL);
        assert!(store.exists(&audio).unwrap());
        assert_eq!(store.read(&audio).unwrap().unwrap(), b"take one");
    }

    fn collisions_get_deterministic_suffixes(store: &dyn AudioStore) {
        let first = store.store(CANONICAL, b"one").unwrap();
        let second = store.store(CANONICAL, b"two").unwrap();
        let third = store.store(CANONICAL, b"three").unwrap();

        assert_eq!(first.as_str(), "game-1/chain-2/0.wav");
        assert_eq!(second.as_str(), "game-1/chain-2/0-1.wav");
        assert_eq!(third.as_str(), "game-1/chain-2/0-2.wav");

        // Nothing was overwritten.
        assert_eq!(store.read(&first).unwrap().unwrap(), b"one");
        assert_eq!(store.read(&second).unwrap().unwrap(), b"two");
    }

    fn missing_path_reads_none(store: &dyn AudioStore) {
        let missing = AudioRef::new("game-9/chain-9/9.wav");
        assert!(!store.exists(&missing).unwrap());
        assert!(store.read(&missing).unwrap().is_none());
    }

    fn traversal_is_rejected(store: &dyn AudioStore) {
        assert!(matches!(
            store.store("../evil.wav", b"x"),
            Err(StoreError::InvalidPath(_))
        ));
        assert!(matches!(
            store.store("/abs/evil.wav", b"x"),
            Err(StoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn memory_store_behavior() {
        first_write_takes_canonical_name(&InMemoryAudioStore::new());
        collisions_get_deterministic_suffixes(&InMemoryAudioStore::new());
        missing_path_reads_none(&InMemoryAudioStore::new());
        traversal_is_rejected(&InMemoryAudioStore::new());
    }

    #[test]
    fn fs_store_behavior() {
        let dir = tempfile::tempdir().unwrap();
        first_write_takes_canonical_name(&FsAudioStore::new(dir.path()));

        let dir = tempfile::tempdir().unwrap();
        collisions_get_deterministic_suffixes(&FsAudioStore::new(dir.path()));

        let dir = tempfile::tempdir().unwrap();
        missing_path_reads_none(&FsAudioStore::new(dir.path()));
        traversal_is_rejected(&FsAudioStore::new(dir.path()));
    }

    #[test]
    fn fs_store_lays_out_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path());
        store.store("game-3/chain-7/2.wav", b"payload").unwrap();
        assert!(dir.path().join("game-3/chain-7/2.wav").is_file());
    }

    #[test]
    fn extension_splitting() {
        assert_eq!(split_extension("a/b/0.wav"), ("a/b/0", ".wav"));
        assert_eq!(split_extension("a/b/noext"), ("a/b/noext", ""));
        assert_eq!(split_extension("a.b/noext"), ("a.b/noext", ""));
    }
}
