use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Root directory for recorded media; mirrored at `/media/` over HTTP.
    pub media_root: PathBuf,
    /// Name of the session cookie.
    pub session_cookie: String,
    /// Retry bound for the transient-exclusion loop in the engine.
    pub max_pick_attempts: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8070".parse().unwrap(),
            media_root: PathBuf::from("media"),
            session_cookie: "grapevine_session".into(),
            max_pick_attempts: 8,
        }
    }
}

impl ServerConfig {
    /// Load a config from a TOML file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8070".parse::<SocketAddr>().unwrap());
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert_eq!(config.session_cookie, "grapevine_session");
        assert_eq!(config.max_pick_attempts, 8);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grapevine.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:9000\"\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.session_cookie, "grapevine_session");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grapevine.toml");
        std::fs::write(&path, "bind_addr = 12").unwrap();
        assert!(matches!(
            ServerConfig::load(&path),
            Err(ServerError::Config(_))
        ));
    }
}
