/// Endpoint paths and URL builders.
///
/// The `:id`-style patterns are what the server's router binds; the `*_url`
/// builders produce the concrete links embedded in responses. Keeping both
/// in one module is what stops them drifting apart.
pub mod routes {
    use grapevine_types::{AudioRef, ChainId, GameId, MessageId};

    pub const HEALTH: &str = "/api/health";
    pub const GAMES: &str = "/api/games";
    pub const PLAY: &str = "/api/games/:id/play";
    pub const ACCEPT: &str = "/api/games/:id/accept";
    pub const CLEAR: &str = "/api/games/:id/clear";
    pub const INSPECT: &str = "/api/games/:id/inspect";
    pub const CHAIN: &str = "/api/chains/:id";
    pub const RESPOND: &str = "/api/messages/:id/respond";
    pub const SPROUT: &str = "/api/messages/:id/sprout";
    pub const CLOSE: &str = "/api/messages/:id/close";
    pub const UPLOAD: &str = "/api/messages/:id/upload";
    /// Media files are served beneath this prefix, mirroring the storage
    /// layout (`/media/game-{g}/chain-{c}/{generation}.wav`).
    pub const MEDIA: &str = "/media";

    pub fn play_url(game: GameId) -> String {
        format!("/api/games/{game}/play")
    }

    pub fn inspect_url(game: GameId) -> String {
        format!("/api/games/{game}/inspect")
    }

    pub fn chain_url(chain: ChainId) -> String {
        format!("/api/chains/{chain}")
    }

    pub fn respond_url(message: MessageId) -> String {
        format!("/api/messages/{message}/respond")
    }

    pub fn sprout_url(message: MessageId) -> String {
        format!("/api/messages/{message}/sprout")
    }

    pub fn close_url(message: MessageId) -> String {
        format!("/api/messages/{message}/close")
    }

    pub fn upload_url(message: MessageId) -> String {
        format!("/api/messages/{message}/upload")
    }

    pub fn media_url(audio: &AudioRef) -> String {
        format!("{MEDIA}/{audio}")
    }
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapevine_types::{AudioRef, ChainId, GameId, MessageId};

    #[test]
    fn health_response_defaults() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "ok");
    }

    #[test]
    fn url_builders_match_route_patterns() {
        assert_eq!(routes::play_url(GameId::new(3)), "/api/games/3/play");
        assert_eq!(routes::chain_url(ChainId::new(2)), "/api/chains/2");
        assert_eq!(routes::sprout_url(MessageId::new(9)), "/api/messages/9/sprout");
        assert_eq!(
            routes::media_url(&AudioRef::new("game-1/chain-2/0.wav")),
            "/media/game-1/chain-2/0.wav"
        );
    }
}
