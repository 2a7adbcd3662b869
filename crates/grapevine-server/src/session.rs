//! Session cookie plumbing.
//!
//! The session id rides a plain cookie; progress lives server-side in the
//! [`SessionStore`]. A request without a (valid) cookie gets a fresh id,
//! and the response carries the matching `Set-Cookie`.
//!
//! [`SessionStore`]: grapevine_engine::SessionStore

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;

use grapevine_types::SessionId;

/// The session id from the request, plus whether it was freshly minted.
pub fn session_id(cookie_name: &str, headers: &HeaderMap) -> (SessionId, bool) {
    let existing = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == cookie_name).then(|| value.trim())
        })
        .find_map(SessionId::parse);

    match existing {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    }
}

/// Attach the session cookie to a response (fresh sessions only).
pub fn set_session_cookie(response: &mut Response, cookie_name: &str, id: SessionId) {
    let cookie = format!("{cookie_name}={id}; Path=/; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "grapevine_session";

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_cookie_mints_a_fresh_id() {
        let (_, fresh) = session_id(NAME, &HeaderMap::new());
        assert!(fresh);
    }

    #[test]
    fn valid_cookie_is_reused() {
        let id = SessionId::generate();
        let headers = headers_with_cookie(&format!("{NAME}={id}"));
        let (parsed, fresh) = session_id(NAME, &headers);
        assert_eq!(parsed, id);
        assert!(!fresh);
    }

    #[test]
    fn cookie_is_found_among_others() {
        let id = SessionId::generate();
        let headers = headers_with_cookie(&format!("theme=dark; {NAME}={id}; lang=en"));
        let (parsed, fresh) = session_id(NAME, &headers);
        assert_eq!(parsed, id);
        assert!(!fresh);
    }

    #[test]
    fn garbage_cookie_mints_a_fresh_id() {
        let headers = headers_with_cookie(&format!("{NAME}=not-a-uuid"));
        let (_, fresh) = session_id(NAME, &headers);
        assert!(fresh);
    }
}
