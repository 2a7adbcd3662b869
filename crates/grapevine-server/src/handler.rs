//! Request handlers.
//!
//! The session-bearing handlers all follow one pattern: resolve the session
//! cookie, load progress, thread it through the engine, save it back, and
//! set the cookie on the way out when the session is new.

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use grapevine_engine::{NewGameParams, PlayState, Task};
use grapevine_protocol::{
    routes, ChainView, GameView, HealthResponse, NewGameRequest, PlayView, RespondResponse,
    TaskView,
};
use grapevine_types::{ChainId, GameId, MessageId};

use crate::error::{ServerError, ServerResult};
use crate::session::{session_id, set_session_cookie};
use crate::state::AppState;

fn task_view(task: Task) -> TaskView {
    TaskView {
        message: task.message.id,
        respond_url: routes::respond_url(task.message.id),
        src: task.prompt_audio.as_ref().map(routes::media_url),
    }
}

fn play_view(state: PlayState) -> PlayView {
    match state {
        PlayState::Instruct { game } => PlayView::Instruct {
            game: GameView::from(&game),
        },
        PlayState::Task(task) => PlayView::Task(task_view(task)),
        PlayState::Complete {
            completion_code, ..
        } => PlayView::Complete { completion_code },
    }
}

/// Pull the `audio` part out of a multipart submission. A missing part
/// becomes an empty payload, which WAV validation rejects downstream
/// without mutating anything.
async fn audio_field(mut multipart: Multipart) -> ServerResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("audio") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(e.to_string()))?;
            return Ok(bytes.to_vec());
        }
    }
    Ok(Vec::new())
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /api/games` — active games, newest first.
pub async fn list_games(State(state): State<AppState>) -> ServerResult<Json<Vec<GameView>>> {
    let games = state.engine.active_games()?;
    Ok(Json(games.iter().map(GameView::from).collect()))
}

/// `POST /api/games` — the "new game" action.
pub async fn new_game(
    State(state): State<AppState>,
    Json(request): Json<NewGameRequest>,
) -> ServerResult<(StatusCode, Json<GameView>)> {
    let game = state.engine.new_game(NewGameParams {
        name: request.name,
        num_chains: request.num_chains,
        chain_order: request.chain_order,
        ..NewGameParams::default()
    })?;
    Ok((StatusCode::CREATED, Json(GameView::from(&game))))
}

/// `GET /api/games/{id}/play` — instructions, a task, or completion.
pub async fn play(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    let (sid, fresh) = session_id(&state.config.session_cookie, &headers);
    let session = state.sessions.load(sid);

    let view = play_view(state.engine.play(GameId::new(id), &session)?);
    let mut response = Json(view).into_response();
    if fresh {
        set_session_cookie(&mut response, &state.config.session_cookie, sid);
    }
    Ok(response)
}

/// `POST /api/games/{id}/accept` — the player accepted the instructions.
pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    // The game must exist even though acceptance only touches the session.
    state.engine.game(GameId::new(id))?;

    let (sid, fresh) = session_id(&state.config.session_cookie, &headers);
    let mut session = state.sessions.load(sid);
    state.engine.accept_instructions(&mut session);
    state.sessions.save(sid, session);

    let mut response = StatusCode::NO_CONTENT.into_response();
    if fresh {
        set_session_cookie(&mut response, &state.config.session_cookie, sid);
    }
    Ok(response)
}

/// `POST /api/games/{id}/clear` — forget this player's progress.
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    state.engine.game(GameId::new(id))?;

    let (sid, _) = session_id(&state.config.session_cookie, &headers);
    state.sessions.clear(sid);
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `POST /api/messages/{id}/respond` — a player's submission.
pub async fn respond(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ServerResult<Response> {
    let bytes = audio_field(multipart).await?;

    let (sid, fresh) = session_id(&state.config.session_cookie, &headers);
    let mut session = state.sessions.load(sid);
    let outcome = state
        .engine
        .respond(&mut session, MessageId::new(id), &bytes)?;
    state.sessions.save(sid, session);

    let body = match outcome.next {
        PlayState::Task(task) => {
            let view = task_view(task);
            RespondResponse {
                message: Some(view.message),
                respond_url: Some(view.respond_url),
                src: view.src,
            }
        }
        // Empty response: the client redirects to the completion page.
        _ => RespondResponse::default(),
    };
    let mut response = Json(body).into_response();
    if fresh {
        set_session_cookie(&mut response, &state.config.session_cookie, sid);
    }
    Ok(response)
}

/// `GET /api/games/{id}/inspect` — every chain, nested and annotated.
pub async fn inspect(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ServerResult<Json<Vec<ChainView>>> {
    let nested = state.engine.inspect(GameId::new(id))?;
    Ok(Json(nested.iter().map(ChainView::from).collect()))
}

/// `GET /api/chains/{id}` — one chain, nested and annotated.
pub async fn chain_data(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ServerResult<Json<ChainView>> {
    let nested = state.engine.inspect_chain(ChainId::new(id))?;
    Ok(Json(ChainView::from(&nested)))
}

/// `POST /api/messages/{id}/sprout` — manually fork a branch.
pub async fn sprout(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ServerResult<Json<ChainView>> {
    let nested = state.engine.sprout(MessageId::new(id))?;
    Ok(Json(ChainView::from(&nested)))
}

/// `POST /api/messages/{id}/close` — prune an empty leaf.
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ServerResult<Json<ChainView>> {
    let nested = state.engine.close(MessageId::new(id))?;
    Ok(Json(ChainView::from(&nested)))
}

/// `POST /api/messages/{id}/upload` — direct admin upload.
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> ServerResult<Json<ChainView>> {
    let bytes = audio_field(multipart).await?;
    let filled = state.engine.upload(MessageId::new(id), &bytes)?;
    let nested = state.engine.inspect_chain(filled.chain)?;
    Ok(Json(ChainView::from(&nested)))
}
