use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_macros::debug_handler;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    board::{BoardController, SubmitOutcome, presenter::BoardView},
    dto::{BoardSnapshot, NoteCard, NoteList, RenderedBoard, Status, SubmitNoteRequest, Tone},
};

#[derive(OpenApi)]
#[openapi(
    paths(get_board, submit_note),
    components(schemas(
        BoardSnapshot,
        RenderedBoard,
        NoteList,
        NoteCard,
        Status,
        Tone,
        SubmitNoteRequest
    )),
    tags(
        (name = "board", description = "Gratitude board API")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<BoardController>,
    pub view: Arc<BoardView>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/board", get(get_board))
        .route("/notes", post(submit_note))
        .route("/api-doc/openapi.json", get(openapi))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Happy Thanksgiving!").into_response()
}

async fn openapi() -> Response {
    Json(ApiDoc::openapi()).into_response()
}

#[utoipa::path(
    get,
    path = "/board",
    responses(
        (status = 200, description = "Current board", body = BoardSnapshot)
    ),
    tag = "board"
)]
#[debug_handler]
pub async fn get_board(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.view.snapshot())).into_response()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = SubmitNoteRequest,
    responses(
        (status = 201, description = "Note saved, shared or on this device", body = BoardSnapshot),
        (status = 200, description = "Empty message, nothing saved", body = BoardSnapshot)
    ),
    tag = "board"
)]
#[debug_handler]
pub async fn submit_note(
    State(state): State<AppState>,
    Json(payload): Json<SubmitNoteRequest>,
) -> Response {
    // A client hanging up must not abandon a save halfway
    let controller = state.controller.clone();
    let status = match tokio::spawn(async move { controller.submit(&payload).await }).await {
        Ok(SubmitOutcome::Saved(_)) => StatusCode::CREATED,
        Ok(SubmitOutcome::Declined) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Submission task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(state.view.snapshot())).into_response()
}
