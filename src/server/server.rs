use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, ServerConfig};
use crate::song_service::{
    parse_song_id, AddSongRequest, ErrorCategory, ListingParams, Pagination, RequestContext,
    SongError, SongIdParams, UpdateSongRequest, VersesParams,
};
use crate::song_store::Song;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// `{"statusCode": .., "msg": ..}` envelope of acknowledgements and errors.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub msg: String,
}

impl StatusResponse {
    fn ok(msg: &str) -> Json<StatusResponse> {
        Json(StatusResponse {
            status_code: StatusCode::OK.as_u16(),
            msg: msg.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VersesResponse {
    pub text: Vec<String>,
}

impl IntoResponse for SongError {
    fn into_response(self) -> Response {
        match self.category() {
            ErrorCategory::Internal => error!("Request failed: {:#}", self),
            ErrorCategory::Timeout => warn!("Request timed out"),
            ErrorCategory::Validation | ErrorCategory::NotFound => {
                debug!("Request rejected: {}", self)
            }
        }
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = StatusResponse {
            status_code: status.as_u16(),
            msg: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for SongError {
    fn from(_: JsonRejection) -> Self {
        SongError::InvalidJson
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, Json(serde_json::Value::Null)).into_response()
}

async fn get_songs(
    State(service): State<GuardedSongService>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ListingParams>,
) -> Response {
    let result = params
        .normalize()
        .and_then(|(pagination, filter)| service.list_songs(&ctx, pagination, filter));
    match result {
        Ok(songs) => Json(SongsResponse { songs }).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_song(
    State(service): State<GuardedSongService>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<AddSongRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return SongError::from(rejection).into_response(),
    };

    let result = match ctx.deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, service.add_song(&ctx, request))
            .await
            .unwrap_or(Err(SongError::ApiCallTimeout)),
        None => service.add_song(&ctx, request).await,
    };
    match result {
        Ok(()) => StatusResponse::ok("song successfully added").into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_song_verses(
    State(service): State<GuardedSongService>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<VersesParams>,
) -> Response {
    let result = parse_song_id(params.id.as_deref()).and_then(|id| {
        let pagination = Pagination::for_verses(params.page.as_deref(), params.size.as_deref())?;
        service.song_verses(&ctx, id, pagination)
    });
    match result {
        Ok(text) => Json(VersesResponse { text }).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn put_song(
    State(service): State<GuardedSongService>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<SongIdParams>,
    body: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> Response {
    let result = parse_song_id(params.id.as_deref()).and_then(|id| {
        let Json(request) = body?;
        service.update_song(&ctx, id, request)
    });
    match result {
        Ok(()) => StatusResponse::ok("song successfully updated").into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_song(
    State(service): State<GuardedSongService>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<SongIdParams>,
) -> Response {
    let result =
        parse_song_id(params.id.as_deref()).and_then(|id| service.delete_song(&ctx, id));
    match result {
        Ok(()) => StatusResponse::ok("song successfully deleted").into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(config: ServerConfig, song_service: GuardedSongService) -> Router {
    let state = ServerState {
        config,
        start_time: std::time::Instant::now(),
        song_service,
        hash: env!("GIT_HASH").to_owned(),
    };

    let song_routes: Router = Router::new()
        .route(
            "/songs",
            get(get_songs)
                .post(post_song)
                .fallback(method_not_allowed),
        )
        .route(
            "/song",
            get(get_song_verses)
                .put(put_song)
                .delete(delete_song)
                .fallback(method_not_allowed),
        )
        .with_state(state.clone());

    let home_router: Router = Router::new().route("/", get(home)).with_state(state.clone());

    home_router
        .merge(song_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, song_service: GuardedSongService) -> Result<()> {
    let port = config.port;
    let app = make_app(config, song_service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(err) => error!("Failed to listen for Ctrl-C: {}", err),
    }
}
