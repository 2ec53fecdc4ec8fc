use axum::extract::FromRef;

use crate::song_service::SongService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSongService = Arc<SongService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub song_service: GuardedSongService,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedSongService {
    fn from_ref(input: &ServerState) -> Self {
        input.song_service.clone()
    }
}
