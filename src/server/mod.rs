//! HTTP control surface.
//!
//! Four JSON endpoints plus raw file serving, mirroring the paths the web
//! client already speaks: list recordings, play one, start and stop the
//! capture loop. Playback runs on a blocking worker behind a gate mutex so
//! concurrent play requests queue for the output device instead of fighting
//! over it, and the request blocks until the audio has finished.


use crate::audio::Player;
use crate::config::AppConfig;
use crate::state::{RecordingState, ShutdownFlag};
use crate::store::RecordingStore;
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub recording: RecordingState,
    pub store: Arc<RecordingStore>,
    /// Serializes access to the output device across play requests.
    pub playback_gate: Arc<std::sync::Mutex<()>>,
    pub playback: Arc<dyn Playback>,
}

impl AppState {
    pub fn new(
        recording: RecordingState,
        store: Arc<RecordingStore>,
        output_device: Option<String>,
    ) -> Self {
        Self::with_playback(recording, store, Arc::new(DevicePlayback { output_device }))
    }

    pub fn with_playback(
        recording: RecordingState,
        store: Arc<RecordingStore>,
        playback: Arc<dyn Playback>,
    ) -> Self {
        Self {
            recording,
            store,
            playback_gate: Arc::new(std::sync::Mutex::new(())),
            playback,
        }
    }
}

/// Blocking "decode and play this file" primitive. The production
/// implementation drives the CPAL output device; tests substitute fakes.
pub trait Playback: Send + Sync {
    fn play(&self, path: &std::path::Path) -> Result<()>;
}

/// Plays a stored recording through the default (or configured) output device.
pub struct DevicePlayback {
    pub output_device: Option<String>,
}

impl Playback for DevicePlayback {
    fn play(&self, path: &std::path::Path) -> Result<()> {
        let (samples, sample_rate) = RecordingStore::load(path)?;
        let player = Player::new(self.output_device.as_deref())?;
        player.play(&samples, sample_rate)
    }
}

/// Failures surfaced to HTTP clients, split so the status code can tell a bad
/// request (missing file) from a server-side fault (device, codec, storage).
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Playback(anyhow::Error),
    Storage(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "File not found".to_string()),
            ApiError::Playback(err) => {
                error!(error = %format!("{err:#}"), "playback failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
            ApiError::Storage(err) => {
                error!(error = %format!("{err:#}"), "storage access failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayAudioRequest {
    pub file: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/audio-files", get(list_audio_files))
        .route("/api/play-audio", post(play_audio))
        .route("/api/start-recording", post(start_recording))
        .route("/api/stop-recording", post(stop_recording))
        .route("/audio/:name", get(serve_audio_file))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c, then trip the shutdown flag so the capture
/// loop stops at its next iteration boundary. In-flight requests are not
/// drained; an interrupt must stop device activity, not wait it out.
pub async fn serve(config: &AppConfig, state: AppState, shutdown: ShutdownFlag) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("failed to parse listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;
    let actual_addr = listener
        .local_addr()
        .context("failed to read local listener address")?;

    info!(address = %actual_addr, "starting control server");
    run_server(listener, state, shutdown, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Race the server against the shutdown signal. When the signal wins, the
/// serve future is dropped on the spot rather than drained.
async fn run_server(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: ShutdownFlag,
    signal: impl Future<Output = ()>,
) -> Result<()> {
    let server = axum::serve(listener, router(state).into_make_service()).into_future();
    tokio::select! {
        result = server => result.context("server error")?,
        () = signal => {
            info!("shutdown signal received");
            shutdown.trigger();
        }
    }
    Ok(())
}

async fn list_audio_files(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.store.list().map_err(ApiError::Storage)?;
    Ok(Json(FileListResponse { files }))
}

async fn play_audio(
    State(state): State<AppState>,
    Json(request): Json<PlayAudioRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let path = state.store.resolve(&request.file).ok_or(ApiError::NotFound)?;
    let display = path.display().to_string();

    let gate = state.playback_gate.clone();
    let playback = state.playback.clone();

    // Playback blocks for the full file length; keep it off the async runtime.
    let result = tokio::task::spawn_blocking(move || {
        let _guard = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        playback.play(&path)
    })
    .await
    .map_err(|err| ApiError::Playback(err.into()))?;
    result.map_err(ApiError::Playback)?;

    Ok(Json(MessageResponse {
        message: format!("Played audio from {display}"),
    }))
}

async fn start_recording(State(state): State<AppState>) -> Json<MessageResponse> {
    let message = if state.recording.start() {
        info!("recording started");
        "Recording started"
    } else {
        "Recording is already active"
    };
    Json(MessageResponse {
        message: message.to_string(),
    })
}

async fn stop_recording(State(state): State<AppState>) -> Json<MessageResponse> {
    let message = if state.recording.stop() {
        info!("recording stopped");
        "Recording stopped"
    } else {
        "Recording is already inactive"
    };
    Json(MessageResponse {
        message: message.to_string(),
    })
}

async fn serve_audio_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.store.resolve(&name).ok_or(ApiError::NotFound)?;
    let bytes = tokio::fs::read(&path).await.map_err(|err| {
        ApiError::Storage(anyhow::Error::from(err).context(format!("failed to read {name}")))
    })?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response())
}
