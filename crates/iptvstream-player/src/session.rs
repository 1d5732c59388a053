//! Per-activation playback state.

use chrono::{DateTime, Utc};
use iptvstream_common::ActivationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when the environment can neither decode HLS natively nor run the
/// managed engine.
pub const UNSUPPORTED_MESSAGE: &str = "HLS streaming not supported in this environment";
/// Shown when direct source assignment fails.
pub const NATIVE_FAILURE_MESSAGE: &str = "Failed to load stream";
/// Shown when network recovery has been exhausted.
pub const NETWORK_FAILURE_MESSAGE: &str = "Network error. Check your connection.";
/// Shown for every other unrecoverable failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to play stream";

/// What the player is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProps {
    pub stream_url: String,
    pub title: String,
    pub autoplay: bool,
}

impl PlayerProps {
    pub fn new(stream_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            title: title.into(),
            autoplay: true,
        }
    }

    #[must_use]
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }
}

/// How the stream is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// URL assigned directly to the surface.
    Native,
    /// A managed engine feeds the surface.
    Managed,
}

/// State machine position of one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Initializing,
    NativeDecode,
    ManagedDecode,
    Playing,
    Failed,
    Unsupported,
}

impl PlaybackState {
    /// Terminal for the activation; only a reload or a new URL leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Unsupported)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::NativeDecode => "native_decode",
            Self::ManagedDecode => "managed_decode",
            Self::Playing => "playing",
            Self::Failed => "failed",
            Self::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Transient state owned by the supervisor for one activation.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub activation: ActivationId,
    pub stream_url: String,
    pub title: String,
    pub autoplay: bool,
    pub state: PlaybackState,
    pub mode: Option<DecodeMode>,
    pub loading: bool,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    /// The managed path gave up and the URL went straight to the surface.
    pub fell_back_to_native: bool,
    pub(crate) fragment_play_issued: bool,
    pub(crate) network_recoveries: u32,
    pub(crate) media_recoveries: u32,
}

impl PlaybackSession {
    pub(crate) fn new(activation: ActivationId, props: PlayerProps) -> Self {
        Self {
            activation,
            stream_url: props.stream_url,
            title: props.title,
            autoplay: props.autoplay,
            state: PlaybackState::Initializing,
            mode: None,
            loading: true,
            error: None,
            started_at: Utc::now(),
            fell_back_to_native: false,
            fragment_play_issued: false,
            network_recoveries: 0,
            media_recoveries: 0,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            activation: self.activation,
            stream_url: self.stream_url.clone(),
            title: self.title.clone(),
            state: self.state,
            mode: self.mode,
            loading: self.loading,
            error: self.error.clone(),
            fell_back_to_native: self.fell_back_to_native,
            started_at: self.started_at,
        }
    }
}

/// Read-only copy of a session, for rendering and observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub activation: ActivationId,
    pub stream_url: String,
    pub title: String,
    pub state: PlaybackState,
    pub mode: Option<DecodeMode>,
    pub loading: bool,
    pub error: Option<String>,
    pub fell_back_to_native: bool,
    pub started_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Whether the error overlay with its reload button is shown.
    pub fn shows_retry(&self) -> bool {
        self.error.is_some()
    }
}
