//! Boundary to the managed HLS engine.
//!
//! The engine (manifest parsing, segment loading, ABR, demuxing) is external.
//! The supervisor only creates it, points it at a manifest and a surface,
//! asks it to recover, and destroys it. Engine callbacks arrive as
//! [`EngineEvent`]s through the [`EventSink`] handed over at creation.

use std::fmt;

use crate::config::EngineConfig;
use crate::error::{PlayerError, Result};
use crate::events::EventSink;
use crate::surface::RenderSurface;

/// Broad classification of an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Network,
    Media,
    Mux,
    KeySystem,
    Other,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Media => write!(f, "media"),
            Self::Mux => write!(f, "mux"),
            Self::KeySystem => write!(f, "key-system"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Specific error reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetails {
    ManifestLoadError,
    ManifestLoadTimeout,
    ManifestParsingError,
    LevelLoadError,
    FragLoadError,
    FragLoadTimeout,
    FragParsingError,
    BufferAppendError,
    BufferStalledError,
    BufferSeekOverHole,
    BufferNudgeOnStall,
    Other(String),
}

impl ErrorDetails {
    /// Buffer anomalies the engine works around by itself.
    pub fn is_buffer_anomaly(&self) -> bool {
        matches!(
            self,
            Self::BufferStalledError | Self::BufferSeekOverHole | Self::BufferNudgeOnStall
        )
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestLoadError => write!(f, "manifestLoadError"),
            Self::ManifestLoadTimeout => write!(f, "manifestLoadTimeOut"),
            Self::ManifestParsingError => write!(f, "manifestParsingError"),
            Self::LevelLoadError => write!(f, "levelLoadError"),
            Self::FragLoadError => write!(f, "fragLoadError"),
            Self::FragLoadTimeout => write!(f, "fragLoadTimeOut"),
            Self::FragParsingError => write!(f, "fragParsingError"),
            Self::BufferAppendError => write!(f, "bufferAppendError"),
            Self::BufferStalledError => write!(f, "bufferStalledError"),
            Self::BufferSeekOverHole => write!(f, "bufferSeekOverHole"),
            Self::BufferNudgeOnStall => write!(f, "bufferNudgeOnStall"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// An error event raised by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: ErrorType,
    pub details: ErrorDetails,
    pub fatal: bool,
}

impl EngineError {
    pub fn fatal(kind: ErrorType, details: ErrorDetails) -> Self {
        Self {
            kind,
            details,
            fatal: true,
        }
    }

    pub fn non_fatal(kind: ErrorType, details: ErrorDetails) -> Self {
        Self {
            kind,
            details,
            fatal: false,
        }
    }
}

/// Engine callbacks the supervisor reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The manifest was fetched and parsed; `levels` quality variants found.
    ManifestParsed { levels: usize },
    /// A media fragment finished loading.
    FragmentLoaded,
    Error(EngineError),
}

/// A live managed engine instance.
///
/// Implementations must stop emitting events once [`destroy`](Self::destroy)
/// returns; dropping an instance must release everything it holds.
pub trait HlsEngine: Send {
    /// Point the engine at a manifest URL.
    fn load_source(&mut self, url: &str);

    /// Bind the engine to a rendering surface. Fails when the surface
    /// refuses to host a managed engine.
    fn attach_media(&mut self, surface: &mut dyn RenderSurface) -> Result<()>;

    /// Unbind the engine from the surface.
    fn detach_media(&mut self, surface: &mut dyn RenderSurface);

    /// Restart the load pipeline after a network failure.
    fn start_load(&mut self);

    /// Try to recover in place from a media/decode failure.
    fn recover_media_error(&mut self);

    /// Release the engine and unsubscribe its event handlers.
    fn destroy(&mut self);
}

/// Creates managed engine instances.
pub trait EngineFactory: Send {
    /// Whether managed decoding works in this environment.
    fn is_supported(&self) -> bool;

    /// Create an engine that reports its events through `events`.
    fn create(&self, config: &EngineConfig, events: EventSink) -> Result<Box<dyn HlsEngine>>;
}

/// Factory for hosts that ship no managed engine.
///
/// Playback then depends entirely on the surface's native HLS capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl EngineFactory for UnavailableEngine {
    fn is_supported(&self) -> bool {
        false
    }

    fn create(&self, _config: &EngineConfig, _events: EventSink) -> Result<Box<dyn HlsEngine>> {
        Err(PlayerError::engine_create(
            "no managed HLS engine is available on this host",
        ))
    }
}
