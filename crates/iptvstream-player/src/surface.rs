//! The rendering surface: where decoded video ends up.
//!
//! A surface either plays a URL itself (direct source assignment, the native
//! path) or hosts a managed engine through attach/detach.

use crate::error::Result;
use crate::events::EventSink;

/// MIME type probed for native HLS capability.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

/// Answer to a media-type capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanPlay {
    No,
    Maybe,
    Probably,
}

impl CanPlay {
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::No)
    }
}

/// Callbacks raised by the surface itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Enough data is available to render the first frame.
    CanPlay,
    /// The surface hit a playback error.
    Error(String),
    /// An asynchronous play request was refused.
    PlayRejected(String),
}

/// A video/audio output sink.
pub trait RenderSurface: Send {
    /// Capability probe, e.g. for [`HLS_MIME_TYPE`].
    fn can_play_type(&self, mime: &str) -> CanPlay;

    /// Assign a stream URL directly. Surface events for this source are
    /// reported through `events`.
    fn set_source(&mut self, url: &str, events: EventSink) -> Result<()>;

    /// Drop the current source and stop output.
    fn clear_source(&mut self);

    /// Request playback. An `Err` is a refusal, not a broken surface.
    fn play(&mut self) -> Result<()>;

    fn is_paused(&self) -> bool;

    /// The media error currently reported by the surface, if any.
    fn media_error(&self) -> Option<String>;

    /// Called by a managed engine when it binds to this surface.
    fn attach_managed(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called by a managed engine when it unbinds.
    fn detach_managed(&mut self) {}
}
