//! iptvstream-player: supervised HLS playback.
//!
//! The [`PlaybackSupervisor`] drives a [`RenderSurface`] through one
//! activation per stream URL. It picks native decoding when the surface can
//! play HLS itself, otherwise creates a managed [`HlsEngine`] through an
//! [`EngineFactory`], and recovers from engine failures:
//!
//! - non-fatal engine errors are ignored
//! - fatal network errors restart the load pipeline (bounded)
//! - fatal media errors trigger in-place recovery, then a fallback to direct
//!   source assignment if the surface is still broken after a grace period
//! - anything else ends the activation with a user-visible message
//!
//! [`spawn_player`] hosts a supervisor on a tokio task and publishes
//! [`SessionSnapshot`]s. [`ExternalPlayerSurface`] plays streams through an
//! external player process.
//!
//! # Example
//!
//! ```no_run
//! use iptvstream_player::{
//!     spawn_player, ExternalPlayerSurface, PlayerProps, SupervisorConfig, UnavailableEngine,
//!     DEFAULT_PLAYERS,
//! };
//!
//! # async fn example() -> iptvstream_player::Result<()> {
//! let surface = ExternalPlayerSurface::discover(DEFAULT_PLAYERS.iter().copied());
//! let player = spawn_player(surface, UnavailableEngine, SupervisorConfig::default());
//! player.send_load(PlayerProps::new("http://host/a00d/index.m3u8", "PTV News HD"))?;
//! let snapshot = player.wait_for(|s| !s.loading || s.error.is_some()).await?;
//! println!("{:?}", snapshot.state);
//! player.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod external;
pub mod session;
pub mod supervisor;
pub mod surface;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{EngineConfig, SupervisorConfig};
pub use driver::{spawn_player, PlayerCommand, PlayerHandle};
pub use engine::{
    EngineError, EngineEvent, EngineFactory, ErrorDetails, ErrorType, HlsEngine,
    UnavailableEngine,
};
pub use error::{PlayerError, Result};
pub use events::{EventSink, MediaEvent, TaggedEvent};
pub use external::{ExternalPlayerSurface, PlayerProgram, DEFAULT_PLAYERS};
pub use session::{
    DecodeMode, PlaybackSession, PlaybackState, PlayerProps, SessionSnapshot,
    GENERIC_FAILURE_MESSAGE, NATIVE_FAILURE_MESSAGE, NETWORK_FAILURE_MESSAGE,
    UNSUPPORTED_MESSAGE,
};
pub use supervisor::{PlaybackSupervisor, Player};
pub use surface::{CanPlay, RenderSurface, SurfaceEvent, HLS_MIME_TYPE};
