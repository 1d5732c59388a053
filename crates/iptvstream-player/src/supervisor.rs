//! The playback supervisor state machine.
//!
//! One supervisor drives one mounted player. Each distinct stream URL it is
//! given starts a new activation:
//!
//! ```text
//! Initializing ──native capability──────────────▶ NativeDecode ──can play──▶ Playing
//!      │                                               ▲   └──surface error──▶ Failed
//!      ├──managed engine unsupported──▶ Unsupported    │
//!      └──────────────▶ ManagedDecode ──manifest──▶ Playing
//!                           │   fatal media, broken after grace or    │
//!                           │   recoveries exhausted ─────────────────┘
//!                           ├── fatal network ─▶ restart load (bounded)
//!                           └── other fatal ───▶ Failed
//! ```
//!
//! All transitions run on the caller's thread; callbacks are applied through
//! [`PlaybackSupervisor::handle_event`] and the grace timer through
//! [`PlaybackSupervisor::run_media_check`].

use iptvstream_common::ActivationId;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SupervisorConfig;
use crate::engine::{EngineError, EngineEvent, EngineFactory, ErrorType, HlsEngine};
use crate::events::{EventSink, MediaEvent, TaggedEvent};
use crate::session::{
    DecodeMode, PlaybackSession, PlaybackState, PlayerProps, SessionSnapshot,
    GENERIC_FAILURE_MESSAGE, NATIVE_FAILURE_MESSAGE, NETWORK_FAILURE_MESSAGE,
    UNSUPPORTED_MESSAGE,
};
use crate::surface::{RenderSurface, SurfaceEvent, HLS_MIME_TYPE};

/// Something that can be pointed at a stream and unmounted.
///
/// Implemented by the synchronous [`PlaybackSupervisor`] and by the
/// task-backed [`PlayerHandle`](crate::driver::PlayerHandle).
pub trait Player {
    fn load(&mut self, props: PlayerProps);
    fn unmount(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct MediaCheck {
    activation: ActivationId,
    due: Instant,
}

/// Owns the surface, the (at most one) managed engine, and the session.
pub struct PlaybackSupervisor<S: RenderSurface, F: EngineFactory> {
    surface: S,
    factory: F,
    config: SupervisorConfig,
    events_tx: mpsc::UnboundedSender<TaggedEvent>,
    last_activation: ActivationId,
    session: Option<PlaybackSession>,
    engine: Option<Box<dyn HlsEngine>>,
    media_check: Option<MediaCheck>,
}

impl<S: RenderSurface, F: EngineFactory> PlaybackSupervisor<S, F> {
    /// Create a supervisor whose callbacks are queued on `events_tx`.
    pub fn new(
        surface: S,
        factory: F,
        config: SupervisorConfig,
        events_tx: mpsc::UnboundedSender<TaggedEvent>,
    ) -> Self {
        Self {
            surface,
            factory,
            config,
            events_tx,
            last_activation: ActivationId::NONE,
            session: None,
            engine: None,
            media_check: None,
        }
    }

    /// Create a supervisor together with the receiving end of its callbacks.
    pub fn with_channel(
        surface: S,
        factory: F,
        config: SupervisorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<TaggedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(surface, factory, config, tx), rx)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(PlaybackSession::snapshot)
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.session.as_ref().map(|s| s.state)
    }

    /// Whether a managed engine instance is currently held.
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Assign a stream. A URL equal to the current one keeps the activation
    /// (only the title/autoplay flag are refreshed); any other URL tears the
    /// current activation down and starts a new one.
    pub fn load(&mut self, props: PlayerProps) -> ActivationId {
        if let Some(session) = self.session.as_mut() {
            if session.stream_url == props.stream_url {
                session.title = props.title;
                session.autoplay = props.autoplay;
                return session.activation;
            }
        }

        self.teardown();

        let activation = self.last_activation.next();
        self.last_activation = activation;
        info!(
            activation = %activation,
            url = %props.stream_url,
            title = %props.title,
            "Starting playback activation"
        );
        self.session = Some(PlaybackSession::new(activation, props));
        self.initialize();
        activation
    }

    /// Tear down the current activation and forget the session.
    pub fn unmount(&mut self) {
        self.teardown();
        self.session = None;
    }

    /// Apply a callback. Callbacks tagged with any activation other than the
    /// current one are discarded.
    pub fn handle_event(&mut self, activation: ActivationId, event: MediaEvent) {
        let current = self.session.as_ref().map(|s| s.activation);
        if current != Some(activation) {
            debug!(
                activation = %activation,
                ?event,
                "Discarding event from a torn-down activation"
            );
            return;
        }

        match event {
            MediaEvent::Surface(event) => self.handle_surface_event(event),
            MediaEvent::Engine(event) => self.handle_engine_event(event),
        }
    }

    /// When the pending media-recovery check is due, if any.
    pub fn media_check_deadline(&self) -> Option<Instant> {
        self.media_check.map(|check| check.due)
    }

    /// Run the media-recovery check if it is due at `now`.
    ///
    /// If the surface still reports an unrecovered media error, the managed
    /// engine is released and the URL is assigned to the surface directly.
    pub fn run_media_check(&mut self, now: Instant) {
        let Some(check) = self.media_check else {
            return;
        };
        if check.due > now {
            return;
        }
        self.media_check = None;

        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.activation != check.activation || session.mode != Some(DecodeMode::Managed) {
            return;
        }

        match self.surface.media_error() {
            Some(error) => {
                warn!(
                    activation = %check.activation,
                    %error,
                    "Media error persisted after recovery, falling back to direct playback"
                );
                self.fall_back_to_native();
            }
            None => {
                info!(activation = %check.activation, "Media error recovered");
            }
        }
    }

    fn initialize(&mut self) {
        if self.surface.can_play_type(HLS_MIME_TYPE).is_playable() {
            self.start_native();
        } else if !self.factory.is_supported() {
            warn!("No native HLS support and no managed engine available");
            self.finish(PlaybackState::Unsupported, UNSUPPORTED_MESSAGE);
        } else {
            self.start_managed();
        }
    }

    fn sink(&self) -> Option<EventSink> {
        self.session
            .as_ref()
            .map(|s| EventSink::new(s.activation, self.events_tx.clone()))
    }

    fn start_native(&mut self) {
        let Some(sink) = self.sink() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.mode = Some(DecodeMode::Native);
        session.state = PlaybackState::NativeDecode;
        let url = session.stream_url.clone();
        let autoplay = session.autoplay;
        debug!(activation = %session.activation, %url, "Assigning stream to surface");

        if let Err(e) = self.surface.set_source(&url, sink) {
            warn!(error = %e, "Surface rejected stream source");
            self.finish(PlaybackState::Failed, NATIVE_FAILURE_MESSAGE);
            return;
        }
        if autoplay {
            self.request_play();
        }
    }

    fn start_managed(&mut self) {
        let Some(sink) = self.sink() else {
            return;
        };
        let mut engine = match self.factory.create(&self.config.engine, sink) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "Managed engine could not be created");
                self.finish(PlaybackState::Failed, GENERIC_FAILURE_MESSAGE);
                return;
            }
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.mode = Some(DecodeMode::Managed);
        session.state = PlaybackState::ManagedDecode;
        debug!(activation = %session.activation, url = %session.stream_url, "Attaching managed engine");

        engine.load_source(&session.stream_url);
        let attached = engine.attach_media(&mut self.surface);
        self.engine = Some(engine);
        if let Err(e) = attached {
            warn!(error = %e, "Surface refused the managed engine");
            self.finish(PlaybackState::Failed, GENERIC_FAILURE_MESSAGE);
        }
    }

    fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match event {
            SurfaceEvent::CanPlay => {
                if session.state == PlaybackState::NativeDecode {
                    session.state = PlaybackState::Playing;
                    session.loading = false;
                    info!(activation = %session.activation, "Playing (native)");
                }
            }
            SurfaceEvent::Error(error) => {
                if session.mode == Some(DecodeMode::Native) && !session.state.is_terminal() {
                    warn!(activation = %session.activation, %error, "Surface playback error");
                    self.finish(PlaybackState::Failed, NATIVE_FAILURE_MESSAGE);
                } else {
                    debug!(activation = %session.activation, %error, "Surface error left to the engine");
                }
            }
            SurfaceEvent::PlayRejected(reason) => {
                warn!(%reason, "Autoplay blocked. User interaction required.");
            }
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // After a fallback the old engine is gone; anything it still had
        // queued is noise.
        if session.mode != Some(DecodeMode::Managed) || session.state.is_terminal() {
            return;
        }

        match event {
            EngineEvent::ManifestParsed { levels } => {
                if session.state != PlaybackState::ManagedDecode {
                    return;
                }
                session.state = PlaybackState::Playing;
                session.loading = false;
                info!(activation = %session.activation, levels, "Playing (managed)");
                if session.autoplay {
                    self.request_play();
                }
            }
            EngineEvent::FragmentLoaded => {
                if session.autoplay && !session.fragment_play_issued && self.surface.is_paused() {
                    session.fragment_play_issued = true;
                    debug!(activation = %session.activation, "First fragment loaded while paused");
                    self.request_play();
                }
            }
            EngineEvent::Error(error) => self.handle_engine_error(error),
        }
    }

    fn handle_engine_error(&mut self, error: EngineError) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let activation = session.activation;

        if !error.fatal {
            debug!(
                activation = %activation,
                kind = %error.kind,
                details = %error.details,
                buffer_anomaly = error.details.is_buffer_anomaly(),
                "Ignoring non-fatal engine error"
            );
            return;
        }

        match error.kind {
            ErrorType::Network => {
                if session.network_recoveries >= self.config.max_network_recoveries {
                    warn!(
                        activation = %activation,
                        details = %error.details,
                        attempts = session.network_recoveries,
                        "Network recovery exhausted"
                    );
                    self.finish(PlaybackState::Failed, NETWORK_FAILURE_MESSAGE);
                    return;
                }
                session.network_recoveries += 1;
                session.error = None;
                warn!(
                    activation = %activation,
                    details = %error.details,
                    attempt = session.network_recoveries,
                    "Fatal network error, restarting load"
                );
                if let Some(engine) = self.engine.as_mut() {
                    engine.start_load();
                }
            }
            ErrorType::Media => {
                if session.media_recoveries >= self.config.max_media_recoveries {
                    if session.fell_back_to_native {
                        warn!(
                            activation = %activation,
                            details = %error.details,
                            "Media recovery exhausted"
                        );
                        self.finish(PlaybackState::Failed, GENERIC_FAILURE_MESSAGE);
                    } else {
                        warn!(
                            activation = %activation,
                            details = %error.details,
                            "Media recovery exhausted, falling back to direct playback"
                        );
                        self.media_check = None;
                        self.fall_back_to_native();
                    }
                    return;
                }
                session.media_recoveries += 1;
                warn!(
                    activation = %activation,
                    details = %error.details,
                    attempt = session.media_recoveries,
                    "Fatal media error, attempting recovery"
                );
                if let Some(engine) = self.engine.as_mut() {
                    engine.recover_media_error();
                }
                if self.media_check.is_none() {
                    self.media_check = Some(MediaCheck {
                        activation,
                        due: Instant::now() + self.config.media_recovery_grace,
                    });
                }
            }
            kind => {
                warn!(
                    activation = %activation,
                    %kind,
                    details = %error.details,
                    "Unrecoverable engine error"
                );
                self.finish(PlaybackState::Failed, GENERIC_FAILURE_MESSAGE);
            }
        }
    }

    fn fall_back_to_native(&mut self) {
        self.release_engine();
        if let Some(session) = self.session.as_mut() {
            session.fell_back_to_native = true;
        }
        self.start_native();
    }

    fn request_play(&mut self) {
        match self.surface.play() {
            Ok(()) => debug!("Play requested"),
            Err(e) => warn!(error = %e, "Autoplay blocked. User interaction required."),
        }
    }

    /// Enter a terminal state with a user-visible message.
    fn finish(&mut self, state: PlaybackState, message: &str) {
        self.media_check = None;
        self.release_engine();
        if let Some(session) = self.session.as_mut() {
            session.state = state;
            session.loading = false;
            session.error = Some(message.to_string());
            info!(activation = %session.activation, %state, reason = message, "Activation ended");
        }
    }

    fn release_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.detach_media(&mut self.surface);
            engine.destroy();
            debug!("Managed engine released");
        }
    }

    fn teardown(&mut self) {
        self.media_check = None;
        self.release_engine();
        if let Some(session) = self.session.as_ref() {
            debug!(activation = %session.activation, "Tearing down activation");
            self.surface.clear_source();
        }
    }
}

impl<S: RenderSurface, F: EngineFactory> Player for PlaybackSupervisor<S, F> {
    fn load(&mut self, props: PlayerProps) {
        PlaybackSupervisor::load(self, props);
    }

    fn unmount(&mut self) {
        PlaybackSupervisor::unmount(self);
    }
}

impl<S: RenderSurface, F: EngineFactory> Drop for PlaybackSupervisor<S, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ErrorDetails;
    use crate::testing::{MockEngineFactory, MockSurface};
    use assert_matches::assert_matches;
    use std::time::Duration;

    const URL_A: &str = "http://host/a00d/index.m3u8";
    const URL_B: &str = "http://host/a00b/index.m3u8";

    type Sup = PlaybackSupervisor<MockSurface, MockEngineFactory>;

    fn managed() -> (Sup, MockSurface, MockEngineFactory) {
        let surface = MockSurface::managed_only();
        let factory = MockEngineFactory::supported();
        let (sup, _rx) =
            PlaybackSupervisor::with_channel(surface.clone(), factory.clone(), SupervisorConfig::default());
        (sup, surface, factory)
    }

    fn engine_event(sup: &mut Sup, event: EngineEvent) {
        let activation = sup.session().unwrap().activation;
        sup.handle_event(activation, MediaEvent::Engine(event));
    }

    fn fatal(kind: ErrorType, details: ErrorDetails) -> EngineEvent {
        EngineEvent::Error(EngineError::fatal(kind, details))
    }

    #[test]
    fn native_capability_assigns_source_directly() {
        let surface = MockSurface::native();
        let factory = MockEngineFactory::supported();
        let (mut sup, _rx) =
            PlaybackSupervisor::with_channel(surface.clone(), factory.clone(), SupervisorConfig::default());

        let activation = sup.load(PlayerProps::new(URL_A, "A"));
        assert_eq!(sup.state(), Some(PlaybackState::NativeDecode));
        assert_eq!(surface.current_source().as_deref(), Some(URL_A));
        assert_eq!(factory.created(), 0);
        assert_eq!(surface.play_calls(), 1);

        sup.handle_event(activation, MediaEvent::Surface(SurfaceEvent::CanPlay));
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Playing);
        assert!(!snap.loading);
        assert_eq!(snap.mode, Some(DecodeMode::Native));
    }

    #[test]
    fn native_surface_error_fails() {
        let surface = MockSurface::native();
        let (mut sup, _rx) = PlaybackSupervisor::with_channel(
            surface,
            MockEngineFactory::supported(),
            SupervisorConfig::default(),
        );
        let activation = sup.load(PlayerProps::new(URL_A, "A"));
        sup.handle_event(
            activation,
            MediaEvent::Surface(SurfaceEvent::Error("MEDIA_ERR_SRC_NOT_SUPPORTED".into())),
        );
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Failed);
        assert_eq!(snap.error.as_deref(), Some(NATIVE_FAILURE_MESSAGE));
        assert!(snap.shows_retry());
    }

    #[test]
    fn unsupported_environment() {
        let (mut sup, _rx) = PlaybackSupervisor::with_channel(
            MockSurface::managed_only(),
            MockEngineFactory::unsupported(),
            SupervisorConfig::default(),
        );
        sup.load(PlayerProps::new(URL_A, "A"));
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Unsupported);
        assert_eq!(snap.error.as_deref(), Some(UNSUPPORTED_MESSAGE));
        assert!(!snap.loading);
    }

    #[test]
    fn manifest_parsed_plays() {
        let (mut sup, surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        assert_eq!(sup.state(), Some(PlaybackState::ManagedDecode));
        assert_eq!(factory.live(), 1);
        assert_eq!(factory.engine(0).url.as_deref(), Some(URL_A));
        assert!(surface.is_attached());

        engine_event(&mut sup, EngineEvent::ManifestParsed { levels: 3 });
        assert_eq!(sup.state(), Some(PlaybackState::Playing));
        assert_eq!(surface.play_calls(), 1);
    }

    #[test]
    fn rejected_autoplay_is_not_an_error() {
        let (mut sup, surface, _factory) = managed();
        surface.reject_play(true);
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, EngineEvent::ManifestParsed { levels: 1 });
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Playing);
        assert!(snap.error.is_none());
    }

    #[test]
    fn fragment_loaded_plays_once() {
        let (mut sup, surface, _factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));

        engine_event(&mut sup, EngineEvent::FragmentLoaded);
        engine_event(&mut sup, EngineEvent::FragmentLoaded);
        engine_event(&mut sup, EngineEvent::FragmentLoaded);
        assert_eq!(surface.play_calls(), 1);
    }

    #[test]
    fn fragment_loaded_without_autoplay_does_nothing() {
        let (mut sup, surface, _factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A").autoplay(false));
        engine_event(&mut sup, EngineEvent::FragmentLoaded);
        engine_event(&mut sup, EngineEvent::ManifestParsed { levels: 1 });
        assert_eq!(surface.play_calls(), 0);
    }

    #[test]
    fn non_fatal_buffer_anomaly_is_ignored() {
        let (mut sup, _surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, EngineEvent::ManifestParsed { levels: 1 });

        for _ in 0..10 {
            engine_event(
                &mut sup,
                EngineEvent::Error(EngineError::non_fatal(
                    ErrorType::Media,
                    ErrorDetails::BufferSeekOverHole,
                )),
            );
        }
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Playing);
        assert!(snap.error.is_none());
        assert_eq!(factory.engine(0).media_recoveries, 0);
        assert!(sup.media_check_deadline().is_none());
    }

    #[test]
    fn fatal_network_error_restarts_load() {
        let (mut sup, _surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, fatal(ErrorType::Network, ErrorDetails::FragLoadTimeout));

        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::ManagedDecode);
        assert!(snap.error.is_none());
        assert_eq!(factory.engine(0).start_loads, 1);
        assert_eq!(factory.live(), 1);
    }

    #[test]
    fn network_recovery_is_bounded() {
        let (mut sup, _surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        for _ in 0..4 {
            engine_event(&mut sup, fatal(ErrorType::Network, ErrorDetails::ManifestLoadError));
        }
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Failed);
        assert_eq!(snap.error.as_deref(), Some(NETWORK_FAILURE_MESSAGE));
        assert_eq!(factory.engine(0).start_loads, 3);
        assert_eq!(factory.live(), 0);
    }

    #[test]
    fn fatal_other_error_fails() {
        let (mut sup, _surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(
            &mut sup,
            fatal(ErrorType::KeySystem, ErrorDetails::Other("keySystemNoKeys".into())),
        );
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Failed);
        assert_eq!(snap.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(factory.live(), 0);
    }

    #[test]
    fn media_error_recovered_within_grace_stays_managed() {
        let (mut sup, surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, EngineEvent::ManifestParsed { levels: 1 });
        engine_event(&mut sup, fatal(ErrorType::Media, ErrorDetails::BufferAppendError));
        assert_eq!(factory.engine(0).media_recoveries, 1);

        let due = sup.media_check_deadline().unwrap();
        assert!(surface.media_error().is_none());
        sup.run_media_check(due);

        assert_eq!(sup.state(), Some(PlaybackState::Playing));
        assert_eq!(factory.live(), 1);
        assert!(surface.source_history().is_empty());
    }

    #[test]
    fn media_error_unrecovered_falls_back_to_native() {
        let (mut sup, surface, factory) = managed();
        let activation = sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, fatal(ErrorType::Media, ErrorDetails::FragParsingError));
        surface.set_media_error(Some("PIPELINE_ERROR_DECODE"));

        let due = sup.media_check_deadline().unwrap();
        sup.run_media_check(due - Duration::from_millis(1));
        assert_eq!(sup.session().unwrap().mode, Some(DecodeMode::Managed));

        sup.run_media_check(due);
        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.activation, activation);
        assert_eq!(snap.mode, Some(DecodeMode::Native));
        assert_eq!(snap.state, PlaybackState::NativeDecode);
        assert!(snap.fell_back_to_native);
        assert_eq!(surface.source_history(), vec![URL_A.to_string()]);
        assert_eq!(factory.live(), 0);
        assert!(factory.engine(0).destroyed);
    }

    #[test]
    fn media_error_burst_falls_back_before_failing() {
        let (mut sup, surface, factory) = managed();
        let activation = sup.load(PlayerProps::new(URL_A, "A"));
        surface.set_media_error(Some("PIPELINE_ERROR_DECODE"));
        for _ in 0..3 {
            engine_event(&mut sup, fatal(ErrorType::Media, ErrorDetails::BufferAppendError));
        }

        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.activation, activation);
        assert_eq!(snap.state, PlaybackState::NativeDecode);
        assert_eq!(snap.mode, Some(DecodeMode::Native));
        assert!(snap.fell_back_to_native);
        assert!(snap.error.is_none());
        assert_eq!(factory.engine(0).media_recoveries, 2);
        assert_eq!(surface.source_history(), vec![URL_A.to_string()]);
        assert_eq!(factory.live(), 0);
        assert!(sup.media_check_deadline().is_none());
    }

    #[test]
    fn refused_attach_fails_activation() {
        let (mut sup, surface, factory) = managed();
        surface.refuse_attach(true);
        sup.load(PlayerProps::new(URL_A, "A"));

        let snap = sup.snapshot().unwrap();
        assert_eq!(snap.state, PlaybackState::Failed);
        assert_eq!(snap.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert!(!snap.loading);
        assert!(!sup.has_engine());
        assert_eq!(factory.live(), 0);
        assert!(factory.engine(0).destroyed);
        assert!(!factory.engine(0).attached);
    }

    #[test]
    fn engine_events_after_fallback_are_ignored() {
        let (mut sup, surface, _factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        engine_event(&mut sup, fatal(ErrorType::Media, ErrorDetails::FragParsingError));
        surface.set_media_error(Some("decode"));
        let due = sup.media_check_deadline().unwrap();
        sup.run_media_check(due);

        engine_event(&mut sup, fatal(ErrorType::Other, ErrorDetails::Other("late".into())));
        assert_eq!(sup.state(), Some(PlaybackState::NativeDecode));
    }

    #[test]
    fn reassigning_url_tears_down_previous_engine() {
        let (mut sup, surface, factory) = managed();
        let first = sup.load(PlayerProps::new(URL_A, "A"));
        let second = sup.load(PlayerProps::new(URL_B, "B"));
        assert_ne!(first, second);
        assert_eq!(factory.created(), 2);
        assert_eq!(factory.live(), 1);
        assert!(factory.engine(0).destroyed);
        assert_eq!(factory.engine(1).url.as_deref(), Some(URL_B));
        assert_eq!(factory.max_live(), 1);
        assert_eq!(surface.clear_calls(), 1);
    }

    #[test]
    fn same_url_keeps_activation() {
        let (mut sup, _surface, factory) = managed();
        let first = sup.load(PlayerProps::new(URL_A, "A"));
        let again = sup.load(PlayerProps::new(URL_A, "A renamed"));
        assert_eq!(first, again);
        assert_eq!(factory.created(), 1);
        assert_eq!(sup.session().unwrap().title, "A renamed");
    }

    #[test]
    fn stale_events_are_discarded() {
        let (mut sup, _surface, _factory) = managed();
        let first = sup.load(PlayerProps::new(URL_A, "A"));
        sup.load(PlayerProps::new(URL_B, "B"));

        sup.handle_event(
            first,
            MediaEvent::Engine(EngineEvent::ManifestParsed { levels: 2 }),
        );
        assert_eq!(sup.state(), Some(PlaybackState::ManagedDecode));

        sup.handle_event(
            first,
            MediaEvent::Engine(fatal(ErrorType::Other, ErrorDetails::Other("x".into()))),
        );
        assert_matches!(sup.snapshot(), Some(SessionSnapshot { error: None, .. }));
    }

    #[test]
    fn unmount_releases_everything() {
        let (mut sup, surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        sup.unmount();
        assert!(sup.session().is_none());
        assert!(!sup.has_engine());
        assert_eq!(factory.live(), 0);
        assert!(!surface.is_attached());
    }

    #[test]
    fn drop_releases_engine() {
        let (mut sup, _surface, factory) = managed();
        sup.load(PlayerProps::new(URL_A, "A"));
        drop(sup);
        assert_eq!(factory.live(), 0);
    }

    #[test]
    fn engine_creation_failure_fails_activation() {
        let factory = MockEngineFactory::supported();
        factory.fail_create(true);
        let (mut sup, _rx) = PlaybackSupervisor::with_channel(
            MockSurface::managed_only(),
            factory,
            SupervisorConfig::default(),
        );
        sup.load(PlayerProps::new(URL_A, "A"));
        assert_eq!(sup.state(), Some(PlaybackState::Failed));
    }
}
