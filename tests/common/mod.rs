//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires the built-in catalog, a page
//! controller, and a [`PlaybackSupervisor`] driving in-memory mocks. Media
//! events queue up until [`TestHarness::pump`] applies them, the way the
//! player task would.

#![allow(dead_code)]

use iptvstream::catalog::Catalog;
use iptvstream::page::{PageController, PageSettings, PageView, WatchView};
use iptvstream_player::testing::{MockEngineFactory, MockSurface};
use iptvstream_player::{
    PlaybackState, PlaybackSupervisor, SessionSnapshot, SupervisorConfig, TaggedEvent,
};
use tokio::sync::mpsc;

pub type MockSupervisor = PlaybackSupervisor<MockSurface, MockEngineFactory>;

/// Page controller plus handles on the mocks behind its player.
pub struct TestHarness {
    pub page: PageController<MockSupervisor>,
    pub surface: MockSurface,
    pub factory: MockEngineFactory,
    events: mpsc::UnboundedReceiver<TaggedEvent>,
}

impl TestHarness {
    /// Surface that plays HLS itself.
    pub fn native() -> Self {
        Self::build(MockSurface::native(), MockEngineFactory::supported())
    }

    /// Surface that needs a managed engine.
    pub fn managed() -> Self {
        Self::build(MockSurface::managed_only(), MockEngineFactory::supported())
    }

    /// Neither native playback nor a managed engine.
    pub fn unsupported() -> Self {
        Self::build(MockSurface::managed_only(), MockEngineFactory::unsupported())
    }

    pub fn build(surface: MockSurface, factory: MockEngineFactory) -> Self {
        let (supervisor, events) = PlaybackSupervisor::with_channel(
            surface.clone(),
            factory.clone(),
            SupervisorConfig::default(),
        );
        let page = PageController::new(Catalog::builtin(), supervisor, PageSettings::default());

        Self {
            page,
            surface,
            factory,
            events,
        }
    }

    pub fn supervisor(&self) -> &MockSupervisor {
        self.page.player()
    }

    /// Apply every queued media event. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tagged) = self.events.try_recv() {
            self.page
                .player_mut()
                .handle_event(tagged.activation, tagged.event);
            applied += 1;
        }
        applied
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.supervisor().state()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.supervisor().snapshot()
    }

    /// The watch view being shown; panics on any other page.
    pub fn watch_view(&self) -> &WatchView {
        match self.page.view() {
            PageView::Watch(watch) => watch,
            other => panic!("expected watch page, got {other:?}"),
        }
    }
}
