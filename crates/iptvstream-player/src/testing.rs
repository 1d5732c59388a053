//! In-memory engine and surface for tests.
//!
//! Both mocks are cheap to clone and share their state, so a test can keep a
//! handle after moving the mock into a supervisor or a player task.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::engine::{EngineEvent, EngineFactory, HlsEngine};
use crate::error::{PlayerError, Result};
use crate::events::EventSink;
use crate::surface::{CanPlay, RenderSurface, SurfaceEvent};

// ---------------------------------------------------------------------------
// MockSurface
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SurfaceState {
    native_hls: bool,
    current: Option<String>,
    history: Vec<String>,
    paused: bool,
    play_calls: u32,
    clear_calls: u32,
    reject_play: bool,
    media_error: Option<String>,
    attached: bool,
    refuse_attach: bool,
    sink: Option<EventSink>,
}

/// Scriptable rendering surface.
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MockSurface {
    /// A surface that plays HLS natively.
    pub fn native() -> Self {
        let surface = Self::default();
        {
            let mut state = surface.state.lock();
            state.native_hls = true;
            state.paused = true;
        }
        surface
    }

    /// A surface that needs a managed engine.
    pub fn managed_only() -> Self {
        let surface = Self::default();
        surface.state.lock().paused = true;
        surface
    }

    pub fn reject_play(&self, reject: bool) {
        self.state.lock().reject_play = reject;
    }

    /// Make managed attaches fail, as a surface that only takes direct
    /// sources does.
    pub fn refuse_attach(&self, refuse: bool) {
        self.state.lock().refuse_attach = refuse;
    }

    pub fn set_media_error(&self, error: Option<&str>) {
        self.state.lock().media_error = error.map(str::to_string);
    }

    /// Source currently assigned directly.
    pub fn current_source(&self) -> Option<String> {
        self.state.lock().current.clone()
    }

    /// Every URL assigned directly, in order.
    pub fn source_history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    pub fn play_calls(&self) -> u32 {
        self.state.lock().play_calls
    }

    pub fn clear_calls(&self) -> u32 {
        self.state.lock().clear_calls
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// Raise a surface event for the current direct source.
    pub fn emit(&self, event: SurfaceEvent) -> bool {
        let sink = self.state.lock().sink.clone();
        sink.map(|s| s.emit(event)).unwrap_or(false)
    }
}

impl RenderSurface for MockSurface {
    fn can_play_type(&self, _mime: &str) -> CanPlay {
        if self.state.lock().native_hls {
            CanPlay::Maybe
        } else {
            CanPlay::No
        }
    }

    fn set_source(&mut self, url: &str, events: EventSink) -> Result<()> {
        let mut state = self.state.lock();
        state.current = Some(url.to_string());
        state.history.push(url.to_string());
        state.media_error = None;
        state.sink = Some(events);
        Ok(())
    }

    fn clear_source(&mut self) {
        let mut state = self.state.lock();
        state.current = None;
        state.sink = None;
        state.paused = true;
        state.clear_calls += 1;
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.play_calls += 1;
        if state.reject_play {
            return Err(PlayerError::play_rejected("autoplay policy"));
        }
        state.paused = false;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn media_error(&self) -> Option<String> {
        self.state.lock().media_error.clone()
    }

    fn attach_managed(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        if state.refuse_attach {
            return Err(PlayerError::surface("managed attach refused"));
        }
        state.attached = true;
        Ok(())
    }

    fn detach_managed(&mut self) {
        self.state.lock().attached = false;
    }
}

// ---------------------------------------------------------------------------
// MockEngineFactory
// ---------------------------------------------------------------------------

/// What happened to one engine instance.
#[derive(Debug, Clone, Default)]
pub struct EngineRecord {
    pub url: Option<String>,
    pub attached: bool,
    pub start_loads: u32,
    pub media_recoveries: u32,
    pub destroyed: bool,
}

#[derive(Debug, Default)]
struct FactoryState {
    supported: bool,
    fail_create: bool,
    live: usize,
    max_live: usize,
    engines: Vec<EngineRecord>,
    sinks: Vec<EventSink>,
    journal: Vec<String>,
}

/// Factory counting live engine instances.
#[derive(Debug, Clone, Default)]
pub struct MockEngineFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl MockEngineFactory {
    pub fn supported() -> Self {
        let factory = Self::default();
        factory.state.lock().supported = true;
        factory
    }

    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.lock().fail_create = fail;
    }

    /// Engines currently alive (created and not yet dropped).
    pub fn live(&self) -> usize {
        self.state.lock().live
    }

    /// Highest number of engines alive at once.
    pub fn max_live(&self) -> usize {
        self.state.lock().max_live
    }

    pub fn created(&self) -> usize {
        self.state.lock().engines.len()
    }

    /// Record of the `index`-th engine created.
    pub fn engine(&self, index: usize) -> EngineRecord {
        self.state.lock().engines[index].clone()
    }

    /// Ordered log of `created N` / `destroyed N` / `dropped N` entries.
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().journal.clone()
    }

    /// Raise an event from the most recently created engine.
    pub fn emit(&self, event: EngineEvent) -> bool {
        let sink = self.state.lock().sinks.last().cloned();
        sink.map(|s| s.emit(event)).unwrap_or(false)
    }

    /// Raise an event from the `index`-th engine, even if it was destroyed.
    pub fn emit_from(&self, index: usize, event: EngineEvent) -> bool {
        let sink = self.state.lock().sinks.get(index).cloned();
        sink.map(|s| s.emit(event)).unwrap_or(false)
    }
}

impl EngineFactory for MockEngineFactory {
    fn is_supported(&self) -> bool {
        self.state.lock().supported
    }

    fn create(&self, _config: &EngineConfig, events: EventSink) -> Result<Box<dyn HlsEngine>> {
        let mut state = self.state.lock();
        if state.fail_create {
            return Err(PlayerError::engine_create("mock refused"));
        }
        let index = state.engines.len();
        state.engines.push(EngineRecord::default());
        state.sinks.push(events);
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        state.journal.push(format!("created {index}"));
        Ok(Box::new(MockEngine {
            index,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockEngine {
    index: usize,
    state: Arc<Mutex<FactoryState>>,
}

impl MockEngine {
    fn record(&self, f: impl FnOnce(&mut EngineRecord)) {
        let mut state = self.state.lock();
        f(&mut state.engines[self.index]);
    }
}

impl HlsEngine for MockEngine {
    fn load_source(&mut self, url: &str) {
        self.record(|r| r.url = Some(url.to_string()));
    }

    fn attach_media(&mut self, surface: &mut dyn RenderSurface) -> Result<()> {
        surface.attach_managed()?;
        self.record(|r| r.attached = true);
        Ok(())
    }

    fn detach_media(&mut self, surface: &mut dyn RenderSurface) {
        surface.detach_managed();
        self.record(|r| r.attached = false);
    }

    fn start_load(&mut self) {
        self.record(|r| r.start_loads += 1);
    }

    fn recover_media_error(&mut self) {
        self.record(|r| r.media_recoveries += 1);
    }

    fn destroy(&mut self) {
        let mut state = self.state.lock();
        state.engines[self.index].destroyed = true;
        let entry = format!("destroyed {}", self.index);
        state.journal.push(entry);
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.live -= 1;
        let entry = format!("dropped {}", self.index);
        state.journal.push(entry);
    }
}
