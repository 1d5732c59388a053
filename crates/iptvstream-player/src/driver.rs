//! Runs a [`PlaybackSupervisor`] on its own task.
//!
//! The task is the single thread of control for the player: commands, tagged
//! media events, and the media-recovery timer are all applied from one
//! `select!` loop, so transitions never interleave. Every iteration publishes
//! the current [`SessionSnapshot`] on a watch channel.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::config::SupervisorConfig;
use crate::engine::EngineFactory;
use crate::error::{PlayerError, Result};
use crate::events::TaggedEvent;
use crate::session::{PlayerProps, SessionSnapshot};
use crate::supervisor::{PlaybackSupervisor, Player};
use crate::surface::RenderSurface;

/// Instructions accepted by the player task.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Load(PlayerProps),
    /// Tear down the current activation; the task keeps running.
    Unmount,
    /// Tear down and stop the task.
    Shutdown,
}

/// Handle to a running player task.
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<Option<SessionSnapshot>>,
    task: JoinHandle<()>,
}

/// Spawn a player task owning `surface` and `factory`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_player<S, F>(surface: S, factory: F, config: SupervisorConfig) -> PlayerHandle
where
    S: RenderSurface + 'static,
    F: EngineFactory + 'static,
{
    let (supervisor, events) = PlaybackSupervisor::with_channel(surface, factory, config);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (snapshots_tx, snapshots_rx) = watch::channel(None);

    let task = tokio::spawn(run(supervisor, events, commands_rx, snapshots_tx));

    PlayerHandle {
        commands: commands_tx,
        snapshots: snapshots_rx,
        task,
    }
}

async fn run<S, F>(
    mut supervisor: PlaybackSupervisor<S, F>,
    mut events: mpsc::UnboundedReceiver<TaggedEvent>,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
    snapshots: watch::Sender<Option<SessionSnapshot>>,
) where
    S: RenderSurface,
    F: EngineFactory,
{
    loop {
        let deadline = supervisor.media_check_deadline();

        tokio::select! {
            command = commands.recv() => match command {
                Some(PlayerCommand::Load(props)) => {
                    supervisor.load(props);
                }
                Some(PlayerCommand::Unmount) => {
                    supervisor.unmount();
                }
                Some(PlayerCommand::Shutdown) | None => {
                    supervisor.unmount();
                    snapshots.send_replace(None);
                    debug!("Player task stopped");
                    return;
                }
            },
            Some(tagged) = events.recv() => {
                supervisor.handle_event(tagged.activation, tagged.event);
            }
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                supervisor.run_media_check(Instant::now());
            }
        }

        snapshots.send_replace(supervisor.snapshot());
    }
}

impl PlayerHandle {
    /// Point the player at a stream.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Closed`] if the task has stopped.
    pub fn send_load(&self, props: PlayerProps) -> Result<()> {
        self.commands
            .send(PlayerCommand::Load(props))
            .map_err(|_| PlayerError::Closed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// A receiver observing every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionSnapshot>> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Closed`] if the task stops first.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| s.as_ref().is_some_and(&mut predicate))
            .await
            .map_err(|_| PlayerError::Closed)?;
        snapshot.clone().ok_or(PlayerError::Closed)
    }

    /// Tear down the current activation and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Player task ended abnormally");
        }
    }
}

impl Player for PlayerHandle {
    fn load(&mut self, props: PlayerProps) {
        if let Err(e) = self.send_load(props) {
            tracing::warn!(error = %e, "Dropping load request");
        }
    }

    fn unmount(&mut self) {
        let _ = self.commands.send(PlayerCommand::Unmount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, EngineEvent, ErrorDetails, ErrorType};
    use crate::session::{DecodeMode, PlaybackState};
    use crate::testing::{MockEngineFactory, MockSurface};
    use std::time::Duration;

    const URL: &str = "http://host/a00d/index.m3u8";

    #[tokio::test]
    async fn load_and_play_through_task() {
        let factory = MockEngineFactory::supported();
        let handle = spawn_player(
            MockSurface::managed_only(),
            factory.clone(),
            SupervisorConfig::default(),
        );

        handle.send_load(PlayerProps::new(URL, "News")).unwrap();
        handle
            .wait_for(|s| s.state == PlaybackState::ManagedDecode)
            .await
            .unwrap();

        assert!(factory.emit(EngineEvent::ManifestParsed { levels: 2 }));
        let snap = handle
            .wait_for(|s| s.state == PlaybackState::Playing)
            .await
            .unwrap();
        assert_eq!(snap.stream_url, URL);
        assert_eq!(snap.title, "News");

        handle.shutdown().await;
        assert_eq!(factory.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn grace_timer_triggers_native_fallback() {
        let surface = MockSurface::managed_only();
        let factory = MockEngineFactory::supported();
        let handle = spawn_player(surface.clone(), factory.clone(), SupervisorConfig::default());

        handle.send_load(PlayerProps::new(URL, "News")).unwrap();
        handle
            .wait_for(|s| s.state == PlaybackState::ManagedDecode)
            .await
            .unwrap();

        surface.set_media_error(Some("PIPELINE_ERROR_DECODE"));
        factory.emit(EngineEvent::Error(EngineError::fatal(
            ErrorType::Media,
            ErrorDetails::BufferAppendError,
        )));

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(handle.snapshot().unwrap().mode, Some(DecodeMode::Managed));

        let snap = handle
            .wait_for(|s| s.mode == Some(DecodeMode::Native))
            .await
            .unwrap();
        assert!(snap.fell_back_to_native);
        assert_eq!(surface.source_history(), vec![URL.to_string()]);
        assert_eq!(factory.live(), 0);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn unmount_keeps_task_alive() {
        let factory = MockEngineFactory::supported();
        let mut handle = spawn_player(
            MockSurface::managed_only(),
            factory.clone(),
            SupervisorConfig::default(),
        );
        handle.send_load(PlayerProps::new(URL, "News")).unwrap();
        handle
            .wait_for(|s| s.state == PlaybackState::ManagedDecode)
            .await
            .unwrap();

        Player::unmount(&mut handle);
        let mut rx = handle.subscribe();
        rx.wait_for(|s| s.is_none()).await.unwrap();
        assert_eq!(factory.live(), 0);

        handle.send_load(PlayerProps::new(URL, "News")).unwrap();
        handle
            .wait_for(|s| s.state == PlaybackState::ManagedDecode)
            .await
            .unwrap();
        assert_eq!(factory.created(), 2);

        handle.shutdown().await;
        assert_eq!(factory.live(), 0);
    }

    #[tokio::test]
    async fn dropped_handle_stops_task() {
        let factory = MockEngineFactory::supported();
        let handle = spawn_player(
            MockSurface::managed_only(),
            factory.clone(),
            SupervisorConfig::default(),
        );
        handle.send_load(PlayerProps::new(URL, "News")).unwrap();
        handle
            .wait_for(|s| s.state == PlaybackState::ManagedDecode)
            .await
            .unwrap();

        let PlayerHandle { commands, task, .. } = handle;
        drop(commands);
        task.await.unwrap();
        assert_eq!(factory.live(), 0);
    }
}
