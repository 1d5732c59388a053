//! A rendering surface backed by an external media player process.
//!
//! Players such as `mpv` or `ffplay` take an HLS URL on the command line, so
//! they cover the native path: the URL is handed over directly and the
//! process does its own fetching and decoding. The surface reports readiness
//! once the process is running and an error if it exits unsuccessfully.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{PlayerError, Result};
use crate::events::EventSink;
use crate::surface::{CanPlay, RenderSurface, SurfaceEvent, HLS_MIME_TYPE};

/// Players probed when none is configured.
pub const DEFAULT_PLAYERS: &[&str] = &["mpv", "ffplay", "vlc"];

/// A discovered player program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProgram {
    pub name: String,
    pub path: PathBuf,
    pub args: Vec<String>,
}

impl PlayerProgram {
    /// Look `name` up on `PATH`.
    pub fn find(name: &str) -> Option<Self> {
        let path = which::which(name).ok()?;
        Some(Self {
            name: name.to_string(),
            path,
            args: default_args(name),
        })
    }

    /// First available program among `candidates`.
    pub fn discover<I, N>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        candidates
            .into_iter()
            .find_map(|name| Self::find(name.as_ref()))
    }
}

fn default_args(name: &str) -> Vec<String> {
    let args: &[&str] = match name {
        "mpv" => &["--really-quiet", "--force-window=immediate"],
        "ffplay" => &["-loglevel", "error", "-autoexit"],
        "vlc" | "cvlc" => &["--play-and-exit", "--quiet"],
        _ => &[],
    };
    args.iter().map(|s| s.to_string()).collect()
}

struct Running {
    url: String,
    stop: oneshot::Sender<()>,
}

/// Native-path surface that spawns one player process per source.
pub struct ExternalPlayerSurface {
    program: Option<PlayerProgram>,
    running: Option<Running>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl ExternalPlayerSurface {
    pub fn new(program: Option<PlayerProgram>) -> Self {
        Self {
            program,
            running: None,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Use the first available player among `candidates`.
    pub fn discover<I, N>(candidates: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let program = PlayerProgram::discover(candidates);
        match &program {
            Some(p) => info!(player = %p.name, path = %p.path.display(), "Using external player"),
            None => warn!("No external player found"),
        }
        Self::new(program)
    }

    pub fn program(&self) -> Option<&PlayerProgram> {
        self.program.as_ref()
    }

    /// URL of the running player process, if any.
    pub fn current_source(&self) -> Option<&str> {
        self.running.as_ref().map(|r| r.url.as_str())
    }
}

impl RenderSurface for ExternalPlayerSurface {
    fn can_play_type(&self, mime: &str) -> CanPlay {
        if self.program.is_some() && mime.eq_ignore_ascii_case(HLS_MIME_TYPE) {
            CanPlay::Probably
        } else {
            CanPlay::No
        }
    }

    fn set_source(&mut self, url: &str, events: EventSink) -> Result<()> {
        self.clear_source();

        let program = self
            .program
            .as_ref()
            .ok_or_else(|| PlayerError::surface("no external player available"))?;

        let mut child = Command::new(&program.path)
            .args(&program.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PlayerError::surface(format!("failed to spawn {}: {e}", program.name)))?;

        debug!(player = %program.name, %url, pid = ?child.id(), "Player process started");
        *self.last_error.lock() = None;
        events.emit(SurfaceEvent::CanPlay);

        let (stop_tx, stop_rx) = oneshot::channel();
        let last_error = Arc::clone(&self.last_error);
        let name = program.name.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    let message = match status {
                        Ok(status) if status.success() => {
                            debug!(player = %name, "Player process exited");
                            return;
                        }
                        Ok(status) => format!("{name} exited with {status}"),
                        Err(e) => format!("failed waiting for {name}: {e}"),
                    };
                    warn!(player = %name, error = %message, "Player process failed");
                    *last_error.lock() = Some(message.clone());
                    events.emit(SurfaceEvent::Error(message));
                }
                _ = stop_rx => {
                    if let Err(e) = child.kill().await {
                        debug!(player = %name, error = %e, "Player process already gone");
                    }
                }
            }
        });

        self.running = Some(Running {
            url: url.to_string(),
            stop: stop_tx,
        });
        Ok(())
    }

    fn clear_source(&mut self) {
        if let Some(running) = self.running.take() {
            debug!(url = %running.url, "Stopping player process");
            let _ = running.stop.send(());
        }
    }

    fn play(&mut self) -> Result<()> {
        // The process starts playing on its own.
        if self.running.is_some() {
            Ok(())
        } else {
            Err(PlayerError::play_rejected("no source assigned"))
        }
    }

    fn is_paused(&self) -> bool {
        self.running.is_none()
    }

    fn media_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn attach_managed(&mut self) -> Result<()> {
        Err(PlayerError::surface(
            "external players only accept direct sources",
        ))
    }
}

impl Drop for ExternalPlayerSurface {
    fn drop(&mut self) {
        self.clear_source();
    }
}
