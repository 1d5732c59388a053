//! Shareable watch links and clipboard delivery.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use iptvstream_common::{ChannelId, Error, Result};
use tracing::debug;

use crate::route::Route;

/// Absolute link to the watch page of `id`.
pub fn share_link(origin: &str, id: &ChannelId) -> String {
    format!(
        "{}{}",
        origin.trim_end_matches('/'),
        Route::watch(id.clone())
    )
}

/// Destination for copied text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard programs probed in order, with the arguments that make them read
/// stdin into the system clipboard.
pub const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Clipboard backed by an external copy program.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    name: String,
    path: PathBuf,
    args: Vec<String>,
}

impl CommandClipboard {
    /// First clipboard program found on `PATH`.
    pub fn discover() -> Option<Self> {
        CLIPBOARD_TOOLS.iter().find_map(|(name, args)| {
            let path = which::which(name).ok()?;
            Some(Self {
                name: name.to_string(),
                path,
                args: args.iter().map(|a| a.to_string()).collect(),
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::clipboard(format!("failed to run {}: {e}", self.name)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(Error::clipboard(format!(
                "{} exited with {status}",
                self.name
            )));
        }

        debug!(tool = %self.name, "Copied to clipboard");
        Ok(())
    }
}

/// Copy the share link for `id`, returning the link.
pub fn copy_share_link(
    clipboard: &mut dyn Clipboard,
    origin: &str,
    id: &ChannelId,
) -> Result<String> {
    let link = share_link(origin, id);
    clipboard.write_text(&link)?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorded(Vec<String>);

    impl Clipboard for Recorded {
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    struct Refusing;

    impl Clipboard for Refusing {
        fn write_text(&mut self, _text: &str) -> Result<()> {
            Err(Error::clipboard("denied"))
        }
    }

    #[test]
    fn link_joins_origin_and_watch_path() {
        let id = ChannelId::from("ptv-news");
        assert_eq!(
            share_link("http://localhost:3000", &id),
            "http://localhost:3000/watch/ptv-news"
        );
        assert_eq!(
            share_link("https://tv.example.com/", &id),
            "https://tv.example.com/watch/ptv-news"
        );
    }

    #[test]
    fn copies_link_to_clipboard() {
        let mut clipboard = Recorded::default();
        let link = copy_share_link(
            &mut clipboard,
            "http://localhost:3000",
            &ChannelId::from("ptv-sports"),
        )
        .unwrap();
        assert_eq!(link, "http://localhost:3000/watch/ptv-sports");
        assert_eq!(clipboard.0, vec![link]);
    }

    #[test]
    fn clipboard_failure_propagates() {
        let result = copy_share_link(&mut Refusing, "http://h", &ChannelId::from("a"));
        assert!(matches!(result, Err(Error::Clipboard(_))));
    }

    #[test]
    fn command_clipboard_reports_failing_tool() {
        let Some(path) = which::which("false").ok() else {
            return;
        };
        let mut clipboard = CommandClipboard {
            name: "false".into(),
            path,
            args: Vec::new(),
        };
        assert!(clipboard.write_text("x").is_err());
    }
}
