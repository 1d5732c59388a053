use std::fmt::Write as _;

use iptvstream_common::Channel;
use iptvstream_player::{DecodeMode, PlaybackState, PlayerProps, SessionSnapshot};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::channel_list::{render_tiles, ChannelList, ChannelTile};
use crate::route::Route;
use crate::share::share_link;

const LIST_COLUMNS: usize = 2;

/// What a route renders to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    /// Nothing resolved yet.
    Loading,
    Watch(WatchView),
    NotFound { requested: String, back: Route },
}

/// A page playing one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchView {
    pub channel: Channel,
    pub player: PlayerProps,
    pub share_link: String,
    pub channel_list: Vec<ChannelTile>,
    /// Reached through the default view rather than `/watch/{id}`.
    pub is_default: bool,
}

impl WatchView {
    pub(super) fn new(
        catalog: &Catalog,
        channel: &Channel,
        player: PlayerProps,
        is_default: bool,
        origin: &str,
    ) -> Self {
        Self {
            channel: channel.clone(),
            player,
            share_link: share_link(origin, &channel.id),
            channel_list: ChannelList::new(catalog.list_channels())
                .with_active(Some(&channel.id))
                .tiles(),
            is_default,
        }
    }
}

impl PageView {
    /// Plain-text rendering, with the player area filled from `status`.
    pub fn render_text(&self, status: Option<&SessionSnapshot>) -> String {
        let mut out = String::new();
        match self {
            Self::Loading => {
                let _ = writeln!(out, "Loading...");
            }
            Self::NotFound { requested, back } => {
                let _ = writeln!(out, "Channel Not Found");
                let _ = writeln!(out, "  No channel matches '{requested}'.");
                let _ = writeln!(out, "  Back to channels: {back}");
            }
            Self::Watch(watch) => {
                let _ = writeln!(out, "{} {}", watch.channel.glyph(), watch.channel.name);
                let _ = writeln!(out, "  {}", render_player_status(status));
                let _ = writeln!(out, "  Share: {}", watch.share_link);
                let _ = writeln!(out);
                out.push_str(&render_tiles(&watch.channel_list, LIST_COLUMNS));
            }
        }
        out
    }
}

/// One-line description of the player overlay.
pub fn render_player_status(status: Option<&SessionSnapshot>) -> String {
    let Some(snapshot) = status else {
        return "Loading stream...".to_string();
    };

    if let Some(error) = &snapshot.error {
        return format!("⚠️ {error} [Retry]");
    }
    if snapshot.loading {
        return "Loading stream...".to_string();
    }

    let mode = match snapshot.mode {
        Some(DecodeMode::Native) => " (native)",
        Some(DecodeMode::Managed) => " (managed)",
        None => "",
    };
    match snapshot.state {
        PlaybackState::Playing => format!("▶ {}{mode}", snapshot.title),
        state => format!("{}{mode}: {state}", snapshot.title),
    }
}
