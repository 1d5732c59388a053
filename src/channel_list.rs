//! The channel selector shown beside the player.
//!
//! Every catalog entry becomes a tile linking to its watch route. The tile
//! for the channel currently playing carries the "Now Playing" marker.

use std::fmt::Write as _;

use iptvstream_common::{Channel, ChannelId};
use serde::Serialize;

use crate::route::Route;

pub const NOW_PLAYING: &str = "Now Playing";

pub(crate) fn count_label(count: usize) -> String {
    match count {
        1 => "1 channel available".to_string(),
        n => format!("{n} channels available"),
    }
}

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelTile {
    pub id: ChannelId,
    pub name: String,
    pub glyph: String,
    pub href: Route,
    pub active: bool,
}

impl ChannelTile {
    fn new(channel: &Channel, active: bool) -> Self {
        Self {
            id: channel.id.clone(),
            name: channel.name.clone(),
            glyph: channel.glyph().to_string(),
            href: Route::watch(channel.id.clone()),
            active,
        }
    }
}

/// Catalog entries plus the active channel, if any.
#[derive(Debug, Clone, Copy)]
pub struct ChannelList<'a> {
    channels: &'a [Channel],
    active: Option<&'a ChannelId>,
}

impl<'a> ChannelList<'a> {
    pub fn new(channels: &'a [Channel]) -> Self {
        Self {
            channels,
            active: None,
        }
    }

    /// Mark `id` as the channel now playing.
    pub fn with_active(mut self, id: Option<&'a ChannelId>) -> Self {
        self.active = id;
        self
    }

    pub fn tiles(&self) -> Vec<ChannelTile> {
        self.channels
            .iter()
            .map(|c| ChannelTile::new(c, self.active == Some(&c.id)))
            .collect()
    }

    pub fn header(&self) -> String {
        count_label(self.channels.len())
    }

    /// Invoke `on_select` with the channel whose tile was chosen.
    ///
    /// Returns `false` without calling back when `id` is not in the list.
    pub fn select<F>(&self, id: &str, on_select: F) -> bool
    where
        F: FnOnce(&'a Channel),
    {
        match self.channels.iter().find(|c| c.id.as_str() == id) {
            Some(channel) => {
                on_select(channel);
                true
            }
            None => false,
        }
    }

    /// Plain-text grid of tiles, `columns` per row.
    pub fn render_text(&self, columns: usize) -> String {
        render_tiles(&self.tiles(), columns)
    }
}

/// Header plus a plain-text grid of already-built tiles.
pub(crate) fn render_tiles(tiles: &[ChannelTile], columns: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Channels ({})", count_label(tiles.len()));

    for row in tiles.chunks(columns.max(1)) {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| {
                let marker = if tile.active {
                    format!(" [{NOW_PLAYING}]")
                } else {
                    String::new()
                };
                format!("{} {} <{}>{}", tile.glyph, tile.name, tile.href, marker)
            })
            .collect();
        let _ = writeln!(out, "  {}", cells.join("  |  "));
    }
    out
}
