use iptvstream_common::Channel;
use iptvstream_player::DEFAULT_PLAYERS;
use serde::{Deserialize, Serialize};

use crate::page::{PageSettings, DEFAULT_ORIGIN};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    /// Channel lineup; the built-in lineup is used when empty.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Config {
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            origin: self.share.origin.clone(),
            autoplay: self.player.autoplay,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    /// Origin prefixed to `/watch/{id}` in share links
    #[serde(default = "default_origin")]
    pub origin: String,
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Start playback as soon as the stream is ready
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// External players to try, in order
    #[serde(default = "default_native_players")]
    pub native_players: Vec<String>,
}

fn default_autoplay() -> bool {
    true
}

fn default_native_players() -> Vec<String> {
    DEFAULT_PLAYERS.iter().map(|s| s.to_string()).collect()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            native_players: default_native_players(),
        }
    }
}
