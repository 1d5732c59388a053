//! Core type definitions for the channel catalog.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::ids::ChannelId;

/// Glyph shown for channels that do not define their own.
pub const FALLBACK_GLYPH: &str = "📡";

/// A live channel. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique, stable identifier used in routes.
    pub id: ChannelId,
    /// Display name.
    pub name: String,
    /// HLS manifest address.
    pub stream_url: String,
    /// Optional display glyph or logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Channel {
    pub fn new(
        id: impl Into<ChannelId>,
        name: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stream_url: stream_url.into(),
            logo: None,
        }
    }

    #[must_use]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// The channel's glyph, or [`FALLBACK_GLYPH`].
    pub fn glyph(&self) -> &str {
        self.logo.as_deref().unwrap_or(FALLBACK_GLYPH)
    }

    /// Check the fields a catalog entry must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] for an identifier that cannot be a route
    /// segment, an empty name, or a stream URL that is not `http(s)`.
    pub fn validate(&self) -> Result<()> {
        if !self.id.is_route_safe() {
            return Err(Error::catalog(format!(
                "channel id '{}' cannot be used in a route",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::catalog(format!("channel '{}' has no name", self.id)));
        }
        let url = Url::parse(&self.stream_url).map_err(|e| {
            Error::catalog(format!(
                "channel '{}' has an invalid stream url '{}': {e}",
                self.id, self.stream_url
            ))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::catalog(format!(
                "channel '{}' stream url uses unsupported scheme '{other}'",
                self.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news() -> Channel {
        Channel::new("ptv-news", "PTV News HD", "http://host/a00d/index.m3u8").with_logo("📰")
    }

    #[test]
    fn test_glyph_fallback() {
        assert_eq!(news().glyph(), "📰");
        let bare = Channel::new("bare", "Bare", "http://host/x/index.m3u8");
        assert_eq!(bare.glyph(), FALLBACK_GLYPH);
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        assert!(news().validate().is_ok());
        let secure = Channel::new("s", "Secure", "https://cdn.example/live.m3u8");
        assert!(secure.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let bad_scheme = Channel::new("x", "X", "rtsp://host/stream");
        assert!(matches!(bad_scheme.validate(), Err(Error::Catalog(_))));

        let not_a_url = Channel::new("x", "X", "index.m3u8");
        assert!(matches!(not_a_url.validate(), Err(Error::Catalog(_))));

        let no_name = Channel::new("x", "  ", "http://host/index.m3u8");
        assert!(matches!(no_name.validate(), Err(Error::Catalog(_))));

        let slashed = Channel::new("a/b", "A", "http://host/index.m3u8");
        assert!(matches!(slashed.validate(), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_channel_serde_skips_missing_logo() {
        let bare = Channel::new("bare", "Bare", "http://host/x/index.m3u8");
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("logo").is_none());
        assert_eq!(json["stream_url"], "http://host/x/index.m3u8");
    }
}
