//! Typed ID wrappers.
//!
//! Channel identifiers are human-chosen slugs that appear in routes, so they
//! wrap a `String`. Activation identifiers are minted by the playback
//! supervisor and only need to be unique and ordered within one player.

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog channel (`ptv-news`).
///
/// Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier can be used verbatim as one route segment.
    pub fn is_route_safe(&self) -> bool {
        !self.0.is_empty()
            && !self
                .0
                .chars()
                .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one playback activation (one stream URL assigned to a
/// mounted player). Monotonically increasing per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationId(u64);

impl ActivationId {
    /// The activation that precedes every real one.
    pub const NONE: ActivationId = ActivationId(0);

    /// The activation following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActivationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_exact_match() {
        assert_eq!(ChannelId::from("ptv-news"), ChannelId::new("ptv-news"));
        assert_ne!(ChannelId::from("ptv-news"), ChannelId::from("PTV-NEWS"));
        assert_ne!(ChannelId::from("ptv-news"), ChannelId::from("ptv"));
    }

    #[test]
    fn test_channel_id_serialization() {
        let id = ChannelId::from("ptv-home");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ptv-home\"");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_channel_id_route_safety() {
        assert!(ChannelId::from("ptv-sports").is_route_safe());
        assert!(!ChannelId::from("").is_route_safe());
        assert!(!ChannelId::from("a/b").is_route_safe());
        assert!(!ChannelId::from("a b").is_route_safe());
        assert!(!ChannelId::from("a?b").is_route_safe());
    }

    #[test]
    fn test_activation_id_ordering() {
        let first = ActivationId::NONE.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(first.get(), 1);
        assert_eq!(second.to_string(), "#2");
    }
}
