//! The channel catalog.
//!
//! An ordered, immutable list of channels, built once at startup from the
//! configuration file or the built-in lineup. Lookups are exact matches on
//! the channel identifier; an unknown identifier yields `None`.

mod defaults;

use std::collections::HashSet;

use iptvstream_common::{Channel, Error, Result};

/// Ordered set of channels with unique identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    channels: Vec<Channel>,
}

impl Catalog {
    /// Build a catalog, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] if the list is empty, an identifier repeats,
    /// or any channel fails [`Channel::validate`].
    pub fn new(channels: Vec<Channel>) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::catalog("catalog has no channels"));
        }

        let mut seen = HashSet::with_capacity(channels.len());
        for channel in &channels {
            channel.validate()?;
            if !seen.insert(channel.id.as_str()) {
                return Err(Error::catalog(format!(
                    "duplicate channel id '{}'",
                    channel.id
                )));
            }
        }

        Ok(Self { channels })
    }

    /// The built-in lineup.
    pub fn builtin() -> Self {
        Self {
            channels: defaults::channels(),
        }
    }

    /// All channels in display order.
    pub fn list_channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Look a channel up by identifier.
    pub fn find_channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id.as_str() == id)
    }

    /// Like [`find_channel`](Self::find_channel), but an unknown id is an error.
    pub fn channel(&self, id: &str) -> Result<&Channel> {
        self.find_channel(id)
            .ok_or_else(|| Error::unknown_channel(id))
    }

    /// The channel shown on the default view.
    pub fn default_channel(&self) -> &Channel {
        // Non-empty by construction.
        &self.channels[0]
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
