//! Application routes.
//!
//! Two pages exist: the default view at `/` and the watch page at
//! `/watch/{id}`. A watch path without an identifier is still a watch route
//! (it redirects to the default view); anything else is unknown.

use std::fmt;
use std::str::FromStr;

use iptvstream_common::ChannelId;
use serde::{Serialize, Serializer};

const WATCH_PREFIX: &str = "/watch";

/// A parsed navigation target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    /// The default view, `/`.
    #[default]
    Home,
    /// `/watch/{id}`; `None` when the identifier segment is absent.
    Watch(Option<ChannelId>),
    /// Any path that matches no page.
    Unknown(String),
}

impl Route {
    /// Watch route for `id`.
    pub fn watch(id: impl Into<ChannelId>) -> Self {
        Self::Watch(Some(id.into()))
    }

    /// Parse a request path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        if path.is_empty() || path == "/" {
            return Self::Home;
        }

        let Some(rest) = path.strip_prefix(WATCH_PREFIX) else {
            return Self::Unknown(path.to_string());
        };

        match rest {
            "" | "/" => Self::Watch(None),
            _ => match rest.strip_prefix('/').map(|s| s.trim_end_matches('/')) {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::watch(id),
                _ => Self::Unknown(path.to_string()),
            },
        }
    }

    /// The canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Watch(Some(id)) => format!("{WATCH_PREFIX}/{id}"),
            Self::Watch(None) => WATCH_PREFIX.to_string(),
            Self::Unknown(path) => path.clone(),
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
