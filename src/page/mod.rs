//! Page/route controller.
//!
//! Maps a [`Route`] to a page and keeps the player in step with it. A watch
//! page for a known channel loads that channel into the player; the default
//! view plays the first catalog channel; a watch route without an identifier
//! redirects to the default view; anything else renders not-found and leaves
//! no playback running.

mod view;

pub use view::{render_player_status, PageView, WatchView};

use iptvstream_common::Channel;
use iptvstream_player::{Player, PlayerProps};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::channel_list::ChannelList;
use crate::route::Route;

pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Presentation settings for the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    /// Origin used to build share links.
    pub origin: String,
    /// Passed to the player with every load.
    pub autoplay: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            autoplay: true,
        }
    }
}

/// Outcome of matching a route against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Channel {
        channel: &'a Channel,
        is_default: bool,
    },
    Redirect(Route),
    NotFound(String),
}

/// Match `route` against `catalog` without side effects.
pub fn resolve<'a>(catalog: &'a Catalog, route: &Route) -> Resolution<'a> {
    match route {
        Route::Home => Resolution::Channel {
            channel: catalog.default_channel(),
            is_default: true,
        },
        Route::Watch(None) => Resolution::Redirect(Route::Home),
        Route::Watch(Some(id)) => match catalog.find_channel(id.as_str()) {
            Some(channel) => Resolution::Channel {
                channel,
                is_default: false,
            },
            None => Resolution::NotFound(id.to_string()),
        },
        Route::Unknown(path) => Resolution::NotFound(path.clone()),
    }
}

/// A player that ignores every request. Useful for resolving pages without
/// starting playback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlayer;

impl Player for NoopPlayer {
    fn load(&mut self, _props: PlayerProps) {}

    fn unmount(&mut self) {}
}

/// Owns the catalog and the player and renders pages for routes.
pub struct PageController<P: Player> {
    catalog: Catalog,
    player: P,
    settings: PageSettings,
    route: Option<Route>,
    history: Vec<Route>,
    view: PageView,
    mounted: bool,
}

impl<P: Player> PageController<P> {
    pub fn new(catalog: Catalog, player: P, settings: PageSettings) -> Self {
        Self {
            catalog,
            player,
            settings,
            route: None,
            history: Vec::new(),
            view: PageView::Loading,
            mounted: false,
        }
    }

    /// Navigate to `route`, following a redirect if the route calls for one.
    pub fn navigate(&mut self, route: Route) -> &PageView {
        let mut route = route;
        let target = loop {
            match resolve(&self.catalog, &route) {
                Resolution::Redirect(target) => {
                    debug!(from = %route, to = %target, "Redirecting");
                    self.history.push(std::mem::replace(&mut route, target));
                }
                Resolution::Channel {
                    channel,
                    is_default,
                } => break Ok((channel, is_default)),
                Resolution::NotFound(requested) => break Err(requested),
            }
        };

        self.view = match target {
            Ok((channel, is_default)) => {
                info!(route = %route, channel = %channel.id, "Showing channel");
                let props = PlayerProps::new(&channel.stream_url, &channel.name)
                    .autoplay(self.settings.autoplay);
                self.player.load(props.clone());
                self.mounted = true;
                PageView::Watch(WatchView::new(
                    &self.catalog,
                    channel,
                    props,
                    is_default,
                    &self.settings.origin,
                ))
            }
            Err(requested) => {
                info!(route = %route, %requested, "Channel not found");
                if self.mounted {
                    self.player.unmount();
                    self.mounted = false;
                }
                PageView::NotFound {
                    requested,
                    back: Route::Home,
                }
            }
        };

        self.history.push(route.clone());
        self.route = Some(route);
        &self.view
    }

    /// Remount the current page with a fresh player activation.
    pub fn reload(&mut self) -> &PageView {
        if self.mounted {
            self.player.unmount();
            self.mounted = false;
        }
        let route = self.route.clone().unwrap_or_default();
        self.navigate(route)
    }

    /// Parse and navigate to `path`.
    pub fn navigate_path(&mut self, path: &str) -> &PageView {
        self.navigate(Route::parse(path))
    }

    /// Handle a tile selection from the channel list.
    ///
    /// Returns `None` if `id` names no channel in the list.
    pub fn select_channel(&mut self, id: &str) -> Option<&PageView> {
        let mut target = None;
        ChannelList::new(self.catalog.list_channels())
            .select(id, |channel| target = Some(Route::watch(channel.id.clone())));
        let route = target?;
        Some(self.navigate(route))
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Every route visited, redirect sources included.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Share link for the page being shown, if it shows a channel.
    pub fn share_link(&self) -> Option<&str> {
        match &self.view {
            PageView::Watch(watch) => Some(watch.share_link.as_str()),
            _ => None,
        }
    }

    /// Unmount the player and hand it back.
    pub fn into_player(mut self) -> P {
        if self.mounted {
            self.player.unmount();
        }
        self.player
    }
}
