//! iptvstream - Live IPTV channel viewer
//!
//! This library crate exposes the catalog, routing and page logic for
//! integration testing. Playback lives in `iptvstream-player`.

pub mod catalog;
pub mod channel_list;
pub mod config;
pub mod page;
pub mod route;
pub mod share;
pub mod tools;
