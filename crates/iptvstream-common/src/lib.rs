//! iptvstream-common: shared types, identifiers, and errors.
//!
//! This crate provides the vocabulary used across iptvstream:
//!
//! - **Typed IDs**: [`ChannelId`] for catalog entries and routes,
//!   [`ActivationId`] for playback activations
//! - **Core Types**: the immutable [`Channel`] record
//! - **Error Handling**: a common error type and result alias
//!
//! # Examples
//!
//! ```
//! use iptvstream_common::{Channel, ChannelId, Error, Result};
//!
//! let channel = Channel::new("ptv-news", "PTV News HD", "http://host/a00d/index.m3u8")
//!     .with_logo("📰");
//! assert_eq!(channel.id, ChannelId::from("ptv-news"));
//!
//! fn lookup(id: &str) -> Result<Channel> {
//!     Err(Error::unknown_channel(id))
//! }
//! assert!(lookup("ptv-home").is_err());
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
