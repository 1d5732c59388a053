use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iptvstream")]
#[command(author, version, about = "Live IPTV channel viewer")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the channel catalog
    Channels {
        /// Mark this channel as now playing
        #[arg(long)]
        active: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which page a path resolves to, without starting playback
    Resolve {
        /// Path such as /watch/ptv-news
        #[arg(required = true)]
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch a channel; read channel ids or paths from stdin to switch
    Watch {
        /// Channel to start on (defaults to the first channel)
        channel: Option<String>,
    },

    /// Print and copy the share link for a channel
    Share {
        /// Channel id
        #[arg(required = true)]
        channel: String,

        /// Print the link without copying it
        #[arg(long)]
        no_copy: bool,
    },

    /// Check that players and clipboard tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
