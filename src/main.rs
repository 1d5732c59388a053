mod cli;

use iptvstream::{
    channel_list::ChannelList,
    config,
    page::{render_player_status, NoopPlayer, PageController, PageView},
    route::Route,
    share::{self, CommandClipboard},
    tools,
};
use iptvstream_common::ChannelId;
use iptvstream_player::{spawn_player, ExternalPlayerSurface, SupervisorConfig, UnavailableEngine};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "iptvstream=trace,iptvstream_player=trace,iptvstream_common=debug".to_string()
        } else {
            "iptvstream=info,iptvstream_player=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Channels { active, json } => list_channels(cli.config.as_deref(), active, json),
        Commands::Resolve { path, json } => resolve_path(cli.config.as_deref(), &path, json),
        Commands::Watch { channel } => {
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(watch(cli.config.as_deref(), channel));
            // Stdin is read on a blocking thread that may still be waiting for input
            rt.shutdown_background();
            result
        }
        Commands::Share { channel, no_copy } => {
            share_channel(cli.config.as_deref(), &channel, no_copy)
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("iptvstream {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_channels(config_path: Option<&Path>, active: Option<String>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = config::build_catalog(&config)?;

    let active = active.map(ChannelId::from);
    if let Some(id) = &active {
        if catalog.find_channel(id.as_str()).is_none() {
            tracing::warn!("Unknown channel: {}", id);
        }
    }

    let list = ChannelList::new(catalog.list_channels()).with_active(active.as_ref());
    if json {
        println!("{}", serde_json::to_string_pretty(&list.tiles())?);
    } else {
        print!("{}", list.render_text(1));
    }

    Ok(())
}

fn resolve_path(config_path: Option<&Path>, path: &str, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = config::build_catalog(&config)?;

    let mut page = PageController::new(catalog, NoopPlayer, config.page_settings());
    page.navigate_path(path);

    if json {
        let output = serde_json::json!({
            "history": page.history(),
            "view": page.view(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let [from, .., _] = page.history() {
        println!("Redirected from {} to {}", from, page.route().unwrap_or(&Route::Home));
    }
    print!("{}", page.view().render_text(None));

    Ok(())
}

fn share_channel(config_path: Option<&Path>, channel: &str, no_copy: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = config::build_catalog(&config)?;

    let channel = catalog.channel(channel)?;

    if no_copy {
        println!("{}", share::share_link(&config.share.origin, &channel.id));
        return Ok(());
    }

    let Some(mut clipboard) = CommandClipboard::discover() else {
        println!("{}", share::share_link(&config.share.origin, &channel.id));
        tracing::warn!("No clipboard tool found; link not copied");
        return Ok(());
    };

    match share::copy_share_link(&mut clipboard, &config.share.origin, &channel.id) {
        Ok(link) => {
            println!("{}", link);
            eprintln!("Copied to clipboard via {}", clipboard.name());
        }
        Err(e) => {
            println!("{}", share::share_link(&config.share.origin, &channel.id));
            tracing::warn!("Failed to copy link: {}", e);
        }
    }

    Ok(())
}

async fn watch(config_path: Option<&Path>, channel: Option<String>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = config::build_catalog(&config)?;

    let surface = ExternalPlayerSurface::discover(&config.player.native_players);
    let player = spawn_player(surface, UnavailableEngine, SupervisorConfig::default());
    let mut snapshots = player.subscribe();
    let mut page = PageController::new(catalog, player, config.page_settings());

    let route = channel.map(Route::watch).unwrap_or_default();
    print!("{}", page.navigate(route).render_text(None));
    println!("\nEnter a channel id or path to switch, 'r' to retry, 'q' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_status = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => continue,
                    "q" | "quit" => break,
                    "r" | "retry" => {
                        page.reload();
                    }
                    path if path.starts_with('/') => {
                        page.navigate_path(path);
                    }
                    id => {
                        if page.select_channel(id).is_none() {
                            page.navigate(Route::watch(id));
                        }
                    }
                }
                last_status = None;
                let status = page.player().snapshot();
                print!("{}", page.view().render_text(status.as_ref()));
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = snapshots.borrow_and_update().clone();
                if !matches!(page.view(), PageView::Watch(_)) {
                    continue;
                }
                let line = render_player_status(status.as_ref());
                if last_status.as_ref() != Some(&line) {
                    println!("  {}", line);
                    last_status = Some(line);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    tracing::info!("Shutting down...");
    page.into_player().shutdown().await;

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let found = tools::check_tools(&config.player.native_players);
    let mut any_player = false;

    for tool in &found {
        let status = if tool.available { "✓" } else { "✗" };
        if tool.available && tool.kind == tools::ToolKind::Player {
            any_player = true;
        }

        print!("{} {} ({:?})", status, tool.name, tool.kind);

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if any_player {
        println!("A player is available for playback!");
    } else {
        println!("No player found. Install one of: {}", config.player.native_players.join(", "));
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            let catalog = config::build_catalog(&config)?;
            println!("✓ Configuration is valid");
            println!("  Share origin: {}", config.share.origin);
            println!("  Autoplay: {}", config.player.autoplay);
            println!("  Players: {}", config.player.native_players.join(", "));
            if config.channels.is_empty() {
                println!("  Channels: {} (built-in)", catalog.len());
            } else {
                println!("  Channels: {}", catalog.len());
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Share origin: {}", config.share.origin);
            println!("  Channels: {} (built-in)", iptvstream::catalog::Catalog::builtin().len());
        }
    }

    Ok(())
}
