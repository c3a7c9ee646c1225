// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! yaperelay - watches payment notifications and forwards them as
//! SMS-equivalent messages.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod events;
mod settings_cmds;
mod status;
mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// yaperelay - payment-notification watcher and forwarder.
#[derive(Parser, Debug)]
#[command(name = "yaperelay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch a notification stream (ndjson on stdin or from a file).
    Watch {
        /// Read notifications from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List captured events.
    Events {
        /// One of: recent, today, yesterday, week.
        #[arg(long, default_value = "recent")]
        filter: String,
        /// Custom range start (epoch milliseconds); requires --to.
        #[arg(long)]
        from: Option<i64>,
        /// Custom range end (epoch milliseconds); requires --from.
        #[arg(long)]
        to: Option<i64>,
        /// Maximum events for the recent view.
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Manage the watched-package list.
    Packages {
        #[command(subcommand)]
        action: settings_cmds::PackageAction,
    },
    /// Manage destination contacts.
    Contacts {
        #[command(subcommand)]
        action: settings_cmds::ContactAction,
    },
    /// Turn the pipeline on.
    Enable,
    /// Turn the pipeline off.
    Disable,
    /// Toggle capture-all (test) mode.
    CaptureAll {
        /// "on" or "off".
        state: String,
    },
    /// Show configuration, database health, and diagnostics.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match yaperelay_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            yaperelay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.relay.log_level);

    let result = match cli.command {
        Some(Commands::Watch { input }) => watch::run(&config, input).await,
        Some(Commands::Events {
            filter,
            from,
            to,
            limit,
        }) => events::run(&config, &filter, from, to, limit).await,
        Some(Commands::Packages { action }) => settings_cmds::run_packages(&config, action).await,
        Some(Commands::Contacts { action }) => settings_cmds::run_contacts(&config, action).await,
        Some(Commands::Enable) => settings_cmds::set_enabled(&config, true).await,
        Some(Commands::Disable) => settings_cmds::set_enabled(&config, false).await,
        Some(Commands::CaptureAll { state }) => settings_cmds::set_capture_all(&config, &state).await,
        Some(Commands::Status) => status::run(&config).await,
        None => {
            println!("yaperelay: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("yaperelay: {e}");
        std::process::exit(1);
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
