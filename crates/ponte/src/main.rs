// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ponte - a local integration bridge for WhatsApp and SMTP channels.
//!
//! This is the binary entry point for the bridge daemon.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

use ponte_core::PonteError;

mod serve;
mod shutdown;
mod status;

/// Ponte - a local integration bridge for WhatsApp and SMTP channels.
#[derive(Parser, Debug)]
#[command(name = "ponte", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bridge daemon.
    Serve,
    /// Query a running bridge for channel status.
    Status {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match ponte_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ponte_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        None => {
            println!("ponte: use --help for available commands");
            return;
        }
    };

    if let Err(e) = result {
        match e {
            PonteError::PortInUse { ref addr } => {
                eprintln!("error: cannot bind {addr}: the port is already in use.");
                eprintln!("Another bridge instance (or another service) is listening there.");
                eprintln!("Stop it, or change `bridge.port` in ponte.toml.");
            }
            ref other => {
                eprintln!("error: {other}");
            }
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_is_valid() {
        // Verify the compiled-in defaults pass validation (no config file needed).
        let config = ponte_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.bridge.port, 3001);
    }
}
