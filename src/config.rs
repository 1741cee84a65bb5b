use std::env;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use log::warn;

use crate::blockchain::DEFAULT_DIFFICULTY;

/// Command-line overrides; anything not given falls back to the environment.
#[derive(Debug, Parser)]
#[command(about = "Proof-of-work ledger node")]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    pub peer_fetch_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            peer_timeout: Duration::from_secs(5),
            peer_fetch_concurrency: 8,
        }
    }
}

impl Config {
    /// Environment (after `.env` has been loaded) overridden by the command line.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok()).with_cli(Cli::parse())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT", defaults.port),
            difficulty: parsed(&lookup, "POW_DIFFICULTY", defaults.difficulty),
            peer_timeout: Duration::from_secs(parsed(
                &lookup,
                "PEER_TIMEOUT_SECS",
                defaults.peer_timeout.as_secs(),
            )),
            peer_fetch_concurrency: parsed(
                &lookup,
                "PEER_FETCH_CONCURRENCY",
                defaults.peer_fetch_concurrency,
            )
            .max(1),
        }
    }

    fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(host) = cli.host {
            self.host = host;
        }
        self
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("CONFIG - ignoring unparsable {key}={raw:?}");
            default
        }),
    }
}
