//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use flatzone_srv::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Authoritative DNS server with ANAME flattening
///
/// Serves zones from a YAML database that is re-read on every query.
/// ANAME records are resolved upstream and answered as A/AAAA.
#[derive(Parser, Debug)]
#[command(name = "flatzone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server options when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the DNS server (default)
    Serve(ServeArgs),

    /// Validate a zone database and exit
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// TOML server config; flags below override it
    #[arg(short, long, env = "FLATZONE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:53]
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Disable TCP listener
    #[arg(long)]
    pub no_tcp: bool,

    /// Disable UDP listener
    #[arg(long)]
    pub no_udp: bool,

    /// Clear the authoritative flag in responses
    #[arg(long)]
    pub not_authoritative: bool,

    /// Path to the zone database [default: database.yaml]
    #[arg(short, long, env = "FLATZONE_DB")]
    pub db: Option<PathBuf>,

    /// Upstream server for ANAME lookups [default: 1.1.1.1:53]
    #[arg(short, long)]
    pub upstream: Option<SocketAddr>,
}

impl ServeArgs {
    /// Server config from the config file (if any) with flags applied on top.
    pub fn server_config(&self) -> flatzone_srv::Result<ServerConfig> {
        let base = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(db) = &self.db {
            config.database.clone_from(db);
        }
        if let Some(upstream) = self.upstream {
            config.upstream = upstream;
        }
        config.disable_tcp |= self.no_tcp;
        config.disable_udp |= self.no_udp;
        if self.not_authoritative {
            config.authoritative = false;
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the zone database
    #[arg(short, long, env = "FLATZONE_DB", default_value = flatzone_srv::config::DEFAULT_DATABASE_FILE)]
    pub db: PathBuf,
}
