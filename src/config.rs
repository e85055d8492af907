//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::chat::SweepConfig;

/// Presence-aware group chat server
#[derive(Parser, Debug, Clone)]
#[command(name = "heartchat")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// sqlite database URL, e.g. sqlite://chat.db
    /// Without one, everything lives in memory and is gone on restart
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Seconds a participant may go without a heartbeat before eviction
    #[arg(long, env = "PARTICIPANT_TTL_SECS", default_value = "10")]
    pub participant_ttl_secs: u64,

    /// Seconds between eviction sweeps
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value = "15")]
    pub sweep_interval_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.participant_ttl_secs == 0 {
            return Err("PARTICIPANT_TTL_SECS must be greater than zero".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("SWEEP_INTERVAL_SECS must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn sweep(&self) -> SweepConfig {
        SweepConfig {
            ttl: Duration::from_secs(self.participant_ttl_secs),
            period: Duration::from_secs(self.sweep_interval_secs),
        }
    }
}
