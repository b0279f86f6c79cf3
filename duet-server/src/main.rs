use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use duet_server::bootstrap::run_server;
use duet_server::config::DEFAULT_BIND;
use duet_server::logging::init_tracing;
use duet_server::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "duet-server")]
#[command(about = "Serve Duet rooms over HTTP and WebSocket", long_about = None)]
struct Args {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "DUET_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Comma-separated browser origins allowed by CORS (empty allows any)
    #[arg(long, env = "DUET_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Seconds of inactivity before a room is deleted
    #[arg(long, env = "DUET_ROOM_TTL_SECS", default_value_t = 86_400)]
    room_ttl_secs: u64,

    /// Seconds between expiry sweeps
    #[arg(long, env = "DUET_SWEEP_INTERVAL_SECS", default_value_t = 300)]
    sweep_interval_secs: u64,

    /// Pause before the automatic turn change after a turn-ending guess
    #[arg(long, env = "DUET_TURN_ADVANCE_DELAY_MS", default_value_t = 500)]
    turn_advance_delay_ms: u64,

    /// Optional RNG seed for reproducible room codes and boards
    #[arg(long, env = "DUET_RNG_SEED")]
    rng_seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "DUET_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind: args.bind,
            cors_origins: args.cors_origins,
            room_ttl: Duration::from_secs(args.room_ttl_secs),
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
            turn_advance_delay: Duration::from_millis(args.turn_advance_delay_ms),
            rng_seed: args.rng_seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose, args.log_json)?;
    run_server(ServerConfig::from(args)).await
}
