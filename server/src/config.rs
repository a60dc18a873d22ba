//! Command-line and environment configuration for the server binary.

use std::net::SocketAddr;

use clap::Parser;

/// In-memory todo API.
#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(about = "In-memory todo API serving GET/POST/PUT/DELETE /todos")]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Start with no records instead of the seed set
    #[arg(long, env = "TODO_EMPTY", default_value_t = false)]
    pub empty: bool,
}

impl Args {
    pub fn listen_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
