use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_server::{config::Args, TodoRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("todo_server={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = args.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let repo = if args.empty {
        TodoRepo::empty()
    } else {
        TodoRepo::seeded()
    };
    info!(%addr, seeded = !args.empty, "listening");
    todo_server::serve(listener, repo).await?;
    Ok(())
}
