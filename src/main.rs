use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskpad::db::connection;
use taskpad::http::{self, AppState};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskpad",
    version = VERSION,
    about = "Task manager REST API (CRUD + status lifecycle over /api/tasks)"
)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Path to the SQLite database file (created on first run)
    #[arg(long, default_value = "taskpad.db")]
    db: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskpad=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let conn = connection::open(&cli.db)
        .with_context(|| format!("open database at {}", cli.db.display()))?;
    let state = AppState::new(conn);

    let listener = TcpListener::bind(("0.0.0.0", cli.port))
        .await
        .with_context(|| format!("bind port {}", cli.port))?;
    info!(addr = %listener.local_addr()?, db = %cli.db.display(), "taskpad listening");

    http::serve(listener, state).await?;
    Ok(())
}
