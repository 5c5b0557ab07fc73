//! Kitchen / waiter terminal monitor

mod config;
mod logger;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use comanda_client::{
    ConnectionState, JsonFileStore, NotificationListener, OrderId, OrderState, RestClient,
    Session, SessionStore, StopReason, WsFrameSource,
};

use crate::config::MonitorConfig;

#[derive(Parser)]
#[command(name = "comanda-monitor")]
#[command(about = "Live order queues for kitchen and waiter staff")]
#[command(long_about = None)]
struct Cli {
    /// Backend REST URL (overrides COMANDA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides COMANDA_STATE_FILE)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Log filter (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        /// Password (or COMANDA_PASSWORD)
        #[arg(env = "COMANDA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Follow the live order queues until Ctrl-C
    Watch,

    /// Move an order forward (preparando, terminado, entregado or 1-4)
    Advance {
        order_id: String,
        state: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = MonitorConfig::from_env()?.with_overrides(
        cli.api_url,
        cli.state_file,
        cli.log_level,
    );
    logger::init_logger(&config.log_level, config.log_dir.as_deref())?;

    let sessions = SessionStore::new(
        JsonFileStore::open(&config.state_file)
            .with_context(|| format!("opening {}", config.state_file.display()))?,
    );

    match cli.cmd {
        Commands::Login { email, password } => login(&config, &sessions, &email, &password).await,
        Commands::Logout => {
            sessions.clear()?;
            tracing::info!("Session cleared");
            Ok(())
        }
        Commands::Watch => watch(&config, &sessions).await,
        Commands::Advance { order_id, state } => {
            advance(&config, &sessions, &order_id, &state).await
        }
    }
}

async fn login(
    config: &MonitorConfig,
    sessions: &SessionStore<JsonFileStore>,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut rest = RestClient::new(&config.client)?;
    let resp = rest.login(email, password).await.context("login failed")?;
    let session = Session::from(resp);
    sessions.save(&session)?;
    println!(
        "Logged in as {} ({}) for restaurant {}",
        session.user_name.as_deref().unwrap_or(email),
        session.role,
        session.restaurant_id
    );
    Ok(())
}

fn require_session(sessions: &SessionStore<JsonFileStore>) -> Result<Session> {
    match sessions.load()? {
        Some(session) => Ok(session),
        None => bail!("not logged in, run `comanda-monitor login` first"),
    }
}

async fn watch(config: &MonitorConfig, sessions: &SessionStore<JsonFileStore>) -> Result<()> {
    let session = require_session(sessions)?;
    if !session.role.watches_orders() {
        tracing::warn!(role = %session.role, "Role has no live queue, showing both");
    }

    let rest = RestClient::new(&config.client)?.with_token(session.token.clone());
    let source = WsFrameSource::new().with_token(session.token.clone());
    let Some(listener) = NotificationListener::from_session(
        sessions,
        &config.client.ws_base()?,
        source,
        Arc::new(rest),
        config.client.reconnect.clone(),
    )?
    else {
        bail!("session vanished before the listener started");
    };

    let mut handle = listener.spawn();
    let mut board = handle.board();
    let mut state = handle.state();
    let Some(mut alerts) = handle.take_alerts() else {
        bail!("alert channel already taken");
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl-C received, stopping");
                break;
            }
            Ok(()) = board.changed() => {
                let snapshot = board.borrow_and_update().clone();
                for line in report::board_lines(&snapshot, session.role) {
                    println!("{line}");
                }
            }
            Ok(()) = state.changed() => {
                let current = state.borrow_and_update().clone();
                tracing::info!(state = %current, "Connection");
                if current == ConnectionState::Stopped(StopReason::RetriesExhausted) {
                    break;
                }
            }
            Some(alert) = alerts.recv() => {
                println!(">>> {alert}");
            }
        }
    }

    handle.stop().await?;
    Ok(())
}

async fn advance(
    config: &MonitorConfig,
    sessions: &SessionStore<JsonFileStore>,
    order_id: &str,
    state: &str,
) -> Result<()> {
    let session = require_session(sessions)?;
    let next: OrderState = state
        .parse()
        .with_context(|| format!("unknown state {state:?}"))?;

    let rest = RestClient::new(&config.client)?.with_token(session.token);
    let id = OrderId::new(order_id);
    let order = rest.get_order(&id).await?;
    let updated = rest.update_order_state(&id, order.state, next).await?;
    println!("Order {} is now {}", updated.id, updated.state);
    Ok(())
}
