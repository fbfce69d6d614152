//! Strictly Ledger - Unified CLI
//!
//! Watch, join and play ledger-hosted Connect Four games.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_connect4::{Address, Column, GameId, GameSnapshot};
use strictly_ledger::clock::{Clock, SystemClock};
use strictly_ledger::render::render_view;
use strictly_ledger::sync::reconcile;
use strictly_ledger::{
    ActionDispatcher, HttpLedgerClient, LedgerConfig, LedgerReader, PollingSynchronizer,
    SyncEvent, ViewState,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = LedgerConfig::from_file(&cli.config)?;
    let client = Arc::new(HttpLedgerClient::from_config(&config)?);

    match cli.command {
        Command::Watch { game_id } => run_watch(client, &config, GameId::new(game_id)).await,
        Command::Lobby => run_lobby(client, &config).await,
        Command::Info { game_id } => run_info(client, &config, GameId::new(game_id)).await,
        Command::Create { timeout } => {
            let dispatcher = dispatcher(client, &config)?;
            let game_id = dispatcher
                .create_game(timeout.unwrap_or(*config.default_timeout_secs()))
                .await?;
            println!("Created game #{}", game_id);
            Ok(())
        }
        Command::Join { game_id } => {
            dispatcher(client, &config)?
                .join_game(GameId::new(game_id))
                .await?;
            println!("Joined game #{}", game_id);
            Ok(())
        }
        Command::AutoMatch { timeout } => {
            let dispatcher = dispatcher(client, &config)?;
            let game_id = dispatcher
                .auto_matchmaking(timeout.unwrap_or(*config.default_timeout_secs()))
                .await?;
            println!("Playing game #{}", game_id);
            Ok(())
        }
        Command::Move { game_id, column } => {
            let column = Column::new(usize::from(column))?;
            run_move(client, &config, GameId::new(game_id), column).await
        }
        Command::ClaimTimeout { game_id } => {
            run_claim_timeout(client, &config, GameId::new(game_id)).await
        }
        Command::Cleanup => {
            dispatcher(client, &config)?.cleanup_timed_out_games().await?;
            println!("Timed-out games settled");
            Ok(())
        }
    }
}

fn dispatcher(
    client: Arc<HttpLedgerClient>,
    config: &LedgerConfig,
) -> Result<ActionDispatcher<HttpLedgerClient>> {
    let local = config.require_account()?.clone();
    Ok(ActionDispatcher::new(client, local))
}

/// Fetches one snapshot and derives a view as of now.
async fn current_view(client: &HttpLedgerClient, game_id: GameId) -> Result<ViewState> {
    let snapshot: GameSnapshot = client.get_game_state(game_id).await?;
    Ok(reconcile(None, snapshot, SystemClock.now()).view)
}

/// Follow a game until it ends or Ctrl-C.
#[instrument(skip(client, config))]
async fn run_watch(
    client: Arc<HttpLedgerClient>,
    config: &LedgerConfig,
    game_id: GameId,
) -> Result<()> {
    let local = config.account().clone().unwrap_or_else(Address::zero);
    let (mut sync, mut events) = PollingSynchronizer::from_config(client, config);
    let mut state = sync.subscribe();
    sync.watch(game_id).await;

    let mut rendered: Option<Arc<GameSnapshot>> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = state.borrow_and_update().view.clone();
                if let Some(view) = view {
                    let fresh = rendered
                        .as_ref()
                        .is_none_or(|shown| !Arc::ptr_eq(shown, &view.snapshot));
                    if fresh {
                        println!("{}", render_view(&view, &local));
                        rendered = Some(Arc::clone(&view.snapshot));
                    }
                }
            }
            Some(event) = events.recv() => match event {
                SyncEvent::NewPiece { column, .. } => println!("New piece in column {}", column),
                SyncEvent::Terminal { winner, .. } => {
                    match winner {
                        Some(winner) => println!("Game over, winner {}", winner.short()),
                        None => println!("Game over, draw"),
                    }
                    match sync.require_view() {
                        Ok(view) => println!("{}", render_view(&view, &local)),
                        Err(e) => warn!(error = %e, "No view to show"),
                    }
                    break;
                }
                SyncEvent::FetchFailed(e) => warn!(error = %e, "Poll failed, retrying"),
            },
        }
    }

    sync.unwatch().await;
    Ok(())
}

#[instrument(skip(client, config))]
async fn run_lobby(client: Arc<HttpLedgerClient>, config: &LedgerConfig) -> Result<()> {
    let local = config.account().clone().unwrap_or_else(Address::zero);
    let games = ActionDispatcher::new(client, local).available_games().await?;
    if games.is_empty() {
        println!("No games waiting for an opponent");
    }
    for game_id in games {
        println!("Game #{}", game_id);
    }
    Ok(())
}

#[instrument(skip(client, config))]
async fn run_info(
    client: Arc<HttpLedgerClient>,
    config: &LedgerConfig,
    game_id: GameId,
) -> Result<()> {
    let snapshot = client.get_game_state(game_id).await?;
    let local = config.account().clone().unwrap_or_else(Address::zero);
    let info = ActionDispatcher::new(client, local)
        .game_info(&snapshot)
        .await?;
    println!("{}", info);
    Ok(())
}

#[instrument(skip(client, config))]
async fn run_move(
    client: Arc<HttpLedgerClient>,
    config: &LedgerConfig,
    game_id: GameId,
    column: Column,
) -> Result<()> {
    let view = current_view(&client, game_id).await?;
    let dispatcher = dispatcher(Arc::clone(&client), config)?;
    dispatcher.submit_move(&view, column).await?;
    info!("Move accepted");

    let view = current_view(&client, game_id).await?;
    println!("{}", render_view(&view, dispatcher.local()));
    Ok(())
}

#[instrument(skip(client, config))]
async fn run_claim_timeout(
    client: Arc<HttpLedgerClient>,
    config: &LedgerConfig,
    game_id: GameId,
) -> Result<()> {
    let view = current_view(&client, game_id).await?;
    dispatcher(client, config)?.claim_timeout(&view).await?;
    println!("Timeout claimed for game #{}", game_id);
    Ok(())
}
