//! Polling reconciliation of a watched game.
//!
//! The ledger cannot push changes, so a watched game is re-read on a fixed
//! interval. Each snapshot is folded into a fresh [`ViewState`], and a
//! faster local tick keeps the move countdown moving between reads.
//!
//! One spawned task owns both timers for one game. The task holds at most
//! one fetch future at a time, and ticks never touch the network.

mod event;
mod view;

pub use event::SyncEvent;
pub use view::{Reconciliation, ViewState, reconcile};

use crate::clock::{Clock, SystemClock};
use crate::ledger::LedgerReader;
use crate::{LedgerConfig, LedgerError, SyncError};
use futures::future::{BoxFuture, FutureExt, OptionFuture};
use std::sync::Arc;
use std::time::Duration;
use strictly_connect4::{GameId, GameSnapshot};
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SyncPhase {
    /// No game is watched.
    Idle,
    /// A game is watched but no snapshot has arrived yet.
    Syncing,
    /// A snapshot is held and both timers are running.
    Synced,
}

/// Externally visible state, replaced wholesale on every change.
#[derive(Debug, Clone)]
pub struct SyncState {
    /// Current phase.
    pub phase: SyncPhase,
    /// Watched game, if any.
    pub game_id: Option<GameId>,
    /// Latest view; `None` until the first snapshot arrives.
    pub view: Option<Arc<ViewState>>,
}

impl SyncState {
    fn idle() -> Self {
        Self {
            phase: SyncPhase::Idle,
            game_id: None,
            view: None,
        }
    }
}

/// Watches one game at a time by polling a [`LedgerReader`].
pub struct PollingSynchronizer<R: ?Sized> {
    reader: Arc<R>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    tick_interval: Duration,
    state_tx: watch::Sender<SyncState>,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
    active: Option<WatchHandle>,
}

/// Resources owned by one watch; dropped together on unwatch.
struct WatchHandle {
    task: JoinHandle<()>,
    refresh: Arc<Notify>,
}

impl<R> PollingSynchronizer<R>
where
    R: LedgerReader + ?Sized + 'static,
{
    /// Creates an idle synchronizer and the receiver for its events.
    #[instrument(skip(reader, clock))]
    pub fn new(
        reader: Arc<R>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
        tick_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(SyncState::idle());
        let sync = Self {
            reader,
            clock,
            poll_interval,
            tick_interval,
            state_tx,
            event_tx,
            active: None,
        };
        (sync, event_rx)
    }

    /// Creates a synchronizer using configured intervals and the system clock.
    #[instrument(skip(reader, config))]
    pub fn from_config(
        reader: Arc<R>,
        config: &LedgerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        Self::new(
            reader,
            Arc::new(SystemClock),
            config.poll_interval(),
            config.tick_interval(),
        )
    }

    /// Starts watching `game_id`, replacing any game already watched.
    ///
    /// The previous game's timers are stopped before the new ones start. The
    /// first fetch is issued immediately.
    #[instrument(skip(self))]
    pub async fn watch(&mut self, game_id: GameId) {
        self.unwatch().await;
        info!("Watching game");
        self.state_tx.send_replace(SyncState {
            phase: SyncPhase::Syncing,
            game_id: Some(game_id),
            view: None,
        });

        let poller = Poller {
            game_id,
            reader: Arc::clone(&self.reader),
            clock: Arc::clone(&self.clock),
            state_tx: self.state_tx.clone(),
            event_tx: self.event_tx.clone(),
            view: None,
        };
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(poller.run(
            self.poll_interval,
            self.tick_interval,
            Arc::clone(&refresh),
        ));
        self.active = Some(WatchHandle { task, refresh });
    }

    /// Stops watching and returns to idle.
    ///
    /// Both timers are gone when this returns; no fetch or tick runs after it.
    #[instrument(skip(self))]
    pub async fn unwatch(&mut self) {
        if let Some(WatchHandle { task, .. }) = self.active.take() {
            task.abort();
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => debug!("Polling task cancelled"),
                Err(e) => warn!(error = %e, "Polling task failed"),
            }
            info!("Stopped watching");
        }
        self.state_tx.send_replace(SyncState::idle());
    }

    /// Asks for a fetch ahead of schedule, e.g. right after submitting a move.
    ///
    /// Ignored while idle. If a fetch is already in flight the refresh runs
    /// once it settles. A pending request ends with the watch it was made for.
    pub fn request_refresh(&self) {
        if let Some(active) = &self.active {
            active.refresh.notify_one();
        }
    }

    /// Latest published view.
    pub fn view(&self) -> Option<Arc<ViewState>> {
        self.state_tx.borrow().view.clone()
    }

    /// Latest view, or [`SyncError::NotWatching`] when nothing is held.
    pub fn require_view(&self) -> Result<Arc<ViewState>, SyncError> {
        self.view().ok_or(SyncError::NotWatching)
    }

    /// Current phase.
    pub fn phase(&self) -> SyncPhase {
        self.state_tx.borrow().phase
    }

    /// Watched game, if any.
    pub fn game_id(&self) -> Option<GameId> {
        self.state_tx.borrow().game_id
    }

    /// Receiver that observes every state replacement.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state_tx.subscribe()
    }
}

impl<R: ?Sized> Drop for PollingSynchronizer<R> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
        }
    }
}

/// State owned by the polling task of one watched game.
struct Poller<R: ?Sized> {
    game_id: GameId,
    reader: Arc<R>,
    clock: Arc<dyn Clock>,
    state_tx: watch::Sender<SyncState>,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
    view: Option<Arc<ViewState>>,
}

impl<R> Poller<R>
where
    R: LedgerReader + ?Sized + 'static,
{
    async fn run(mut self, poll_interval: Duration, tick_interval: Duration, refresh: Arc<Notify>) {
        let mut fetch_timer = time::interval(poll_interval);
        fetch_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick_timer = time::interval_at(Instant::now() + tick_interval, tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<BoxFuture<'static, Result<GameSnapshot, LedgerError>>> = None;

        loop {
            tokio::select! {
                _ = fetch_timer.tick(), if in_flight.is_none() => {
                    in_flight = Some(self.start_fetch());
                }
                _ = refresh.notified(), if in_flight.is_none() => {
                    debug!("Refresh requested");
                    fetch_timer.reset();
                    in_flight = Some(self.start_fetch());
                }
                Some(result) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                    in_flight = None;
                    self.on_fetch(result);
                }
                _ = tick_timer.tick() => {
                    self.on_tick();
                }
            }
        }
    }

    fn start_fetch(&self) -> BoxFuture<'static, Result<GameSnapshot, LedgerError>> {
        debug!(game_id = %self.game_id, "Fetching snapshot");
        let reader = Arc::clone(&self.reader);
        let game_id = self.game_id;
        async move { reader.get_game_state(game_id).await }.boxed()
    }

    #[instrument(skip_all, fields(game_id = %self.game_id))]
    fn on_fetch(&mut self, result: Result<GameSnapshot, LedgerError>) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(source) => {
                warn!(error = %source, "Snapshot fetch failed, keeping previous view");
                self.emit(SyncEvent::FetchFailed(SyncError::FetchFailed {
                    game_id: Some(self.game_id),
                    source,
                }));
                return;
            }
        };

        let now = self.clock.now();
        let Reconciliation {
            view,
            new_piece,
            became_terminal,
        } = reconcile(self.view.as_deref(), snapshot, now);
        let view = Arc::new(view);
        self.publish(Arc::clone(&view));

        if let Some(piece) = new_piece {
            info!(index = piece.index, column = piece.column(), "New piece");
            self.emit(SyncEvent::NewPiece {
                game_id: self.game_id,
                index: piece.index,
                column: piece.column(),
            });
        }
        if became_terminal {
            let winner = view.snapshot.winner().cloned();
            info!(winner = ?winner, winning_line = ?view.winning_line, "Game over");
            self.emit(SyncEvent::Terminal {
                game_id: self.game_id,
                winning_line: view.winning_line,
                winner,
            });
        }
    }

    fn on_tick(&mut self) {
        if let Some(view) = &self.view {
            let next = Arc::new(view.tick(self.clock.now()));
            self.publish(next);
        }
    }

    fn publish(&mut self, view: Arc<ViewState>) {
        self.view = Some(Arc::clone(&view));
        self.state_tx.send_replace(SyncState {
            phase: SyncPhase::Synced,
            game_id: Some(self.game_id),
            view: Some(view),
        });
    }

    fn emit(&self, event: SyncEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}
