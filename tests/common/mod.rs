//! Scripted in-memory ledger shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use strictly_connect4::{Address, Board, Cell, Column, GameId, GameSnapshot};
use strictly_ledger::{LedgerError, LedgerReader, LedgerWriter};

pub const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
pub const BOB: &str = "0xb0b0000000000000000000000000000000000002";

/// Active game between Alice and Bob with Alice to move.
pub fn snapshot(game_id: u64, board: Board) -> GameSnapshot {
    GameSnapshot {
        game_id: GameId::new(game_id),
        player1: Address::new(ALICE),
        player2: Address::new(BOB),
        current_player: Address::new(ALICE),
        winner: Address::zero(),
        board,
        is_active: true,
        last_move_timestamp: 1_000,
        timeout_duration: 60,
    }
}

/// Board holding player one's pieces at `indices`.
pub fn board_with(indices: &[usize]) -> Board {
    Board::with_pieces(indices.iter().map(|&i| (i, Cell::Player1))).expect("board")
}

/// Ledger that replays queued read results, then repeats the last snapshot.
///
/// Snapshots are re-labelled with the requested game id so one script can
/// serve several watched games.
#[derive(Debug, Default)]
pub struct ScriptedLedger {
    script: Mutex<VecDeque<Result<GameSnapshot, LedgerError>>>,
    last: Mutex<Option<GameSnapshot>>,
    fetched: Mutex<Vec<GameId>>,
    writes: Mutex<Vec<String>>,
    write_error: Mutex<Option<LedgerError>>,
    info: Mutex<String>,
    answered_reads: Mutex<Option<usize>>,
}

impl ScriptedLedger {
    pub fn new(script: Vec<Result<GameSnapshot, LedgerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn push(&self, result: Result<GameSnapshot, LedgerError>) {
        self.script.lock().expect("script lock").push_back(result);
    }

    /// Reads after the first `count` never complete.
    pub fn stall_after(&self, count: usize) {
        *self.answered_reads.lock().expect("answered reads lock") = Some(count);
    }

    pub fn fail_writes(&self, error: LedgerError) {
        *self.write_error.lock().expect("write error lock") = Some(error);
    }

    pub fn set_info(&self, info: &str) {
        *self.info.lock().expect("info lock") = info.to_string();
    }

    pub fn fetched(&self) -> Vec<GameId> {
        self.fetched.lock().expect("fetched lock").clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }

    fn record(&self, write: String) -> Result<(), LedgerError> {
        if let Some(error) = self.write_error.lock().expect("write error lock").clone() {
            return Err(error);
        }
        self.writes.lock().expect("writes lock").push(write);
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for ScriptedLedger {
    async fn get_game_state(&self, game_id: GameId) -> Result<GameSnapshot, LedgerError> {
        let stalled = {
            let mut fetched = self.fetched.lock().expect("fetched lock");
            fetched.push(game_id);
            let answered = *self.answered_reads.lock().expect("answered reads lock");
            answered.is_some_and(|n| fetched.len() > n)
        };
        if stalled {
            std::future::pending::<()>().await;
        }
        let next = self.script.lock().expect("script lock").pop_front();
        let mut last = self.last.lock().expect("last lock");
        match next {
            Some(Ok(snapshot)) => *last = Some(snapshot),
            Some(Err(error)) => return Err(error),
            None => {}
        }
        let mut snapshot = last
            .clone()
            .ok_or_else(|| LedgerError::transport("script exhausted"))?;
        snapshot.game_id = game_id;
        Ok(snapshot)
    }

    async fn get_game_info(&self, _game_id: GameId) -> Result<String, LedgerError> {
        Ok(self.info.lock().expect("info lock").clone())
    }

    async fn get_available_games(&self) -> Result<Vec<GameId>, LedgerError> {
        Ok(vec![GameId::new(4), GameId::new(9)])
    }
}

#[async_trait]
impl LedgerWriter for ScriptedLedger {
    async fn create_game(&self, timeout_secs: i64) -> Result<GameId, LedgerError> {
        self.record(format!("create {}", timeout_secs))?;
        Ok(GameId::new(11))
    }

    async fn join_game(&self, game_id: GameId) -> Result<(), LedgerError> {
        self.record(format!("join {}", game_id))
    }

    async fn auto_matchmaking(&self, timeout_secs: i64) -> Result<GameId, LedgerError> {
        self.record(format!("match {}", timeout_secs))?;
        Ok(GameId::new(12))
    }

    async fn make_move(&self, game_id: GameId, column: Column) -> Result<(), LedgerError> {
        self.record(format!("move {} {}", game_id, column))
    }

    async fn check_timeout(&self, game_id: GameId) -> Result<(), LedgerError> {
        self.record(format!("timeout {}", game_id))
    }

    async fn cleanup_timed_out_games(&self) -> Result<(), LedgerError> {
        self.record("cleanup".to_string())
    }
}
