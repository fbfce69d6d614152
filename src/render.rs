//! Plain-text rendering of a view for the terminal.

use crate::sync::ViewState;
use chrono::{DateTime, Local};
use strictly_connect4::dashboard::{self, Seat};
use strictly_connect4::{Address, Cell, HEIGHT, WIDTH};

/// Renders the game dashboard and board for `local`.
pub fn render_view(view: &ViewState, local: &Address) -> String {
    let snapshot = &view.snapshot;
    let mut out = String::new();

    let outcome = dashboard::outcome(snapshot, local);
    match outcome {
        dashboard::Outcome::InProgress => out.push_str(&format!("Game #{}\n", snapshot.game_id)),
        other => out.push_str(&format!("Game #{} - {}\n", snapshot.game_id, other)),
    }

    let seat = dashboard::seat_of(snapshot, local);
    for (label, address, cell, own) in [
        ("Player 1", &snapshot.player1, Cell::Player1, seat == Seat::Player1),
        ("Player 2", &snapshot.player2, Cell::Player2, seat == Seat::Player2),
    ] {
        let who = if address.is_zero() {
            "Waiting for player...".to_string()
        } else {
            address.short()
        };
        out.push_str(&format!(
            "{}{}: {} ({} pieces)\n",
            label,
            if own { " (You)" } else { "" },
            who,
            snapshot.board.count_for_player(cell)
        ));
    }

    out.push_str(&format!(
        "Status: {} | Total moves: {}\n",
        dashboard::turn_status(snapshot, local),
        snapshot.board.piece_count()
    ));
    if let Some(at) = DateTime::from_timestamp(snapshot.last_move_timestamp, 0) {
        out.push_str(&format!(
            "Last move: {}\n",
            at.with_timezone(&Local).format("%H:%M:%S")
        ));
    }

    if snapshot.is_active {
        if view.timeout_available {
            out.push_str("Timeout: claim available\n");
        } else {
            let used = dashboard::timeout_progress(view.time_remaining, snapshot.timeout_duration);
            out.push_str(&format!(
                "Time until timeout: {} [{}]{}\n",
                dashboard::format_countdown(view.time_remaining),
                progress_bar(used, 20),
                if dashboard::is_urgent(view.time_remaining) { " !" } else { "" }
            ));
        }
    }

    out.push('\n');
    out.push_str(&render_board(view));
    out
}

/// Renders the board, marking the winning line with `*` and the newest
/// piece's column with `v`.
pub fn render_board(view: &ViewState) -> String {
    let board = &view.snapshot.board;
    let line = view.winning_line.unwrap_or_default();
    let mut out = String::new();

    if let Some(col) = view.changed_column() {
        out.push_str(&" ".repeat(col * 3 + 1));
        out.push_str("v\n");
    }
    for row in (0..HEIGHT).rev() {
        for col in 0..WIDTH {
            let index = row * WIDTH + col;
            let symbol = match board.cells()[index] {
                Cell::Empty => '.',
                Cell::Player1 => 'X',
                Cell::Player2 => 'O',
            };
            let mark = if view.winning_line.is_some() && line.contains(&index) {
                '*'
            } else {
                ' '
            };
            out.push_str(&format!(" {}{}", symbol, mark));
        }
        out.push('\n');
    }
    for col in 0..WIDTH {
        out.push_str(&format!(" {} ", col));
    }
    out.push('\n');
    out
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::reconcile;
    use strictly_connect4::{Board, GameId, GameSnapshot};

    fn finished_view() -> ViewState {
        let board = Board::with_pieces([3, 10, 17, 24].map(|i| (i, Cell::Player1))).unwrap();
        let snapshot = GameSnapshot {
            game_id: GameId::new(7),
            player1: Address::new("0x1111111111111111111111111111111111111111"),
            player2: Address::new("0x2222222222222222222222222222222222222222"),
            current_player: Address::new("0x2222222222222222222222222222222222222222"),
            winner: Address::new("0x1111111111111111111111111111111111111111"),
            board,
            is_active: false,
            last_move_timestamp: 1_700_000_000,
            timeout_duration: 60,
        };
        reconcile(None, snapshot, 1_700_000_010).view
    }

    #[test]
    fn test_render_marks_winning_line() {
        let text = render_board(&finished_view());
        assert_eq!(text.matches('*').count(), 4);
        assert!(text.starts_with("          v\n"));
    }

    #[test]
    fn test_render_view_headline() {
        let local = Address::new("0x1111111111111111111111111111111111111111");
        let text = render_view(&finished_view(), &local);
        assert!(text.starts_with("Game #7 - You Won!\n"));
        assert!(text.contains("Player 1 (You): 0x1111...1111 (4 pieces)"));
        assert!(text.contains("Status: Game Ended"));
        assert!(!text.contains("Time until timeout"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "----");
        assert_eq!(progress_bar(0.5, 4), "##--");
        assert_eq!(progress_bar(1.0, 4), "####");
    }
}
