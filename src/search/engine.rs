// src/search/engine.rs

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::game::board::Board;
use crate::game::defs::{Color, Move, MoveGenType};
use crate::search::search::{search, SearchData};

// ############################
//        CONSOLE PLAY
// ############################

// Self-play games without a fifty-move rule need a backstop.
const MAX_PLIES: usize = 300;

fn print_search_line(data: &SearchData) {
    println!(
        "{:6} {:>6} {:>8} {:>13} {:>9}ms",
        data.depth,
        data.best_move.to_string(),
        data.score,
        data.nodes_searched,
        data.time_taken.as_millis(),
    );
}

/// Match a coordinate string (`b1b3`, `a5a6=Q`) against the legal moves.
pub fn parse_move(board: &Board, input: &str) -> Option<Move> {
    board
        .get_moves(MoveGenType::All)
        .into_iter()
        .find(|&m| board.move_to_string(m) == input)
}

fn game_over(board: &Board) -> bool {
    if board.get_moves(MoveGenType::All).is_empty() {
        if board.in_check() {
            let winner = if board.player_to_move() == Color::White { "Black" } else { "White" };
            println!("Checkmate! {winner} wins.");
        } else {
            println!("Stalemate.");
        }
        return true;
    }
    if board.is_draw() {
        println!("Draw by repetition.");
        return true;
    }
    false
}

/// Human plays white from stdin; the engine answers on a time budget.
pub fn run_game(time_per_move: Duration) -> Result<()> {
    let mut board = Board::new();
    let mut played: Vec<Move> = Vec::new();

    loop {
        println!("{board}");
        if game_over(&board) {
            break;
        }

        if board.player_to_move() == Color::Black {
            let best = search(&mut board, time_per_move, |data| print_search_line(data));
            println!("Engine plays {}.", board.move_to_string(best));
            board.make_move(best);
            played.push(best);
            continue;
        }

        let decision = input("Your move (e.g. b1b3, a5a6=Q, or 'undo'): ")?;

        if decision.eq_ignore_ascii_case("undo") {
            // Take back the engine's reply and the player's move.
            for _ in 0..2 {
                if let Some(m) = played.pop() {
                    board.undo_move(m);
                }
            }
            continue;
        }

        match parse_move(&board, &decision) {
            Some(m) => {
                board.make_move(m);
                played.push(m);
            }
            None => eprintln!("Illegal or unparseable move: {decision}"),
        }
    }

    Ok(())
}

/// Engine vs engine, both sides on the same time budget.
pub fn run_game_simulated(time_per_move: Duration) {
    let mut board = Board::new();

    for _ in 0..MAX_PLIES {
        println!("{board}");
        if game_over(&board) {
            return;
        }

        let side = if board.player_to_move() == Color::White { "White" } else { "Black" };
        let best = search(&mut board, time_per_move, |_| {});
        println!("{side} plays {}.", board.move_to_string(best));
        board.make_move(best);
    }

    println!("Game adjourned after {MAX_PLIES} plies.");
}

fn input(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut buffer = String::new();
    io::stdin()
        .read_line(&mut buffer)
        .context("failed to read a move from stdin")?;

    Ok(buffer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_move_round_trips_every_legal_move() {
        let board = Board::new();
        for m in board.get_moves(MoveGenType::All) {
            let s = board.move_to_string(m);
            assert_eq!(parse_move(&board, &s), Some(m));
        }
    }

    #[test]
    fn parse_move_rejects_garbage_and_illegal_moves() {
        let board = Board::new();
        assert_eq!(parse_move(&board, "zz99"), None);
        assert_eq!(parse_move(&board, ""), None);
        // A rook can't move through its own pawn at the start.
        assert_eq!(parse_move(&board, "a1a3"), None);
    }
}
