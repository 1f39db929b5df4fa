// src/bin/perft.rs

use std::time::Instant;

use los_alamos_chess::game::board::Board;
use los_alamos_chess::search::perft::{perft_with_table, PerftEntry, PERFT_TT_ENTRIES};
use los_alamos_chess::search::transpose::TranspositionTable;

fn main() {
    let max_depth: i32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(5);

    println!("Calculating perft");

    let mut board = Board::new();
    let mut tt = TranspositionTable::<PerftEntry>::new(PERFT_TT_ENTRIES);

    let start = Instant::now();
    for depth in 1..=max_depth {
        let nodes = perft_with_table(&mut board, depth, &mut tt);
        println!(
            "Depth: {:5}, Perft: {:15}, Time taken: {:10}ms",
            depth,
            nodes,
            start.elapsed().as_millis(),
        );
    }
}
