// src/search/perft.rs

use crate::game::board::Board;
use crate::game::defs::MoveGenType;
use crate::search::transpose::{TableEntry, TranspositionTable};

// ############################
//           PERFT
// ############################

pub const PERFT_TT_ENTRIES: usize = 1 << 16;

/// Memoises the subtree count below a position at a given depth.
#[derive(Clone, Copy, Default)]
pub struct PerftEntry {
    pub hash: u64,
    pub depth: i32,
    pub nodes: u64,
}

impl TableEntry for PerftEntry {
    fn hash(&self) -> u64 {
        self.hash
    }
}

/// Number of leaf positions of the game tree at `depth`.
pub fn perft(board: &mut Board, depth: i32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.get_moves(MoveGenType::All);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut total = 0;
    for m in moves {
        board.make_move(m);
        total += perft(board, depth - 1);
        board.undo_move(m);
    }

    total
}

/// Perft with transposed subtrees served from the table. Only counts from
/// depth 3 upwards are worth remembering.
pub fn perft_with_table(
    board: &mut Board,
    depth: i32,
    tt: &mut TranspositionTable<PerftEntry>,
) -> u64 {
    if depth == 0 {
        return 1;
    }

    let hash = board.hash();
    {
        let (entry, hit) = tt.probe(hash);
        if hit && depth > 2 && entry.depth == depth {
            return entry.nodes;
        }
    }

    let moves = board.get_moves(MoveGenType::All);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut total = 0;
    for m in moves {
        board.make_move(m);
        total += perft_with_table(board, depth - 1, tt);
        board.undo_move(m);
    }

    let (entry, _) = tt.probe(hash);
    if depth >= entry.depth {
        *entry = PerftEntry { hash, depth, nodes: total };
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_one_counts_the_opening_moves() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 10);
    }

    #[test]
    fn perft_two_is_one_hundred() {
        // No first move interferes with the mirrored replies, so depth two
        // is exactly ten times ten.
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 2), 100);
    }

    #[test]
    fn perft_is_reproducible_and_leaves_the_board_intact() {
        let mut board = Board::new();
        let first = perft(&mut board, 3);
        assert_eq!(board, Board::new(), "perft must restore the board");

        let second = perft(&mut board, 3);
        assert_eq!(first, second);
        assert!(first > 100, "the tree keeps branching past depth two");
    }

    #[test]
    fn table_backed_perft_matches_the_plain_count() {
        for depth in 1..=4 {
            let mut plain_board = Board::new();
            let mut table_board = Board::new();
            let mut tt = TranspositionTable::<PerftEntry>::new(PERFT_TT_ENTRIES);

            assert_eq!(
                perft(&mut plain_board, depth),
                perft_with_table(&mut table_board, depth, &mut tt),
                "mismatch at depth {depth}"
            );
        }
    }
}
