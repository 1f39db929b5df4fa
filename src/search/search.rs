// src/search/search.rs

use std::time::{Duration, Instant};

use crate::game::board::Board;
use crate::game::defs::{Move, MoveGenType};
use crate::game::eval::MATE_SCORE;
use crate::search::transpose::{TableEntry, TranspositionTable};

// ############################
//        SEARCH LIMITS
// ############################

const TT_ENTRIES: usize = 1 << 21;
const MAX_EXTENSIONS: i32 = 3;
const QUIESCENCE_DEPTH: i32 = 3;

// Reverse futility margins, indexed by remaining depth.
const FUTILITY_MARGINS: [i32; 4] = [0, 0, 100, 200];

// ############################
//         SEARCH DATA
// ############################

/// Reported through the callback once per fully completed depth.
#[derive(Debug, Clone, Copy)]
pub struct SearchData {
    pub depth: i32,
    pub score: i32,
    pub best_move: Move,
    pub nodes_searched: u64,
    pub time_taken: Duration,
}

#[derive(Clone, Copy, Default)]
struct SearchEntry {
    hash: u64,
    depth: i32,
    score: i32,
    hash_move: Move,
}

impl TableEntry for SearchEntry {
    fn hash(&self) -> u64 {
        self.hash
    }
}

// ############################
//          SEARCHER
// ############################

struct Searcher {
    tt: TranspositionTable<SearchEntry>,
    end_time: Instant,
    nodes_searched: u64,
}

/// Hash move first, then captures, then quiet moves; generation order is
/// preserved inside each bucket.
fn order_moves(moves: &mut [Move], hash_move: Move) {
    moves.sort_by_key(|&m| {
        if m == hash_move {
            0
        } else if m.is_capture() {
            1
        } else {
            2
        }
    });
}

impl Searcher {
    #[inline]
    fn in_time(&self) -> bool {
        Instant::now() < self.end_time
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ply: i32,
        num_extensions: i32,
    ) -> i32 {
        // Out of time: the caller discards the subtree, the value is moot.
        if !self.in_time() {
            return 0;
        }

        if depth == 0 {
            // Don't stand pat while in check; extend a little instead.
            if board.in_check() && num_extensions < MAX_EXTENSIONS {
                return self.negamax(board, 1, alpha, beta, ply, num_extensions + 1);
            }
            return self.quiesce(board, QUIESCENCE_DEPTH, alpha, beta);
        }

        let in_check = board.in_check();

        // Null move pruning: if passing the turn still beats beta after a
        // reduced search, a real move will too.
        if depth > 3 && !in_check && board.score() >= beta {
            board.make_null_move();
            let score = -self.negamax(board, depth - 4, -beta, -alpha, ply + 1, num_extensions);
            board.undo_null_move();
            if score >= beta {
                return beta;
            }
        }

        // Reverse futility pruning at shallow depths.
        if depth < 4 && !in_check && board.score() > beta + FUTILITY_MARGINS[depth as usize] {
            return beta;
        }

        let hash = board.hash();
        let mut hash_move = Move::default();
        {
            let (entry, hit) = self.tt.probe(hash);
            if hit {
                hash_move = entry.hash_move;
                if entry.depth >= depth && entry.score > alpha {
                    alpha = entry.score;
                }
            }
        }

        let mut moves = board.get_moves(MoveGenType::All);
        if moves.is_empty() {
            // Checkmate, or a dead position (stalemate / repetition).
            // Nearer mates outscore distant ones.
            return if in_check { -MATE_SCORE + ply } else { 0 };
        }

        order_moves(&mut moves, hash_move);

        let mut best_score = -MATE_SCORE;
        let mut best_move = moves[0];

        for &m in &moves {
            board.make_move(m);
            let score = -self.negamax(board, depth - 1, -beta, -alpha, ply + 1, num_extensions);
            board.undo_move(m);

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                break;
            }
        }

        // Depth-preferred replacement; never store a timed-out result.
        if self.in_time() {
            let (entry, _) = self.tt.probe(hash);
            if depth >= entry.depth {
                *entry = SearchEntry { hash, depth, score: alpha, hash_move: best_move };
            }
        }

        best_score
    }

    fn quiesce(&mut self, board: &mut Board, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return board.score();
        }

        let stand_pat = board.score();
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        // In check every move matters; otherwise only captures and
        // promotions can beat standing pat.
        let gen = if board.in_check() { MoveGenType::All } else { MoveGenType::Dynamic };
        for m in board.get_moves(gen) {
            board.make_move(m);
            let score = -self.quiesce(board, depth - 1, -beta, -alpha);
            board.undo_move(m);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

// ############################
//       BLOCKING SEARCH
// ############################

/// Iteratively deepen until the timeout passes, invoking the callback after
/// every fully completed depth. Returns the best move of the last completed
/// depth; partially searched depths are discarded. Requires at least one
/// legal move.
pub fn search(
    board: &mut Board,
    timeout: Duration,
    mut callback: impl FnMut(&SearchData),
) -> Move {
    let start_time = Instant::now();
    let mut searcher = Searcher {
        tt: TranspositionTable::new(TT_ENTRIES),
        end_time: start_time + timeout,
        nodes_searched: 0,
    };

    let moves = board.get_moves(MoveGenType::All);
    assert!(!moves.is_empty(), "search requires at least one legal move");

    let mut best_move = moves[0];
    let mut depth = 1;

    while searcher.in_time() {
        searcher.nodes_searched = 0;

        let mut best_score_at_depth = -MATE_SCORE;
        let mut best_move_at_depth = moves[0];

        for &m in &moves {
            if !searcher.in_time() {
                break;
            }

            board.make_move(m);
            let score = -searcher.negamax(board, depth - 1, -MATE_SCORE, MATE_SCORE, 1, 0);
            board.undo_move(m);

            if score > best_score_at_depth {
                best_score_at_depth = score;
                best_move_at_depth = m;
            }
        }

        // Only a depth that ran to completion may publish its results.
        if searcher.in_time() {
            best_move = best_move_at_depth;

            let data = SearchData {
                depth,
                score: best_score_at_depth,
                best_move,
                nodes_searched: searcher.nodes_searched,
                time_taken: start_time.elapsed(),
            };
            callback(&data);
        }

        depth += 1;
    }

    best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::defs::{to_padded, Color, PieceType};

    #[test]
    fn search_returns_a_legal_root_move() {
        let mut board = Board::new();
        let legal = board.get_moves(MoveGenType::All);

        let best = search(&mut board, Duration::from_millis(50), |_| {});
        assert!(legal.contains(&best));
        // The search leaves the board exactly as it found it.
        assert_eq!(board, Board::new());
    }

    #[test]
    fn callback_depths_strictly_increase() {
        let mut board = Board::new();
        let mut depths = Vec::new();

        search(&mut board, Duration::from_millis(100), |data| depths.push(data.depth));

        assert!(!depths.is_empty());
        assert!(depths.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(depths[0], 1);
    }

    #[test]
    fn finds_a_mate_in_one() {
        // Rb6 is mate: the rook on a5 seals the fifth rank.
        let mut board = Board::from_pieces(
            &[
                (0, 5, Color::White, PieceType::King),
                (4, 0, Color::White, PieceType::Rook),
                (3, 1, Color::White, PieceType::Rook),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );

        let mut last_score = 0;
        let best = search(&mut board, Duration::from_millis(50), |data| last_score = data.score);

        assert_eq!(best.start(), to_padded(3, 1));
        assert_eq!(best.end(), to_padded(5, 1));
        assert_eq!(board.move_to_string(best), "b4b6");
        assert!(last_score >= MATE_SCORE - 100, "mating line scores in the mate range");
    }

    #[test]
    fn prefers_winning_a_queen_over_a_pawn() {
        // The rook on a3 can take either the hanging queen on a5 or the
        // pawn on f3.
        let mut board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (2, 0, Color::White, PieceType::Rook),
                (4, 0, Color::Black, PieceType::Queen),
                (2, 5, Color::Black, PieceType::PawnBlack),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );

        let best = search(&mut board, Duration::from_millis(100), |_| {});
        assert_eq!(best.start(), to_padded(2, 0));
        assert_eq!(best.end(), to_padded(4, 0));
        assert_eq!(best.captured(), PieceType::Queen);
    }

    #[test]
    fn node_counts_are_reported_per_depth() {
        let mut board = Board::new();
        let mut nodes = Vec::new();

        search(&mut board, Duration::from_millis(100), |data| nodes.push(data.nodes_searched));

        assert!(!nodes.is_empty());
        assert!(nodes.iter().all(|&n| n > 0));
    }

    #[test]
    fn move_ordering_puts_the_hash_move_first() {
        let board = Board::new();
        let mut moves = board.get_moves(MoveGenType::All);
        let chosen = moves[7];

        order_moves(&mut moves, chosen);
        assert_eq!(moves[0], chosen);
        assert_eq!(moves.len(), 10);
    }
}
