// src/game/board.rs

use colored::*;
use std::fmt;

use crate::game::defs::{
    square, to_padded, to_padded_index, Color, Move, Piece, PieceType, SquareCode, BOARD_SIDE,
    PADDED_AREA,
};
use crate::game::eval;
use crate::game::keys::KEYS;

// ############################
//         BOARD STATE
// ############################

/// Per-turn state. Completed moves push a new frame and undo pops one, so
/// score, hash and king locations come back without any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoardState {
    pub player_to_move: Color,
    /// Always from the perspective of the side about to move.
    pub score: i32,
    pub hash: u64,
    pub king_locations: [usize; 2],
}

/// A Los Alamos chess position, held as a "letter-box" style padded array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [SquareCode; PADDED_AREA],
    states: Vec<BoardState>,
}

const BACKRANK: [PieceType; BOARD_SIDE] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Queen,
    PieceType::King,
    PieceType::Knight,
    PieceType::Rook,
];

fn place_piece(
    squares: &mut [SquareCode; PADDED_AREA],
    score: &mut i32,
    hash: &mut u64,
    loc: usize,
    color: Color,
    pt: PieceType,
) {
    square::set_piece(&mut squares[loc], pt, color);

    let piece_score = eval::PIECE_SCORES[pt.index()] + eval::SQUARE_SCORES[pt.index()][loc];
    *score += if color == Color::White { piece_score } else { -piece_score };
    *hash ^= KEYS.piece_square_keys[color.index()][pt.index()][loc];
}

fn flag_playable_squares(squares: &mut [SquareCode; PADDED_AREA]) {
    for r in 0..BOARD_SIDE {
        for c in 0..BOARD_SIDE {
            squares[to_padded(r, c)] |= square::ON_BOARD;
        }
    }
}

impl Board {
    /// The standard initial position: RNQKNR back ranks, pawns in front,
    /// kings on the d file.
    pub fn new() -> Self {
        let mut squares = [square::EMPTY; PADDED_AREA];
        flag_playable_squares(&mut squares);

        let mut score = 0;
        let mut hash = KEYS.white_key;

        for c in 0..BOARD_SIDE {
            place_piece(&mut squares, &mut score, &mut hash, to_padded(0, c), Color::White, BACKRANK[c]);
            place_piece(&mut squares, &mut score, &mut hash, to_padded(1, c), Color::White, PieceType::PawnWhite);
            place_piece(&mut squares, &mut score, &mut hash, to_padded(4, c), Color::Black, PieceType::PawnBlack);
            place_piece(&mut squares, &mut score, &mut hash, to_padded(5, c), Color::Black, BACKRANK[c]);
        }

        let state = BoardState {
            player_to_move: Color::White,
            score,
            hash,
            king_locations: [to_padded(0, 3), to_padded(5, 3)],
        };

        Self { squares, states: vec![state] }
    }

    /// Set up an arbitrary position from `(row, col, colour, piece type)`
    /// placements. Both kings must be present exactly once.
    pub fn from_pieces(pieces: &[(usize, usize, Color, PieceType)], player_to_move: Color) -> Self {
        let mut squares = [square::EMPTY; PADDED_AREA];
        flag_playable_squares(&mut squares);

        let mut score = 0;
        let mut hash = 0;
        let mut king_locations = [PADDED_AREA; 2];

        for &(row, col, color, pt) in pieces {
            assert!(row < BOARD_SIDE && col < BOARD_SIDE, "placement off the board");
            assert!(pt != PieceType::None, "placement of an empty piece");
            let loc = to_padded(row, col);
            assert!(
                square::piece_type(squares[loc]) == PieceType::None,
                "two placements on one square"
            );

            place_piece(&mut squares, &mut score, &mut hash, loc, color, pt);
            if pt == PieceType::King {
                assert!(king_locations[color.index()] == PADDED_AREA, "more than one king");
                king_locations[color.index()] = loc;
            }
        }

        assert!(
            king_locations[0] != PADDED_AREA && king_locations[1] != PADDED_AREA,
            "both kings must be placed"
        );

        if player_to_move == Color::White {
            hash ^= KEYS.white_key;
        } else {
            score = -score;
        }

        let state = BoardState { player_to_move, score, hash, king_locations };
        Self { squares, states: vec![state] }
    }

    #[inline]
    pub(crate) fn state(&self) -> &BoardState {
        self.states.last().expect("state stack is never empty")
    }

    #[inline]
    pub fn player_to_move(&self) -> Color {
        self.state().player_to_move
    }

    /// Static evaluation from the perspective of the side to move,
    /// maintained incrementally.
    #[inline]
    pub fn score(&self) -> i32 {
        self.state().score
    }

    /// Zobrist hash of the position, maintained incrementally.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.state().hash
    }

    // ############################
    //         MAKE / UNDO
    // ############################

    /// Apply a move produced by `get_moves`. Passing any other move is
    /// undefined behaviour.
    pub fn make_move(&mut self, m: Move) {
        let prev = *self.state();
        let player_to_move = prev.player_to_move;
        let other_player = !player_to_move;

        let mut next_score = prev.score;
        let mut next_hash = prev.hash ^ KEYS.white_key;

        let start = m.start();
        let end = m.end();

        let moving_pt = square::piece_type(self.squares[start]);
        debug_assert!(moving_pt != PieceType::None, "no piece on the start square");

        square::clear(&mut self.squares[start]);
        square::clear(&mut self.squares[end]);

        next_score -= eval::SQUARE_SCORES[moving_pt.index()][start];
        next_hash ^= KEYS.piece_square_keys[player_to_move.index()][moving_pt.index()][start];

        let promo = m.promotion();
        if promo != PieceType::None {
            next_score -= eval::PIECE_SCORES[moving_pt.index()];
            next_score += eval::PIECE_SCORES[promo.index()];
            next_score += eval::SQUARE_SCORES[promo.index()][end];
            next_hash ^= KEYS.piece_square_keys[player_to_move.index()][promo.index()][end];
            square::set_piece(&mut self.squares[end], promo, player_to_move);
        } else {
            next_score += eval::SQUARE_SCORES[moving_pt.index()][end];
            next_hash ^= KEYS.piece_square_keys[player_to_move.index()][moving_pt.index()][end];
            square::set_piece(&mut self.squares[end], moving_pt, player_to_move);
        }

        let cap = m.captured();
        if cap != PieceType::None {
            // The victim's value and its square bonus both leave the
            // opponent's tally, which is a gain from our perspective.
            next_score += eval::PIECE_SCORES[cap.index()] + eval::SQUARE_SCORES[cap.index()][end];
            next_hash ^= KEYS.piece_square_keys[other_player.index()][cap.index()][end];
        }

        let mut next = BoardState {
            player_to_move: other_player,
            // Negate so the score is relative to the new side to move.
            score: -next_score,
            hash: next_hash,
            king_locations: prev.king_locations,
        };

        if moving_pt == PieceType::King {
            next.king_locations[player_to_move.index()] = end;
        }

        self.states.push(next);
    }

    /// The front-end variant: user indices (`row * 6 + col`) plus an
    /// optional promotion type. The captured piece is read off the board.
    pub fn make_move_coords(&mut self, start: usize, end: usize, promo: PieceType) {
        let end_padded = to_padded_index(end);
        let cap = square::piece_type(self.squares[end_padded]);
        self.make_move(Move::pack(to_padded_index(start), end_padded, cap, promo));
    }

    /// Take back the most recent move. Score, hash and king locations are
    /// restored by popping the state stack; the squares are repaired from
    /// the move record.
    pub fn undo_move(&mut self, m: Move) {
        debug_assert!(self.states.len() > 1, "no move to undo");
        self.states.pop();

        let player_to_move = self.state().player_to_move; // the side that moved
        let other_player = !player_to_move;

        let start = m.start();
        let end = m.end();

        let moving_pt = square::piece_type(self.squares[end]);
        square::clear(&mut self.squares[start]);
        square::clear(&mut self.squares[end]);

        // A promotion goes back on the board as the colour's pawn.
        let restored = if m.promotion() != PieceType::None {
            PieceType::pawn_of(player_to_move)
        } else {
            moving_pt
        };
        square::set_piece(&mut self.squares[start], restored, player_to_move);

        let cap = m.captured();
        if cap != PieceType::None {
            square::set_piece(&mut self.squares[end], cap, other_player);
        }
    }

    /// Pass the turn without touching any square. Only null-move pruning
    /// uses this; the state goes through the same stack as real moves.
    pub fn make_null_move(&mut self) {
        let prev = *self.state();
        self.states.push(BoardState {
            player_to_move: !prev.player_to_move,
            score: -prev.score,
            hash: prev.hash ^ KEYS.white_key,
            king_locations: prev.king_locations,
        });
    }

    pub fn undo_null_move(&mut self) {
        debug_assert!(self.states.len() > 1, "no null move to undo");
        self.states.pop();
    }

    // ############################
    //          QUERIES
    // ############################

    /// Whether the side to move has its king attacked.
    pub fn in_check(&self) -> bool {
        let king_loc = self.state().king_locations[self.state().player_to_move.index()];
        self.will_be_in_check(king_loc, king_loc)
    }

    /// Draw by repetition: the current hash has already occurred at least
    /// twice earlier in the game.
    pub fn is_draw(&self) -> bool {
        let current = self.state().hash;
        let mut seen = 0;
        for state in &self.states[..self.states.len() - 1] {
            if state.hash == current {
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
        }
        false
    }

    pub fn get_piece(&self, row: usize, col: usize) -> Option<Piece> {
        assert!(row < BOARD_SIDE && col < BOARD_SIDE);

        let sq = self.squares[to_padded(row, col)];
        let pt = square::piece_type(sq);
        if pt == PieceType::None {
            return None;
        }

        Some(Piece { color: square::color(sq), piece_type: pt })
    }

    /// Serialise a move in coordinate form, e.g. `b1a3` or `f5f6=Q`.
    pub fn move_to_string(&self, m: Move) -> String {
        m.to_string()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ############################
//          DISPLAY
// ############################

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = |piece: Piece| match (piece.color, piece.piece_type) {
            (Color::White, PieceType::PawnWhite) => "\u{2659}\u{FE0E}",
            (Color::White, PieceType::Knight) => "\u{2658}\u{FE0E}",
            (Color::White, PieceType::Rook) => "\u{2656}\u{FE0E}",
            (Color::White, PieceType::Queen) => "\u{2655}\u{FE0E}",
            (Color::White, PieceType::King) => "\u{2654}\u{FE0E}",
            (Color::Black, PieceType::PawnBlack) => "\u{265F}\u{FE0E}",
            (Color::Black, PieceType::Knight) => "\u{265E}\u{FE0E}",
            (Color::Black, PieceType::Rook) => "\u{265C}\u{FE0E}",
            (Color::Black, PieceType::Queen) => "\u{265B}\u{FE0E}",
            (Color::Black, PieceType::King) => "\u{265A}\u{FE0E}",
            _ => " ",
        };

        // Checkerboard colors (lichess-like).
        let light = (240, 217, 181);
        let dark = (181, 136, 99);

        for row in (0..BOARD_SIDE).rev() {
            write!(f, "{} ", (row + 1).to_string().red())?;

            for col in 0..BOARD_SIDE {
                let glyph = self.get_piece(row, col).map(symbol).unwrap_or(" ");
                let (r, g, b) = if (row + col) % 2 == 0 { light } else { dark };

                let cell = format!(" {} ", glyph)
                    .on_truecolor(r, g, b)
                    .truecolor(0, 0, 0);
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "   {}", " a  b  c  d  e  f".red())
    }
}
