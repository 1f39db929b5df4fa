// src/game/eval.rs

use crate::game::defs::{NUM_PIECE_TYPES, PADDED_AREA};

/// Score so high it can't be attained through material alone.
pub const MATE_SCORE: i32 = 100_000;

/// Material value for each piece type, indexed by `PieceType`.
pub const PIECE_SCORES: [i32; NUM_PIECE_TYPES] = [0, 100, 100, 300, 500, 900, 0];

// For each type of material, a bonus for standing on each location of the
// board. The tables use padded coordinates to save converting on every
// lookup, so there are two lines of zero padding all the way around.
// Pawn tables reward advancing towards the promotion rank; minor and major
// pieces slightly prefer the centre.
pub const SQUARE_SCORES: [[i32; PADDED_AREA]; NUM_PIECE_TYPES] = [
    // Padding for the NONE piece type.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // PAWN_WHITE, advancing towards rank 6.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  2,  2,  2,  2,  2,  2,  0,  0,
         0,  0,  5,  5,  7,  7,  5,  5,  0,  0,
         0,  0, 10, 10, 10, 10, 10, 10,  0,  0,
         0,  0, 30, 30, 30, 30, 30, 30,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // PAWN_BLACK, the mirror image.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0, 30, 30, 30, 30, 30, 30,  0,  0,
         0,  0, 10, 10, 10, 10, 10, 10,  0,  0,
         0,  0,  5,  5,  7,  7,  5,  5,  0,  0,
         0,  0,  2,  2,  2,  2,  2,  2,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // KNIGHT. Knights on the rim are dim.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0, -5, -5, -5, -5, -5, -5,  0,  0,
         0,  0, -5,  5,  5,  5,  5, -5,  0,  0,
         0,  0, -5,  5, 10, 10,  5, -5,  0,  0,
         0,  0, -5,  5, 10, 10,  5, -5,  0,  0,
         0,  0, -5,  5,  5,  5,  5, -5,  0,  0,
         0,  0, -5, -5, -5, -5, -5, -5,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // ROOK. Rooks gain little positionally; weight the centre a touch.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  1,  1,  1,  1,  0,  0,  0,
         0,  0,  0,  1,  1,  1,  1,  0,  0,  0,
         0,  0,  0,  1,  1,  1,  1,  0,  0,  0,
         0,  0,  0,  1,  1,  1,  1,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // QUEEN.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  2,  2,  2,  2,  0,  0,  0,
         0,  0,  0,  2,  5,  5,  2,  0,  0,  0,
         0,  0,  0,  2,  5,  5,  2,  0,  0,  0,
         0,  0,  0,  2,  2,  2,  2,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // KING. On this small a board the king fights from the centre too.
    [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  2,  2,  2,  2,  0,  0,  0,
         0,  0,  0,  2,  5,  5,  2,  0,  0,  0,
         0,  0,  0,  2,  5,  5,  2,  0,  0,  0,
         0,  0,  0,  2,  2,  2,  2,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::defs::{to_padded, PieceType, PADDED_SIDE};

    #[test]
    fn padding_squares_carry_no_bonus() {
        for table in SQUARE_SCORES.iter() {
            for loc in 0..PADDED_AREA {
                let row = loc / PADDED_SIDE;
                let col = loc % PADDED_SIDE;
                let on_board = (2..8).contains(&row) && (2..8).contains(&col);
                if !on_board {
                    assert_eq!(table[loc], 0, "padding bonus at {loc}");
                }
            }
        }
    }

    #[test]
    fn pawn_tables_mirror_each_other() {
        for row in 0..6 {
            for col in 0..6 {
                assert_eq!(
                    SQUARE_SCORES[PieceType::PawnWhite.index()][to_padded(row, col)],
                    SQUARE_SCORES[PieceType::PawnBlack.index()][to_padded(5 - row, col)],
                );
            }
        }
    }

    #[test]
    fn pawn_advance_is_rewarded() {
        let white = &SQUARE_SCORES[PieceType::PawnWhite.index()];
        for col in 0..6 {
            for row in 1..5 {
                assert!(white[to_padded(row + 1, col)] >= white[to_padded(row, col)]);
            }
        }
    }
}
