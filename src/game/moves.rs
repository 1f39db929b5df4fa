// src/game/moves.rs

use crate::game::board::Board;
use crate::game::defs::{
    from_padded, square, to_padded, Color, Move, MoveGenType, PieceType, SquareCode,
    NUM_PIECE_TYPES, PADDED_AREA, PADDED_SIDE,
};

// ############################
//        PIECE OFFSETS
// ############################

const P: i32 = PADDED_SIDE as i32;

/// Padded-index offsets for each piece's moves, zero-terminated. Pawn rows
/// hold only the forward step; their captures are handled separately.
pub(crate) const PIECE_OFFSETS: [[i32; 8]; NUM_PIECE_TYPES] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [P, 0, 0, 0, 0, 0, 0, 0],
    [-P, 0, 0, 0, 0, 0, 0, 0],
    [
        2 * P + 1, 2 * P - 1,
        P + 2, P - 2,
        -P + 2, -P - 2,
        -2 * P + 1, -2 * P - 1,
    ],
    [-1, 1, P, -P, 0, 0, 0, 0],
    [-1, 1, P, -P, P - 1, P + 1, -P - 1, -P + 1],
    [-1, 1, P, -P, P - 1, P + 1, -P - 1, -P + 1],
];

#[inline]
const fn is_promotion_rank(loc: usize) -> bool {
    loc < 3 * PADDED_SIDE || loc >= 7 * PADDED_SIDE
}

// ############################
//       MOVE GENERATION
// ############################

impl Board {
    /// Enumerate the legal moves for the side to move. `Dynamic` keeps only
    /// captures and promotions, which is what quiescence wants.
    pub fn get_moves(&self, gen: MoveGenType) -> Vec<Move> {
        let player_to_move = self.player_to_move();
        let mut moves = Vec::with_capacity(40);

        for loc in 0..PADDED_AREA {
            let sq = self.squares[loc];
            if !square::on_board(sq) {
                continue;
            }

            let pt = square::piece_type(sq);
            if pt == PieceType::None {
                continue;
            }
            if square::color(sq) != player_to_move {
                continue;
            }

            if pt.is_pawn() {
                self.add_pawn_moves(loc, &mut moves);
                continue;
            }

            for &offset in &PIECE_OFFSETS[pt.index()] {
                if offset == 0 {
                    break;
                }

                let mut target = (loc as i32 + offset) as usize;
                let mut target_sq = self.squares[target];
                while square::on_board(target_sq) {
                    let target_pt = square::piece_type(target_sq);
                    if target_pt != PieceType::None {
                        if square::color(target_sq) != player_to_move
                            && !self.will_be_in_check(loc, target)
                        {
                            moves.push(Move::pack(loc, target, target_pt, PieceType::None));
                        }
                        break;
                    }

                    if !self.will_be_in_check(loc, target) {
                        moves.push(Move::quiet(loc, target));
                    }

                    if pt == PieceType::Knight || pt == PieceType::King {
                        break;
                    }

                    target = (target as i32 + offset) as usize;
                    target_sq = self.squares[target];
                }
            }
        }

        if gen == MoveGenType::Dynamic {
            moves.retain(|m| m.is_capture() || m.is_promotion());
        }

        moves
    }

    fn add_pawn_moves(&self, loc: usize, moves: &mut Vec<Move>) {
        let player_to_move = self.player_to_move();
        let forward_offset = if player_to_move == Color::White { P } else { -P };
        let forward = (loc as i32 + forward_offset) as usize;

        let push_expanding_promotions = |moves: &mut Vec<Move>, m: Move, end: usize| {
            if is_promotion_rank(end) {
                moves.push(m.with_promotion(PieceType::Knight));
                moves.push(m.with_promotion(PieceType::Rook));
                moves.push(m.with_promotion(PieceType::Queen));
            } else {
                moves.push(m);
            }
        };

        // Step onto an empty square directly ahead.
        if square::piece_type(self.squares[forward]) == PieceType::None
            && !self.will_be_in_check(loc, forward)
        {
            push_expanding_promotions(moves, Move::quiet(loc, forward), forward);
        }

        // The two diagonal captures.
        for diag in [forward - 1, forward + 1] {
            let target_sq = self.squares[diag];
            if !square::on_board(target_sq) {
                continue;
            }

            let target_pt = square::piece_type(target_sq);
            if target_pt != PieceType::None
                && square::color(target_sq) != player_to_move
                && !self.will_be_in_check(loc, diag)
            {
                push_expanding_promotions(
                    moves,
                    Move::pack(loc, diag, target_pt, PieceType::None),
                    diag,
                );
            }
        }
    }

    /// Destination user indices (`row * 6 + col`) reachable from `(row, col)`
    /// over all legal moves. Promotion triples collapse to one target.
    pub fn get_targets_for_piece(&self, row: usize, col: usize) -> Vec<usize> {
        let loc = to_padded(row, col);

        let mut targets = Vec::new();
        for m in self.get_moves(MoveGenType::All) {
            if m.start() == loc {
                let end = from_padded(m.end());
                if !targets.contains(&end) {
                    targets.push(end);
                }
            }
        }

        targets
    }

    // ############################
    //        CHECK PROBING
    // ############################

    /// Would moving the piece on `start` to `end` leave the mover's own king
    /// attacked? A pure probe: the board is read as-is, with the proposed
    /// move accounted for by treating `start` as empty and `end` as occupied
    /// by the mover. `in_check` reuses it with `start == end == king`.
    pub(crate) fn will_be_in_check(&self, start: usize, end: usize) -> bool {
        let state = self.state();
        let player_to_move = state.player_to_move;

        let moving_pt = square::piece_type(self.squares[start]);
        let mut king_loc = state.king_locations[player_to_move.index()];
        if moving_pt == PieceType::King {
            king_loc = end;
        }

        let square_after = |loc: usize| -> SquareCode {
            if loc == end {
                let mut sq = square::ON_BOARD;
                square::set_piece(&mut sq, moving_pt, player_to_move);
                sq
            } else if loc == start {
                square::ON_BOARD
            } else {
                self.squares[loc]
            }
        };

        // Radiate knight and king offsets one step, rook and queen offsets
        // along rays until blocked, matching the attacker type at each stop.
        for attacker in [PieceType::Knight, PieceType::King, PieceType::Rook, PieceType::Queen] {
            for &offset in &PIECE_OFFSETS[attacker.index()] {
                if offset == 0 {
                    break;
                }

                let mut target = (king_loc as i32 + offset) as usize;
                let mut target_sq = square_after(target);
                while square::on_board(target_sq) {
                    let target_pt = square::piece_type(target_sq);
                    if target_pt == attacker && square::color(target_sq) != player_to_move {
                        return true;
                    }
                    if target_pt != PieceType::None {
                        break;
                    }
                    if attacker == PieceType::Knight || attacker == PieceType::King {
                        break;
                    }

                    target = (target as i32 + offset) as usize;
                    target_sq = square_after(target);
                }
            }
        }

        // Pawn checks come from the two squares diagonally ahead of the king.
        let forward = if player_to_move == Color::White { P } else { -P };
        for pawn_loc in [king_loc as i32 + forward - 1, king_loc as i32 + forward + 1] {
            let target_sq = square_after(pawn_loc as usize);
            if square::on_board(target_sq)
                && square::is_pawn(target_sq)
                && square::color(target_sq) != player_to_move
            {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn ten_moves_in_the_initial_position() {
        let board = Board::new();
        let moves = board.get_moves(MoveGenType::All);
        assert_eq!(moves.len(), 10);

        // Six pawn pushes and two jumps for each knight.
        let pawn_pushes = moves
            .iter()
            .filter(|m| square::piece_type(board.squares[m.start()]).is_pawn())
            .count();
        assert_eq!(pawn_pushes, 6);
        assert!(moves.iter().all(|m| !m.is_capture() && !m.is_promotion()));
    }

    #[test]
    fn knight_targets_from_the_initial_position() {
        let board = Board::new();
        let mut targets = board.get_targets_for_piece(0, 1);
        targets.sort_unstable();
        assert_eq!(targets, vec![12, 14]); // a3 and c3
    }

    #[test]
    fn dynamic_moves_are_the_tactical_subset() {
        let mut board = Board::new();
        let mut rng = SmallRng::seed_from_u64(0xD1CE);

        for _ in 0..30 {
            let all = board.get_moves(MoveGenType::All);
            if all.is_empty() {
                break;
            }

            let dynamic = board.get_moves(MoveGenType::Dynamic);
            assert!(dynamic.iter().all(|m| m.is_capture() || m.is_promotion()));
            assert!(dynamic.iter().all(|m| all.contains(m)));
            assert_eq!(
                all.iter().filter(|m| m.is_capture() || m.is_promotion()).count(),
                dynamic.len()
            );

            board.make_move(all[rng.gen_range(0..all.len())]);
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_capturable() {
        let mut board = Board::new();
        let mut rng = SmallRng::seed_from_u64(0xC4EC);

        for _ in 0..40 {
            let moves = board.get_moves(MoveGenType::All);
            if moves.is_empty() {
                break;
            }

            for &m in &moves {
                board.make_move(m);
                // If the mover had left their king attacked, the reply list
                // would contain a king capture.
                let replies = board.get_moves(MoveGenType::All);
                assert!(
                    replies.iter().all(|r| r.captured() != PieceType::King),
                    "move {m} leaves the king hanging"
                );
                board.undo_move(m);
            }

            board.make_move(moves[rng.gen_range(0..moves.len())]);
        }
    }

    #[test]
    fn pawn_pushes_expand_to_three_promotions() {
        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (5, 5, Color::Black, PieceType::King),
                (4, 0, Color::White, PieceType::PawnWhite),
            ],
            Color::White,
        );

        let moves = board.get_moves(MoveGenType::All);
        let promos: Vec<_> = moves.iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), 3);
        assert!(promos.iter().all(|m| m.start() == to_padded(4, 0) && m.end() == to_padded(5, 0)));

        let kinds: Vec<_> = promos.iter().map(|m| m.promotion()).collect();
        assert!(kinds.contains(&PieceType::Knight));
        assert!(kinds.contains(&PieceType::Rook));
        assert!(kinds.contains(&PieceType::Queen));
    }

    #[test]
    fn rook_check_is_detected_and_must_be_answered() {
        // White king on d1, black rook on d6: check down the d file.
        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (5, 3, Color::Black, PieceType::Rook),
                (5, 5, Color::Black, PieceType::King),
                (0, 0, Color::White, PieceType::Rook),
            ],
            Color::White,
        );

        assert!(board.in_check());

        let mut board = board;
        for m in board.get_moves(MoveGenType::All) {
            board.make_move(m);
            let replies = board.get_moves(MoveGenType::All);
            assert!(replies.iter().all(|r| r.captured() != PieceType::King));
            board.undo_move(m);
        }
    }

    #[test]
    fn pawn_checks_respect_the_attacker_direction() {
        // A black pawn on e2 attacks the king on d1; a white pawn on the
        // same square does not.
        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (1, 4, Color::Black, PieceType::PawnBlack),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(board.in_check());

        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (1, 4, Color::White, PieceType::PawnWhite),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(!board.in_check());
    }

    #[test]
    fn blocked_sliders_do_not_check_through_pieces() {
        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (3, 3, Color::White, PieceType::Rook),
                (5, 3, Color::Black, PieceType::Queen),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(!board.in_check());
    }

    #[test]
    fn moving_a_pinned_piece_is_illegal() {
        // The white rook on d2 shields the king from the queen on d6.
        let board = Board::from_pieces(
            &[
                (0, 3, Color::White, PieceType::King),
                (1, 3, Color::White, PieceType::Rook),
                (5, 3, Color::Black, PieceType::Queen),
                (5, 5, Color::Black, PieceType::King),
            ],
            Color::White,
        );

        for m in board.get_moves(MoveGenType::All) {
            if m.start() == to_padded(1, 3) {
                // The pinned rook may only slide along the d file.
                assert_eq!(m.end() % PADDED_SIDE, to_padded(1, 3) % PADDED_SIDE);
            }
        }
    }
}
