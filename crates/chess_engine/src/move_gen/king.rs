//! King move generation
//!
//! Handles king-specific move generation. Kings move one square in any direction
//! and may castle.
//!
//! ## Castling Conditions
//!
//! A castling move is generated only when:
//! - The matching right is still held
//! - King and rook stand on their home squares
//! - Every square between king and rook is empty
//! - The king is not in check, does not pass through an attacked square and
//!   does not land on one

use super::attack::is_square_attacked;
use super::knight::push_step;
use crate::constants::*;
use crate::types::*;

/// Generate king moves from a given square, castling included
pub fn generate_king_moves(
    board: &Board,
    from: Square,
    color: Color,
    rights: CastlingRights,
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in &KING_DIRS {
        if let Some(to) = from.offset(df, dr) {
            push_step(board, from, to, PieceKind::King, color, moves);
        }
    }

    let rank = color.back_rank();
    let Some(home) = Square::new(4, rank) else {
        return;
    };
    if from != home {
        return;
    }

    let enemy = color.opposite();
    let mut king_safe: Option<bool> = None;

    for side in [CastleSide::King, CastleSide::Queen] {
        if !rights.has(color, side) {
            continue;
        }

        // (rook file, files that must be empty, files the king crosses, king destination file)
        let (rook_file, empty, crossed, dest): (u8, &[u8], [u8; 2], u8) = match side {
            CastleSide::King => (7, &[5, 6], [5, 6], 6),
            CastleSide::Queen => (0, &[1, 2, 3], [3, 2], 2),
        };

        let rook_ok = Square::new(rook_file, rank)
            .is_some_and(|sq| board[sq.index()] == ROOK_ID * color.sign());
        if !rook_ok {
            continue;
        }

        let path_clear = empty
            .iter()
            .filter_map(|&file| Square::new(file, rank))
            .all(|sq| board[sq.index()] == 0);
        if !path_clear {
            continue;
        }

        let safe = *king_safe.get_or_insert_with(|| !is_square_attacked(board, home, enemy));
        if !safe {
            continue;
        }

        let crossing_safe = crossed
            .iter()
            .filter_map(|&file| Square::new(file, rank))
            .all(|sq| !is_square_attacked(board, sq, enemy));
        if !crossing_safe {
            continue;
        }

        if let Some(to) = Square::new(dest, rank) {
            moves.push(Move {
                castle: Some(side),
                ..Move::quiet(home, to, PieceKind::King)
            });
        }
    }
}
