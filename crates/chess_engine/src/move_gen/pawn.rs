//! Pawn move generation
//!
//! Handles pawn-specific move generation including:
//! - Single and double forward pushes
//! - Diagonal captures
//! - En passant
//! - Promotion
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: Pawns move one square forward (toward opponent)
//! - **Double push**: From starting rank (rank 2 for white, rank 7 for black),
//!   pawns can move two squares forward if both squares are empty
//! - **Captures**: Pawns capture diagonally forward (one square)
//! - **En passant**: Only onto the en passant target square set by the previous ply
//! - **Promotion**: Reaching the last rank yields four distinct moves, one per
//!   promotion piece (queen, rook, bishop, knight)

use crate::constants::*;
use crate::types::*;

/// Generate pawn moves from a given square
///
/// # Arguments
///
/// * `board` - Piece placement
/// * `from` - Square of the pawn
/// * `color` - Color of the pawn
/// * `en_passant` - En passant target square of the position, if any
/// * `moves` - Output vector to append pseudo-legal moves to
pub fn generate_pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    moves: &mut Vec<Move>,
) {
    let forward = color.forward();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(one) = from.offset(0, forward) {
        if board[one.index()] == 0 {
            push_with_promotions(Move::quiet(from, one, PieceKind::Pawn), color, moves);

            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, forward) {
                    if board[two.index()] == 0 {
                        moves.push(Move::quiet(from, two, PieceKind::Pawn));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };
        let target = board[to.index()];

        if target != 0 && target.signum() != color.sign() {
            let mv = Move {
                capture: true,
                ..Move::quiet(from, to, PieceKind::Pawn)
            };
            push_with_promotions(mv, color, moves);
        } else if target == 0 && en_passant == Some(to) {
            moves.push(Move {
                capture: true,
                en_passant: true,
                ..Move::quiet(from, to, PieceKind::Pawn)
            });
        }
    }
}

fn push_with_promotions(mv: Move, color: Color, moves: &mut Vec<Move>) {
    if mv.to.rank() == color.opposite().back_rank() {
        for id in PROMOTION_IDS {
            moves.push(Move {
                promotion: PieceKind::from_id(id),
                ..mv
            });
        }
    } else {
        moves.push(mv);
    }
}
