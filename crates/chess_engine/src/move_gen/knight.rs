//! Knight move generation
//!
//! Knights move in an L-shape pattern: 2 squares in one direction, then 1
//! square perpendicular. They jump over pieces, so only the destination square
//! is inspected.

use crate::constants::*;
use crate::types::*;

/// Generate knight moves from a given square
///
/// Destinations holding own pieces are skipped; enemy pieces are captures.
pub fn generate_knight_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    for &(df, dr) in &KNIGHT_DIRS {
        if let Some(to) = from.offset(df, dr) {
            push_step(board, from, to, PieceKind::Knight, color, moves);
        }
    }
}

/// Push a single-step move unless the destination holds an own piece
#[inline]
pub(crate) fn push_step(
    board: &Board,
    from: Square,
    to: Square,
    piece: PieceKind,
    color: Color,
    moves: &mut Vec<Move>,
) {
    let dest_piece = board[to.index()];
    if dest_piece == 0 {
        moves.push(Move::quiet(from, to, piece));
    } else if dest_piece.signum() != color.sign() {
        moves.push(Move {
            capture: true,
            ..Move::quiet(from, to, piece)
        });
    }
}
