//! Sliding piece move generation
//!
//! Common functionality for sliding pieces (bishops, rooks, queens).
//! These pieces can move multiple squares in a direction until blocked.
//!
//! ## Algorithm
//!
//! For every direction of the piece:
//! 1. Step one square at a time until the board edge
//! 2. Empty squares are quiet moves
//! 3. The first enemy piece is a capture, then the ray stops
//! 4. The first own piece stops the ray without a move
//!
//! Typical mobility on an empty board: 14 for rooks, 7-13 for bishops, 21-27 for queens.

use crate::constants::*;
use crate::types::*;

/// Generate moves along the given ray directions
pub fn generate_sliding_moves(
    board: &Board,
    from: Square,
    color: Color,
    piece: PieceKind,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in dirs {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            let dest_piece = board[to.index()];

            if dest_piece == 0 {
                moves.push(Move::quiet(from, to, piece));
            } else {
                if dest_piece.signum() != color.sign() {
                    moves.push(Move {
                        capture: true,
                        ..Move::quiet(from, to, piece)
                    });
                }
                break;
            }
            current = to;
        }
    }
}

pub fn generate_bishop_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, from, color, PieceKind::Bishop, &BISHOP_DIRS, moves);
}

pub fn generate_rook_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, from, color, PieceKind::Rook, &ROOK_DIRS, moves);
}

pub fn generate_queen_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, from, color, PieceKind::Queen, &ROOK_DIRS, moves);
    generate_sliding_moves(board, from, color, PieceKind::Queen, &BISHOP_DIRS, moves);
}
