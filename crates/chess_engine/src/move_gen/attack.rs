//! Attack detection and square checking
//!
//! Provides functions to check if squares are under attack and if kings are in check.
//! This module is critical for move legality validation, castling and check detection.
//!
//! ## Algorithm
//!
//! To check if a square is attacked we look outward from the target square:
//! pawn and knight and king patterns are checked directly, and each sliding ray
//! is walked until the first occupied square. The first blocker on a rook ray
//! attacks if it is an enemy rook or queen, on a bishop ray if it is an enemy
//! bishop or queen.

use crate::constants::*;
use crate::types::*;

/// Check if a square is under attack by pieces of the specified color
///
/// # Arguments
///
/// * `board` - Piece placement
/// * `square` - Target square
/// * `by_color` - Color of pieces that might attack
///
/// # Examples
///
/// ```rust,ignore
/// // Is e4 attacked by black?
/// let attacked = is_square_attacked(&state.board, Square::parse("e4")?, Color::Black);
/// ```
pub fn is_square_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    let sign = by_color.sign();

    // A pawn of `by_color` attacks diagonally forward, so look one rank behind the target
    for df in [-1, 1] {
        if let Some(from) = square.offset(df, -by_color.forward()) {
            if board[from.index()] == PAWN_ID * sign {
                return true;
            }
        }
    }

    if KNIGHT_DIRS.iter().any(|&(df, dr)| {
        square
            .offset(df, dr)
            .is_some_and(|from| board[from.index()] == KNIGHT_ID * sign)
    }) {
        return true;
    }

    if KING_DIRS.iter().any(|&(df, dr)| {
        square
            .offset(df, dr)
            .is_some_and(|from| board[from.index()] == KING_ID * sign)
    }) {
        return true;
    }

    ray_attacked(board, square, &ROOK_DIRS, ROOK_ID * sign, QUEEN_ID * sign)
        || ray_attacked(board, square, &BISHOP_DIRS, BISHOP_ID * sign, QUEEN_ID * sign)
}

fn ray_attacked(board: &Board, square: Square, dirs: &[(i8, i8)], slider: i8, queen: i8) -> bool {
    for &(df, dr) in dirs {
        let mut current = square;
        while let Some(next) = current.offset(df, dr) {
            let piece = board[next.index()];
            if piece != 0 {
                if piece == slider || piece == queen {
                    return true;
                }
                break;
            }
            current = next;
        }
    }
    false
}

/// Find the king position for a color
pub fn find_king(board: &Board, color: Color) -> Option<Square> {
    let king_piece = KING_ID * color.sign();
    board
        .iter()
        .position(|&piece| piece == king_piece)
        .map(Square::from_index_unchecked)
}

/// Check if the king of a color is in check
///
/// Returns `false` when the color has no king on the board.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    find_king(board, color).is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}
