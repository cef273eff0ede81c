//! Move generation
//!
//! Generates pseudo-legal moves per piece (see the submodules) and filters them
//! down to legal moves by playing each one on a scratch copy of the board and
//! rejecting those that leave the mover's king attacked.

pub mod attack;
pub mod king;
pub mod knight;
pub mod pawn;
pub mod sliding;

pub use attack::{find_king, is_in_check, is_square_attacked};

use crate::board::BoardState;
use crate::constants::*;
use crate::types::*;

use king::generate_king_moves;
use knight::generate_knight_moves;
use pawn::generate_pawn_moves;
use sliding::{generate_bishop_moves, generate_queen_moves, generate_rook_moves};

/// Generate all pseudo-legal moves for the side to move
///
/// Castling moves are already fully checked (including attacked squares);
/// every other move may still leave the own king in check.
pub fn generate_pseudo_legal_moves(state: &BoardState, moves: &mut Vec<Move>) {
    let color = state.side_to_move();
    let board = &state.board;

    for index in POS_RANGE_US {
        let piece = board[index];
        if piece == 0 || piece.signum() != color.sign() {
            continue;
        }
        let from = Square::from_index_unchecked(index);

        match piece.abs() {
            PAWN_ID => generate_pawn_moves(board, from, color, state.en_passant(), moves),
            KNIGHT_ID => generate_knight_moves(board, from, color, moves),
            BISHOP_ID => generate_bishop_moves(board, from, color, moves),
            ROOK_ID => generate_rook_moves(board, from, color, moves),
            QUEEN_ID => generate_queen_moves(board, from, color, moves),
            KING_ID => generate_king_moves(board, from, color, state.castling_rights(), moves),
            _ => {}
        }
    }
}

/// Generate all legal moves for the side to move
pub fn generate_legal_moves(state: &BoardState) -> Vec<Move> {
    let color = state.side_to_move();
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(state, &mut pseudo);

    pseudo.retain(|mv| {
        let mut scratch = state.board;
        play_on_board(&mut scratch, mv, color);
        !is_in_check(&scratch, color)
    });
    pseudo
}

/// Move pieces for `mv` on a raw board
///
/// Handles the rook hop of castling, removal of the en passant victim and
/// promotion. Rights, clocks and side to move are the caller's business.
pub(crate) fn play_on_board(board: &mut Board, mv: &Move, color: Color) {
    let sign = color.sign();
    board[mv.from.index()] = 0;

    let placed = mv.promotion.map_or(mv.piece.id(), PieceKind::id) * sign;
    board[mv.to.index()] = placed;

    if mv.en_passant {
        // The captured pawn sits beside the mover, on the origin rank
        if let Some(victim) = Square::new(mv.to.file(), mv.from.rank()) {
            board[victim.index()] = 0;
        }
    }

    if let Some(side) = mv.castle {
        let rank = color.back_rank();
        let (rook_from, rook_to) = match side {
            CastleSide::King => (7, 5),
            CastleSide::Queen => (0, 3),
        };
        if let (Some(from), Some(to)) = (Square::new(rook_from, rank), Square::new(rook_to, rank)) {
            board[from.index()] = 0;
            board[to.index()] = ROOK_ID * sign;
        }
    }
}
