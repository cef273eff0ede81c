//! Zobrist position hashing
//!
//! Implements position hashing for repetition detection. A key mixes:
//! - one random value per (piece, square)
//! - the side to move
//! - each castling right still held
//! - the en passant file, only when a pawn of the side to move could actually
//!   capture onto the target square
//!
//! The random values come from a fixed-seed SplitMix64 stream evaluated at
//! compile time, so keys are identical across runs and platforms.

use crate::board::BoardState;
use crate::constants::*;
use crate::types::*;

const PIECE_KEYS: usize = 12 * 64;
const SIDE_KEY: usize = PIECE_KEYS;
const CASTLING_KEYS: usize = SIDE_KEY + 1;
const EN_PASSANT_KEYS: usize = CASTLING_KEYS + 4;
const KEY_COUNT: usize = EN_PASSANT_KEYS + 8;

const SEED: u64 = 0x5EED_C4E5_5B0A_4D17;

const fn splitmix64(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (state, z ^ (z >> 31))
}

const fn build_keys() -> [u64; KEY_COUNT] {
    let mut keys = [0u64; KEY_COUNT];
    let mut state = SEED;
    let mut i = 0;
    while i < KEY_COUNT {
        let (next, key) = splitmix64(state);
        state = next;
        keys[i] = key;
        i += 1;
    }
    keys
}

static ZOBRIST: [u64; KEY_COUNT] = build_keys();

/// Compute the Zobrist key of a position from scratch
pub fn position_key(state: &BoardState) -> u64 {
    let mut key = 0u64;

    for (square, piece) in state.pieces() {
        let piece_index = piece.color.index() * 6 + piece.kind.index();
        key ^= ZOBRIST[piece_index * 64 + square.index()];
    }

    if state.side_to_move() == Color::Black {
        key ^= ZOBRIST[SIDE_KEY];
    }

    let rights = state.castling_rights().bits();
    for bit in 0..4 {
        if rights & (1 << bit) != 0 {
            key ^= ZOBRIST[CASTLING_KEYS + bit];
        }
    }

    if let Some(target) = state.en_passant() {
        if en_passant_capturable(state, target) {
            key ^= ZOBRIST[EN_PASSANT_KEYS + target.file() as usize];
        }
    }

    key
}

/// Whether a pawn of the side to move stands next to the double-pushed pawn
fn en_passant_capturable(state: &BoardState, target: Square) -> bool {
    let color = state.side_to_move();
    let own_pawn = PAWN_ID * color.sign();
    [-1, 1].iter().any(|&df| {
        target
            .offset(df, -color.forward())
            .is_some_and(|from| state.board[from.index()] == own_pawn)
    })
}
