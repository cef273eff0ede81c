//! Perft node counting
//!
//! Counts leaf nodes of the legal move tree to a fixed depth. Comparing the
//! counts with published tables is the standard check for a move generator.

use crate::board::BoardState;

/// Number of leaf positions `depth` plies below `state`
pub fn perft(state: &BoardState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = state.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| {
            let mut child = state.clone();
            child.play_unchecked(mv);
            perft(&child, depth - 1)
        })
        .sum()
}

/// Per-root-move breakdown, handy when chasing a perft mismatch
pub fn divide(state: &BoardState, depth: u32) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = state
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let mut child = state.clone();
            child.play_unchecked(mv);
            (mv.uci(), perft(&child, depth.saturating_sub(1)))
        })
        .collect();
    out.sort();
    out
}
