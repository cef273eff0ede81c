//! Test suite for chess rules
//!
//! # Test Organization
//!
//! - `test_perft_*` - Move generator against published perft tables
//! - `test_castling_*`, `test_en_passant_*`, `test_promotion_*` - Special moves
//! - `test_apply_*` - State updates performed by `BoardState::apply`
//! - `test_terminal_*` - Checkmate, stalemate and draw detection
//! - `test_fen_*` - FEN import/export
//! - `test_notation_*` - SAN/UCI resolution and SAN rendering
//!
//! # Reference
//!
//! Perft values: https://www.chessprogramming.org/Perft_Results

use super::*;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn play(state: &mut BoardState, moves: &[&str]) {
    for text in moves {
        let mv = resolve_notation(state, text).unwrap_or_else(|e| panic!("{text}: {e}"));
        state.apply(mv).unwrap();
    }
}

fn sq(name: &str) -> Square {
    Square::parse(name).unwrap()
}

// ============================================================================
// Perft
// ============================================================================

#[test]
fn test_perft_starting_position() {
    let state = BoardState::new();
    assert_eq!(state.legal_moves().len(), 20);
    assert_eq!(perft(&state, 1), 20);
    assert_eq!(perft(&state, 2), 400);
    assert_eq!(perft(&state, 3), 8902);
}

#[test]
fn test_perft_kiwipete() {
    //! Castling both ways, en passant-ready pawns and pinned pieces
    let state = BoardState::from_fen(KIWIPETE).unwrap();
    assert_eq!(perft(&state, 1), 48);
    assert_eq!(perft(&state, 2), 2039);
}

#[test]
fn test_perft_position_3() {
    //! Sparse endgame with en passant discovered checks along the rank
    let state = BoardState::from_fen(POSITION_3).unwrap();
    assert_eq!(perft(&state, 1), 14);
    assert_eq!(perft(&state, 2), 191);
    assert_eq!(perft(&state, 3), 2812);
}

#[test]
fn test_perft_position_4() {
    let state = BoardState::from_fen(POSITION_4).unwrap();
    assert_eq!(perft(&state, 1), 6);
    assert_eq!(perft(&state, 2), 264);
}

#[test]
fn test_perft_position_5() {
    //! Promotion with capture and castling with a knight on f2
    let state = BoardState::from_fen(POSITION_5).unwrap();
    assert_eq!(perft(&state, 1), 44);
    assert_eq!(perft(&state, 2), 1486);
}

#[test]
fn test_divide_sums_to_perft() {
    let state = BoardState::new();
    let total: u64 = perft::divide(&state, 2).iter().map(|(_, n)| n).sum();
    assert_eq!(total, 400);
}

#[test]
fn test_knight_attacks_e5_after_open_game() {
    //! After 1.e4 e5 2.Nf3 h6 the only white capture is Nxe5
    let mut state = BoardState::new();
    play(&mut state, &["e4", "e5", "Nf3", "h6"]);

    let captures: Vec<Move> = state.legal_moves().into_iter().filter(|m| m.capture).collect();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].from, sq("f3"));
    assert_eq!(captures[0].to, sq("e5"));
    assert_eq!(captures[0].piece, PieceKind::Knight);
}

// ============================================================================
// Special moves
// ============================================================================

#[test]
fn test_castling_both_sides_available() {
    let state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let castles: Vec<CastleSide> = state.legal_moves().iter().filter_map(|m| m.castle).collect();
    assert_eq!(castles.len(), 2);
    assert!(castles.contains(&CastleSide::King));
    assert!(castles.contains(&CastleSide::Queen));
}

#[test]
fn test_castling_through_attacked_square_is_illegal() {
    //! Black rook on f2 covers f1, so only the queen side remains
    let state = BoardState::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
    let castles: Vec<CastleSide> = state.legal_moves().iter().filter_map(|m| m.castle).collect();
    assert_eq!(castles, vec![CastleSide::Queen]);
}

#[test]
fn test_castling_out_of_check_is_illegal() {
    let state = BoardState::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
    assert!(state.is_in_check());
    assert!(state.legal_moves().iter().all(|m| m.castle.is_none()));
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut state, &["O-O"]);

    assert_eq!(state.piece_at(sq("g1")), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(state.piece_at(sq("f1")), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(state.piece_at(sq("h1")), None);
    assert!(!state.castling_rights().has(Color::White, CastleSide::King));
    assert!(!state.castling_rights().has(Color::White, CastleSide::Queen));
    assert!(state.castling_rights().has(Color::Black, CastleSide::King));
}

#[test]
fn test_castling_rights_lost_when_rook_captured() {
    let mut state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut state, &["Rxa8+"]);
    assert!(!state.castling_rights().has(Color::Black, CastleSide::Queen));
    assert!(!state.castling_rights().has(Color::White, CastleSide::Queen));
    assert!(state.castling_rights().has(Color::Black, CastleSide::King));
}

#[test]
fn test_en_passant_window_is_one_ply() {
    let mut state = BoardState::new();
    play(&mut state, &["e4", "a6", "e5", "d5"]);
    assert_eq!(state.en_passant(), Some(sq("d6")));

    let ep = state
        .legal_moves()
        .into_iter()
        .find(|m| m.en_passant)
        .expect("exd6 e.p. should be legal");
    assert_eq!(ep.to, sq("d6"));

    // Decline it; the right is gone after one ply
    play(&mut state, &["Nf3", "h6"]);
    assert!(state.legal_moves().iter().all(|m| !m.en_passant));
}

#[test]
fn test_en_passant_removes_captured_pawn() {
    let mut state = BoardState::new();
    play(&mut state, &["e4", "a6", "e5", "d5", "exd6"]);
    assert_eq!(state.piece_at(sq("d5")), None);
    assert_eq!(state.piece_at(sq("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
    assert_eq!(state.halfmove_clock(), 0);
}

#[test]
fn test_promotion_yields_four_moves() {
    let state = BoardState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    let promotions: Vec<PieceKind> = state
        .legal_moves()
        .iter()
        .filter_map(|m| m.promotion)
        .collect();
    assert_eq!(promotions.len(), 4);
    for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
        assert!(promotions.contains(&kind));
    }
}

#[test]
fn test_promotion_places_new_piece() {
    let mut state = BoardState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    play(&mut state, &["a8=N"]);
    assert_eq!(state.piece_at(sq("a8")), Some(Piece::new(Color::White, PieceKind::Knight)));
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn test_apply_updates_counters() {
    let mut state = BoardState::new();
    play(&mut state, &["Nf3"]);
    assert_eq!(state.halfmove_clock(), 1);
    assert_eq!(state.fullmove_number(), 1);
    assert_eq!(state.side_to_move(), Color::Black);

    play(&mut state, &["Nc6"]);
    assert_eq!(state.halfmove_clock(), 2);
    assert_eq!(state.fullmove_number(), 2);

    play(&mut state, &["e4"]);
    assert_eq!(state.halfmove_clock(), 0);
    assert_eq!(state.en_passant(), Some(sq("e3")));
    assert_eq!(state.history().len(), 4);
}

#[test]
fn test_apply_rejects_illegal_move() {
    let mut state = BoardState::new();
    let bogus = Move {
        from: sq("e2"),
        to: sq("e5"),
        piece: PieceKind::Pawn,
        promotion: None,
        capture: false,
        castle: None,
        en_passant: false,
    };
    let before = state.clone();
    let err = state.apply(bogus).unwrap_err();
    assert!(matches!(err, ChessEngineError::IllegalMove { .. }));
    assert_eq!(state, before);
}

#[test]
fn test_apply_rejects_move_exposing_king() {
    //! The e-file bishop is pinned against the king by the rook on e8
    let state = BoardState::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    assert!(state
        .legal_moves()
        .iter()
        .all(|m| m.piece != PieceKind::Bishop));
}

// ============================================================================
// Terminal states
// ============================================================================

#[test]
fn test_terminal_fools_mate() {
    let mut state = BoardState::new();
    play(&mut state, &["f3", "e5", "g4"]);
    assert_eq!(state.is_terminal(), None);

    play(&mut state, &["Qh4#"]);
    assert_eq!(
        state.is_terminal(),
        Some(TerminalKind::Checkmate {
            winner: Color::Black
        })
    );
    assert_eq!(state.is_terminal().map(TerminalKind::result), Some(GameResult::BlackWin));
}

#[test]
fn test_terminal_stalemate() {
    let state = BoardState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!state.is_in_check());
    assert_eq!(state.is_terminal(), Some(TerminalKind::Stalemate));
}

#[test]
fn test_terminal_bare_kings() {
    let state = BoardState::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(state.is_terminal(), Some(TerminalKind::InsufficientMaterial));
}

#[test]
fn test_terminal_same_colored_bishops_draw() {
    let state = BoardState::from_fen("8/8/8/4k3/8/3b4/8/4KB2 w - - 0 1").unwrap();
    assert_eq!(state.is_terminal(), Some(TerminalKind::InsufficientMaterial));

    let opposite = BoardState::from_fen("8/8/1b6/4k3/8/8/8/4KB2 w - - 0 1").unwrap();
    assert_eq!(opposite.is_terminal(), None);
}

#[test]
fn test_terminal_fifty_move_rule() {
    let state = BoardState::from_fen("8/8/8/4k3/8/8/R7/4K3 w - - 100 80").unwrap();
    assert_eq!(state.is_terminal(), Some(TerminalKind::FiftyMoveRule));

    let earlier = BoardState::from_fen("8/8/8/4k3/8/8/R7/4K3 w - - 99 80").unwrap();
    assert_eq!(earlier.is_terminal(), None);
}

#[test]
fn test_terminal_threefold_repetition() {
    let mut state = BoardState::new();
    play(&mut state, &["Nf3", "Nf6", "Ng1", "Ng8"]);
    assert_eq!(state.repetition_count(), 2);
    assert_eq!(state.is_terminal(), None);

    play(&mut state, &["Nf3", "Nf6", "Ng1", "Ng8"]);
    assert_eq!(state.repetition_count(), 3);
    assert_eq!(state.is_terminal(), Some(TerminalKind::ThreefoldRepetition));
}

#[test]
fn test_repetition_respects_castling_rights() {
    //! King walk returns to the same squares but rights differ, so no repetition
    let mut state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let start_key = state.position_key();
    play(&mut state, &["Ke2", "Ke7", "Ke1", "Ke8"]);
    assert_ne!(state.position_key(), start_key);
    assert_eq!(state.repetition_count(), 1);
}

// ============================================================================
// FEN
// ============================================================================

#[test]
fn test_fen_round_trip() {
    for fen in [constants::START_FEN, KIWIPETE, POSITION_3, POSITION_4, POSITION_5] {
        assert_eq!(BoardState::from_fen(fen).unwrap().to_fen(), fen);
    }
    assert_eq!(BoardState::new().to_fen(), constants::START_FEN);
}

#[test]
fn test_fen_counters_optional() {
    let state = BoardState::from_fen("8/8/8/4k3/8/8/8/4K3 b -").unwrap_err();
    assert!(matches!(state, ChessEngineError::InvalidFen { .. }));

    let state = BoardState::from_fen("8/8/8/4k3/8/8/8/4K3 b - -").unwrap();
    assert_eq!(state.halfmove_clock(), 0);
    assert_eq!(state.fullmove_number(), 1);
}

#[test]
fn test_fen_rejects_bad_positions() {
    for fen in [
        "8/8/8/8/8/8/8/8 w - - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
        "4k3/8/8/8/8/8/8/4K2r b - - 0 1",
    ] {
        assert!(BoardState::from_fen(fen).is_err(), "{fen} should be rejected");
    }
}

// ============================================================================
// Notation
// ============================================================================

#[test]
fn test_notation_san_and_uci_agree() {
    let state = BoardState::new();
    let san = resolve_notation(&state, "Nf3").unwrap();
    let uci = resolve_notation(&state, "g1f3").unwrap();
    assert_eq!(san, uci);
    assert_eq!(parse_uci(&state, "g1f3").unwrap(), san);
}

#[test]
fn test_notation_ignores_annotations() {
    let mut state = BoardState::new();
    play(&mut state, &["e4!", "e5?!", "Nf3!!", "Nc6", "Bb5+?"]);
    assert_eq!(state.fullmove_number(), 3);
}

#[test]
fn test_notation_ambiguous_knights() {
    //! Knights on b1 and f3 both reach d2
    let state = BoardState::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").unwrap();
    let err = resolve_notation(&state, "Nd2").unwrap_err();
    assert!(matches!(err, ChessEngineError::AmbiguousMove { candidates: 2, .. }));
    assert_eq!(resolve_notation(&state, "Nfd2").unwrap().from, sq("f3"));
    assert_eq!(resolve_notation(&state, "Nbd2").unwrap().from, sq("b1"));
    assert_eq!(resolve_notation(&state, "Nb1d2").unwrap().from, sq("b1"));
}

#[test]
fn test_notation_rejects_unresolvable() {
    let state = BoardState::new();
    assert!(matches!(
        resolve_notation(&state, "Nf6"),
        Err(ChessEngineError::NoMatchingMove { .. })
    ));
    assert!(matches!(
        resolve_notation(&state, "Zz9"),
        Err(ChessEngineError::InvalidNotation { .. })
    ));
    // Capture marker on a quiet move
    assert!(resolve_notation(&state, "Nxf3").is_err());
}

#[test]
fn test_notation_promotion_forms() {
    let state = BoardState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    let a = resolve_notation(&state, "a8=Q").unwrap();
    let b = resolve_notation(&state, "a8Q").unwrap();
    let c = resolve_notation(&state, "a7a8q").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!(resolve_notation(&state, "a8").is_err());
}

#[test]
fn test_to_san_rendering() {
    let mut state = BoardState::new();
    play(&mut state, &["f3", "e5", "g4"]);
    let mate = resolve_notation(&state, "d8h4").unwrap();
    assert_eq!(to_san(&state, &mate).unwrap(), "Qh4#");

    let state = BoardState::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").unwrap();
    let mv = resolve_notation(&state, "f3d2").unwrap();
    assert_eq!(to_san(&state, &mv).unwrap(), "Nfd2");

    let state = BoardState::from_fen("4k3/8/8/6N1/8/8/8/4K1N1 w - - 0 1").unwrap();
    let mv = resolve_notation(&state, "g1f3").unwrap();
    assert_eq!(to_san(&state, &mv).unwrap(), "N1f3");

    let castle = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = resolve_notation(&castle, "e1c1").unwrap();
    assert_eq!(to_san(&castle, &mv).unwrap(), "O-O-O");
}
