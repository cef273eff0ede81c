//! Tests for movetext parsing and game reduction

use chess_engine::{Color, GameResult};

use super::*;

fn record(moves: &[&str]) -> RawGameRecord {
    RawGameRecord::from_notations(moves.iter().copied())
}

// ============================================================================
// Movetext parsing
// ============================================================================

#[test]
fn test_movetext_strips_numbers_and_reads_result() {
    let parsed = RawGameRecord::from_movetext("1. e4 e5 2. Nf3 Nc6 3...a6 1-0").unwrap();
    let notations: Vec<&str> = parsed.moves.iter().map(|m| m.notation.as_str()).collect();
    assert_eq!(notations, vec!["e4", "e5", "Nf3", "Nc6", "a6"]);
    assert_eq!(parsed.result.as_deref(), Some("1-0"));
}

#[test]
fn test_movetext_attaches_annotations() {
    let parsed =
        RawGameRecord::from_movetext("1.e4!? {best by test} e5 $2 (1...c5 2.Nf3) 2.Nf3 ; main line")
            .unwrap();
    assert_eq!(parsed.moves.len(), 3);
    assert_eq!(parsed.moves[0].notation, "e4");
    assert_eq!(parsed.moves[0].annotations, vec!["!?", "best by test"]);
    assert_eq!(parsed.moves[1].annotations, vec!["$2"]);
    assert_eq!(parsed.moves[2].notation, "Nf3");
    assert_eq!(parsed.moves[2].annotations, vec!["main line"]);
    assert_eq!(parsed.result, None);
}

#[test]
fn test_movetext_without_numbers() {
    //! Reduced one-game-per-line dumps carry bare moves and a result
    let parsed = RawGameRecord::from_movetext("e4 e5 Qh5 Nc6 Bc4 Nf6 Qxf7# 1-0").unwrap();
    assert_eq!(parsed.moves.len(), 7);
    assert_eq!(parsed.moves[6].notation, "Qxf7#");
}

#[test]
fn test_movetext_rejects_broken_input() {
    for text in ["1. e4 {unterminated", "1. e4 (1. d4", "1. e4 ) e5", "1. e4 1-0 e5"] {
        assert!(
            matches!(
                RawGameRecord::from_movetext(text),
                Err(MalformedGame::Unparsable { .. })
            ),
            "{text}"
        );
    }
}

#[test]
fn test_movetext_round_trip_through_record() {
    let parsed = RawGameRecord::from_movetext("1. d4 d5 2. c4 1/2-1/2").unwrap();
    assert_eq!(parsed.to_movetext(), "d4 d5 c4 1/2-1/2");
    assert_eq!(RawGameRecord::from_movetext(&parsed.to_movetext()).unwrap(), parsed);
}

// ============================================================================
// Reduction
// ============================================================================

#[test]
fn test_reduce_fools_mate() {
    let parsed = RawGameRecord::from_movetext("1. f3 e5 2. g4 Qh4# 0-1").unwrap();
    let game = GameReducer::new().reduce(&parsed).unwrap();
    assert_eq!(game.len(), 4);
    assert_eq!(game.result(), GameResult::BlackWin);
    assert_eq!(game.initial_side(), Color::White);
    assert_eq!(game.move_strings(), vec!["f2f3", "e7e5", "g2g4", "d8h4"]);
}

#[test]
fn test_reduce_missing_result_is_unknown() {
    let game = GameReducer::new().reduce(&record(&["e4", "e5"])).unwrap();
    assert_eq!(game.result(), GameResult::Unknown);
}

#[test]
fn test_reduce_does_not_infer_result_from_mate() {
    //! The position is mate, but nothing was declared
    let game = GameReducer::new()
        .reduce(&record(&["f3", "e5", "g4", "Qh4#"]))
        .unwrap();
    assert_eq!(game.result(), GameResult::Unknown);
    assert!(game.ends_in_checkmate());
}

#[test]
fn test_checkmate_flag_follows_the_board_not_the_result() {
    let reducer = GameReducer::new();
    let resigned = reducer.reduce(&record(&["e4", "e5"]).with_result("1-0")).unwrap();
    assert!(!resigned.ends_in_checkmate());
    assert!(!reducer.reduce(&record(&["e4", "e5", "Qh5", "Ke7"])).unwrap().ends_in_checkmate());
    assert!(reducer
        .reduce(&record(&["e4", "e5", "Qh5", "Ke7", "Qxe5#"]))
        .unwrap()
        .ends_in_checkmate());
}

#[test]
fn test_reduce_trailing_result_token() {
    let game = GameReducer::new()
        .reduce(&record(&["e4", "e5", "1/2-1/2"]))
        .unwrap();
    assert_eq!(game.len(), 2);
    assert_eq!(game.result(), GameResult::Draw);

    let conflicting = record(&["e4", "e5", "1-0"]).with_result("0-1");
    assert!(matches!(
        GameReducer::new().reduce(&conflicting),
        Err(MalformedGame::ConflictingResult { .. })
    ));
}

#[test]
fn test_reduce_rejects_illegal_move_entirely() {
    let err = GameReducer::new()
        .reduce(&record(&["e4", "e5", "Ke3"]))
        .unwrap_err();
    assert!(matches!(err, MalformedGame::IllegalMove { ply: 3, .. }), "{err}");
    assert_eq!(err.kind(), "illegal_move");
}

#[test]
fn test_reduce_rejects_ambiguous_move() {
    let ambiguous = record(&["Nd2"]).with_start_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1");
    assert!(matches!(
        GameReducer::new().reduce(&ambiguous),
        Err(MalformedGame::AmbiguousMove { ply: 1, candidates: 2, .. })
    ));
}

#[test]
fn test_reduce_rejects_moves_after_mate() {
    let err = GameReducer::new()
        .reduce(&record(&["f3", "e5", "g4", "Qh4#", "Kf2"]))
        .unwrap_err();
    assert!(matches!(err, MalformedGame::IllegalMove { ply: 5, .. }));
}

#[test]
fn test_reduce_rejects_empty_and_bad_input() {
    let reducer = GameReducer::new();
    assert_eq!(reducer.reduce(&record(&[])), Err(MalformedGame::Empty));
    assert_eq!(reducer.reduce(&record(&["1-0"])), Err(MalformedGame::Empty));
    assert!(matches!(
        reducer.reduce(&record(&["e4"]).with_start_fen("not a fen")),
        Err(MalformedGame::InvalidStart { .. })
    ));
    assert!(matches!(
        reducer.reduce(&record(&["e4"]).with_result("2-0")),
        Err(MalformedGame::InvalidResult { .. })
    ));
    assert!(matches!(
        reducer.reduce(&record(&["e4", "Zz9"])),
        Err(MalformedGame::InvalidNotation { ply: 2, .. })
    ));
}

#[test]
fn test_reduce_custom_start_position() {
    let game = GameReducer::new()
        .reduce(&record(&["Kb2"]).with_start_fen("8/8/8/8/8/8/8/K6k w - - 0 1"))
        .unwrap();
    assert_eq!(game.start_fen(), Some("8/8/8/8/8/8/8/K6k w - - 0 1"));
    assert_eq!(game.start_position().unwrap().to_fen(), "8/8/8/8/8/8/8/K6k w - - 0 1");
}

#[test]
fn test_san_and_uci_records_reduce_identically() {
    let reducer = GameReducer::new();
    let san = reducer
        .reduce(&record(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "O-O"]).with_result("*"))
        .unwrap();
    let uci = reducer
        .reduce(&record(&["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "e1g1"]).with_result("*"))
        .unwrap();
    assert_eq!(san, uci);
}

#[test]
fn test_to_record_reduces_back_to_same_game() {
    let reducer = GameReducer::new();
    let game = reducer
        .reduce(&record(&["d4", "d5", "c4", "dxc4", "e3", "b5", "a4", "c6", "axb5", "cxb5"]).with_result("1-0"))
        .unwrap();
    let again = reducer.reduce(&game.to_record()).unwrap();
    assert_eq!(again, game);
}

// ============================================================================
// Corpus report
// ============================================================================

#[test]
fn test_reduce_corpus_counts_by_reason() {
    let records = vec![
        record(&["e4", "e5"]),
        record(&["e4", "e4"]),
        record(&[]),
        record(&["d4"]).with_result("1-0"),
        record(&["Qh5"]),
    ];
    let (games, report) = GameReducer::new().reduce_corpus(&records);

    assert_eq!(games.len(), 2);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 3);
    assert_eq!(report.total(), 5);
    assert_eq!(report.rejected_by_reason.get("illegal_move"), Some(&2));
    assert_eq!(report.rejected_by_reason.get("empty"), Some(&1));
    assert!(report.to_string().contains("2 accepted, 3 rejected"));
}
