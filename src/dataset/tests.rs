//! Tests for training window construction
//!
//! The fool's mate game tokenizes to eight tokens:
//! `START SIDE_WHITE f2f3 e7e5 g2g4 d8h4 RESULT_BLACK_WIN END`.

use std::sync::Arc;

use super::*;
use crate::codec::Vocabulary;
use crate::reducer::{GameReducer, RawGameRecord};

fn game(moves: &[&str], result: &str) -> CanonicalGame {
    GameReducer::new()
        .reduce(&RawGameRecord::from_notations(moves.iter().copied()).with_result(result))
        .unwrap()
}

fn fools_mate() -> CanonicalGame {
    game(&["f3", "e5", "g4", "Qh4#"], "0-1")
}

fn codec_for(games: &[CanonicalGame]) -> MoveCodec {
    MoveCodec::new(Arc::new(MoveCodec::fit(games)))
}

fn real_targets(example: &TrainingExample) -> Vec<Token> {
    example
        .target
        .iter()
        .zip(&example.mask)
        .filter(|&(_, &real)| real)
        .map(|(token, _)| *token)
        .collect()
}

// ============================================================================
// Per-game windows
// ============================================================================

#[test]
fn test_disjoint_windows_cover_every_target_once() {
    let games = vec![fools_mate()];
    let codec = codec_for(&games);
    let tokens = codec.tokenize_game(&games[0]);
    let examples: Vec<_> = ExampleBuilder::new(4).unwrap().build(&codec, &games).collect();

    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].input, tokens[0..4].to_vec());
    assert_eq!(examples[0].target, tokens[1..5].to_vec());
    assert_eq!(examples[0].mask, vec![true; 4]);

    let pad = SpecialToken::Pad.token();
    assert_eq!(examples[1].input, vec![tokens[4], tokens[5], tokens[6], pad]);
    assert_eq!(examples[1].target, vec![tokens[5], tokens[6], tokens[7], pad]);
    assert_eq!(examples[1].mask, vec![true, true, true, false]);
    assert_eq!(examples[1].valid_len(), 3);

    let covered: Vec<Token> = examples.iter().flat_map(real_targets).collect();
    assert_eq!(covered, tokens[1..].to_vec());
}

#[test]
fn test_overlapping_windows_stop_at_game_end() {
    let games = vec![fools_mate()];
    let codec = codec_for(&games);
    let tokens = codec.tokenize_game(&games[0]);
    let builder = ExampleBuilder::with_options(4, 1, BoundaryMode::PerGame).unwrap();
    let examples: Vec<_> = builder.build(&codec, &games).collect();

    assert_eq!(examples.len(), 4);
    for (offset, example) in examples.iter().enumerate() {
        assert_eq!(example.input, tokens[offset..offset + 4].to_vec());
        assert_eq!(example.target, tokens[offset + 1..offset + 5].to_vec());
        assert!(example.mask.iter().all(|&real| real));
    }
}

#[test]
fn test_window_longer_than_game_is_padded() {
    let games = vec![game(&["e4"], "*")];
    let codec = codec_for(&games);
    let examples: Vec<_> = ExampleBuilder::new(8).unwrap().build(&codec, &games).collect();

    assert_eq!(examples.len(), 1);
    let example = &examples[0];
    assert_eq!(example.valid_len(), 3);
    assert_eq!(example.input.len(), 8);
    for i in 3..8 {
        assert!(!example.mask[i]);
        assert_eq!(example.input[i], SpecialToken::Pad.token());
        assert_eq!(example.target[i], SpecialToken::Pad.token());
    }
}

#[test]
fn test_per_game_windows_never_cross_games() {
    let games = vec![
        fools_mate(),
        game(&["e4", "e5", "Nf3", "Nc6", "Bb5"], "1/2-1/2"),
        game(&["d4"], "*"),
    ];
    let codec = codec_for(&games);
    let start = SpecialToken::Start.token();
    let end = SpecialToken::End.token();

    for stride in 1..=5 {
        let builder = ExampleBuilder::with_options(5, stride, BoundaryMode::PerGame).unwrap();
        for example in builder.build(&codec, &games) {
            let real = example.valid_len();
            // START only ever opens a window, END only ever closes one
            assert!(example.input[1..real].iter().all(|&t| t != start));
            assert!(example.input[..real].iter().all(|&t| t != end));
        }
    }
}

#[test]
fn test_checkmate_label_marks_only_the_mating_target() {
    let games = vec![fools_mate(), game(&["e4", "e5", "Qh5", "Ke7", "Qxe5#"], "1-0")];
    let codec = codec_for(&games);
    let examples: Vec<_> = ExampleBuilder::new(4).unwrap().build(&codec, &games).collect();

    assert_eq!(examples[0].checkmate, vec![false; 4]);
    assert_eq!(examples[1].checkmate, vec![true, false, false, false]);
    assert_eq!(examples[1].target[0], codec.vocabulary().token("d8h4").unwrap());

    let labelled: Vec<Token> = examples
        .iter()
        .flat_map(|e| {
            e.target
                .iter()
                .zip(&e.checkmate)
                .filter(|&(_, &mates)| mates)
                .map(|(token, _)| *token)
                .collect::<Vec<_>>()
        })
        .collect();
    let qxe5 = codec.vocabulary().token("h5e5").unwrap();
    assert_eq!(labelled, vec![codec.vocabulary().token("d8h4").unwrap(), qxe5]);
}

#[test]
fn test_checkmate_label_needs_a_mating_move() {
    //! A declared win without mate on the board carries no label
    let games = vec![game(&["e4", "e5", "Nf3"], "1-0")];
    let codec = codec_for(&games);
    for example in ExampleBuilder::with_options(3, 1, BoundaryMode::Packed)
        .unwrap()
        .build(&codec, &games)
    {
        assert!(example.checkmate.iter().all(|&mates| !mates));
    }
}

// ============================================================================
// Packed windows
// ============================================================================

#[test]
fn test_packed_windows_only_join_games_at_end_start() {
    let games = vec![fools_mate(), fools_mate(), game(&["e4", "c5"], "*")];
    let codec = codec_for(&games);
    let start = SpecialToken::Start.token();
    let end = SpecialToken::End.token();
    let builder = ExampleBuilder::with_options(6, 3, BoundaryMode::Packed).unwrap();

    let mut saw_boundary = false;
    for example in builder.build(&codec, &games) {
        for i in 0..example.valid_len() {
            if example.input[i] == end {
                assert_eq!(example.target[i], start);
                saw_boundary = true;
            }
            if example.target[i] == start {
                assert_eq!(example.input[i], end);
            }
        }
    }
    assert!(saw_boundary);
}

#[test]
fn test_packed_disjoint_windows_cover_stream() {
    let games = vec![fools_mate(), game(&["e4", "c5"], "*")];
    let codec = codec_for(&games);
    let stream: Vec<Token> = games.iter().flat_map(|g| codec.tokenize_game(g)).collect();
    let builder = ExampleBuilder::with_options(5, 5, BoundaryMode::Packed).unwrap();

    let covered: Vec<Token> = builder.build(&codec, &games).flat_map(|e| real_targets(&e)).collect();
    assert_eq!(covered, stream[1..].to_vec());
}

// ============================================================================
// Laziness and determinism
// ============================================================================

#[test]
fn test_build_is_restartable() {
    let games = vec![fools_mate(), game(&["e4", "e5", "Nf3"], "*")];
    let codec = codec_for(&games);
    let builder = ExampleBuilder::with_options(3, 2, BoundaryMode::Packed).unwrap();

    let first: Vec<_> = builder.build(&codec, &games).collect();
    let second: Vec<_> = builder.build(&codec, &games).collect();
    assert_eq!(first, second);

    let mut iter = builder.build(&codec, &games);
    iter.next();
    let fork = iter.clone();
    assert_eq!(iter.collect::<Vec<_>>(), fork.collect::<Vec<_>>());
}

#[test]
fn test_empty_corpus_yields_nothing() {
    let codec = MoveCodec::new(Arc::new(Vocabulary::fit(Vec::<String>::new())));
    for boundary in [BoundaryMode::PerGame, BoundaryMode::Packed] {
        let builder = ExampleBuilder::with_options(4, 4, boundary).unwrap();
        assert_eq!(builder.build(&codec, &[]).count(), 0);
    }
}

#[test]
fn test_builder_rejects_bad_parameters() {
    assert!(ExampleBuilder::new(0).is_err());
    assert!(ExampleBuilder::with_options(4, 0, BoundaryMode::PerGame).is_err());
    assert!(ExampleBuilder::with_options(4, 5, BoundaryMode::Packed).is_err());
}

// ============================================================================
// Split and export
// ============================================================================

#[test]
fn test_split_games_is_seeded() {
    let games: Vec<CanonicalGame> = (0..40).map(|_| fools_mate()).collect();
    let (train_a, val_a) = split_games(games.clone(), 0.25, 7);
    let (train_b, val_b) = split_games(games.clone(), 0.25, 7);
    assert_eq!(train_a.len(), train_b.len());
    assert_eq!(val_a.len(), val_b.len());
    assert_eq!(train_a.len() + val_a.len(), 40);

    let (train, validation) = split_games(games, 0.0, 7);
    assert_eq!(train.len(), 40);
    assert!(validation.is_empty());
}

#[test]
fn test_write_jsonl_lines_parse_back() {
    let games = vec![fools_mate()];
    let codec = codec_for(&games);
    let examples: Vec<_> = ExampleBuilder::new(4).unwrap().build(&codec, &games).collect();

    let mut buffer = Vec::new();
    let written = write_jsonl(&mut buffer, examples.clone()).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(buffer).unwrap();
    let parsed: Vec<TrainingExample> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(parsed, examples);
    assert!(text.lines().next().unwrap().starts_with("{\"input\":[0,4,"));
    assert!(text.lines().nth(1).unwrap().ends_with("\"checkmate\":[true,false,false,false]}"));
}
