//! Move notation
//!
//! Reads SAN (`Nf3`, `exd5`, `O-O`, `e8=Q+`) and UCI long algebraic (`g1f3`,
//! `e7e8q`) move text and resolves it against the legal moves of a position,
//! and renders legal moves back to SAN.
//!
//! ## Resolution
//!
//! Text never becomes a [`Move`] on its own. Parsing produces a set of
//! constraints (piece kind, destination, origin file/rank, promotion piece,
//! capture marker) and the position's legal move list is filtered by them.
//! Exactly one survivor is a match; none is [`ChessEngineError::NoMatchingMove`]
//! and several is [`ChessEngineError::AmbiguousMove`].
//!
//! Check, mate and evaluation suffixes (`+ # ! ?`) are ignored.

use crate::board::BoardState;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::*;

/// Constraints read from one piece of move text
#[derive(Debug, Default)]
struct MovePattern {
    piece: Option<PieceKind>,
    from: Option<Square>,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Option<Square>,
    promotion: Option<PieceKind>,
    castle: Option<CastleSide>,
    capture: bool,
}

impl MovePattern {
    fn matches(&self, mv: &Move) -> bool {
        if let Some(side) = self.castle {
            return mv.castle == Some(side);
        }
        self.piece.is_none_or(|piece| mv.piece == piece)
            && self.from.is_none_or(|from| mv.from == from)
            && self.from_file.is_none_or(|file| mv.from.file() == file)
            && self.from_rank.is_none_or(|rank| mv.from.rank() == rank)
            && self.to.is_none_or(|to| mv.to == to)
            && mv.promotion == self.promotion
            && (!self.capture || mv.capture)
    }
}

/// Resolve SAN or UCI text to the one legal move it denotes
///
/// # Examples
///
/// ```rust,ignore
/// let state = BoardState::new();
/// let mv = resolve_notation(&state, "Nf3")?;
/// assert_eq!(mv.uci(), "g1f3");
/// assert_eq!(resolve_notation(&state, "g1f3")?, mv);
/// ```
pub fn resolve_notation(state: &BoardState, text: &str) -> ChessEngineResult<Move> {
    let pattern = parse_pattern(text)?;
    let mut candidates = state.legal_moves().into_iter().filter(|mv| pattern.matches(mv));

    match (candidates.next(), candidates.next()) {
        (Some(mv), None) => Ok(mv),
        (None, _) => Err(ChessEngineError::NoMatchingMove {
            notation: text.to_string(),
        }),
        (Some(_), Some(_)) => Err(ChessEngineError::AmbiguousMove {
            notation: text.to_string(),
            candidates: 2 + candidates.count(),
        }),
    }
}

/// Resolve UCI text (`e2e4`, `e7e8q`) against a position
pub fn parse_uci(state: &BoardState, text: &str) -> ChessEngineResult<Move> {
    let pattern = parse_uci_pattern(text).ok_or_else(|| ChessEngineError::InvalidNotation {
        notation: text.to_string(),
        reason: "not UCI long algebraic".to_string(),
    })?;
    state
        .legal_moves()
        .into_iter()
        .find(|mv| pattern.matches(mv))
        .ok_or_else(|| ChessEngineError::NoMatchingMove {
            notation: text.to_string(),
        })
}

fn parse_uci_pattern(text: &str) -> Option<MovePattern> {
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return None;
    }
    let from = Square::parse(&text[0..2]).ok()?;
    let to = Square::parse(&text[2..4]).ok()?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c @ ('q' | 'r' | 'b' | 'n')) => Some(PieceKind::from_letter(c)?),
        Some(_) => return None,
    };
    Some(MovePattern {
        from: Some(from),
        to: Some(to),
        promotion,
        ..MovePattern::default()
    })
}

fn parse_pattern(text: &str) -> ChessEngineResult<MovePattern> {
    let invalid = |reason: &str| ChessEngineError::InvalidNotation {
        notation: text.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = text
        .trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .trim_end_matches("e.p.")
        .trim_end();
    if trimmed.is_empty() {
        return Err(invalid("empty move"));
    }

    match trimmed {
        "O-O" | "0-0" => {
            return Ok(MovePattern {
                castle: Some(CastleSide::King),
                ..MovePattern::default()
            })
        }
        "O-O-O" | "0-0-0" => {
            return Ok(MovePattern {
                castle: Some(CastleSide::Queen),
                ..MovePattern::default()
            })
        }
        _ => {}
    }

    if let Some(pattern) = parse_uci_pattern(trimmed) {
        return Ok(pattern);
    }

    let mut body: &str = trimmed;
    let mut pattern = MovePattern::default();

    // Promotion: "e8=Q", "e8Q", "e8=q"
    if let Some((head, promo)) = body.split_once('=') {
        let mut chars = promo.chars();
        let kind = chars
            .next()
            .and_then(PieceKind::from_letter)
            .ok_or_else(|| invalid("bad promotion piece"))?;
        if chars.next().is_some() {
            return Err(invalid("trailing text after promotion"));
        }
        pattern.promotion = Some(kind);
        body = head;
    } else if body.len() >= 3 {
        let bytes = body.as_bytes();
        let last = bytes[bytes.len() - 1] as char;
        let before = bytes[bytes.len() - 2] as char;
        if matches!(last, 'Q' | 'R' | 'B' | 'N') && before.is_ascii_digit() {
            pattern.promotion = PieceKind::from_letter(last);
            body = &body[..body.len() - 1];
        }
    }
    if matches!(pattern.promotion, Some(PieceKind::Pawn | PieceKind::King)) {
        return Err(invalid("cannot promote to pawn or king"));
    }

    let mut chars: Vec<char> = body.chars().collect();
    if let Some(&first) = chars.first() {
        if matches!(first, 'N' | 'B' | 'R' | 'Q' | 'K') {
            pattern.piece = PieceKind::from_letter(first);
            chars.remove(0);
        } else {
            pattern.piece = Some(PieceKind::Pawn);
        }
    }

    pattern.capture = chars.iter().any(|&c| c == 'x' || c == ':');
    chars.retain(|&c| !matches!(c, 'x' | ':' | '-'));

    if chars.len() < 2 {
        return Err(invalid("missing destination square"));
    }
    let dest: String = chars[chars.len() - 2..].iter().collect();
    pattern.to = Some(Square::parse(&dest).map_err(|_| invalid("bad destination square"))?);

    for &c in &chars[..chars.len() - 2] {
        match c {
            'a'..='h' if pattern.from_file.is_none() => pattern.from_file = Some(c as u8 - b'a'),
            '1'..='8' if pattern.from_rank.is_none() => pattern.from_rank = Some(c as u8 - b'1'),
            _ => return Err(invalid("bad disambiguation")),
        }
    }

    Ok(pattern)
}

/// Render a legal move of `state` in SAN, with `+`/`#` suffix
///
/// # Errors
///
/// [`ChessEngineError::IllegalMove`] if `mv` is not legal in `state`.
pub fn to_san(state: &BoardState, mv: &Move) -> ChessEngineResult<String> {
    let legal = state.legal_moves();
    if !legal.contains(mv) {
        return Err(ChessEngineError::IllegalMove {
            uci: mv.uci(),
            fen: state.to_fen(),
        });
    }

    let mut san = String::with_capacity(8);
    match mv.castle {
        Some(CastleSide::King) => san.push_str("O-O"),
        Some(CastleSide::Queen) => san.push_str("O-O-O"),
        None => {
            if let Some(letter) = mv.piece.san_letter() {
                san.push(letter);

                let rivals: Vec<&Move> = legal
                    .iter()
                    .filter(|other| {
                        other.piece == mv.piece && other.to == mv.to && other.from != mv.from
                    })
                    .collect();
                if !rivals.is_empty() {
                    let file_unique = rivals.iter().all(|other| other.from.file() != mv.from.file());
                    let rank_unique = rivals.iter().all(|other| other.from.rank() != mv.from.rank());
                    if file_unique {
                        san.push(mv.from.file_char());
                    } else if rank_unique {
                        san.push(mv.from.rank_char());
                    } else {
                        san.push_str(&mv.from.to_string());
                    }
                }
            } else if mv.capture {
                san.push(mv.from.file_char());
            }

            if mv.capture {
                san.push('x');
            }
            san.push_str(&mv.to.to_string());

            if let Some(promotion) = mv.promotion.and_then(PieceKind::san_letter) {
                san.push('=');
                san.push(promotion);
            }
        }
    }

    let mut after = state.clone();
    after.play_unchecked(*mv);
    if after.is_in_check() {
        san.push(if after.legal_moves().is_empty() { '#' } else { '+' });
    }

    Ok(san)
}
