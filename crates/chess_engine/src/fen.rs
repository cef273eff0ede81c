//! FEN import/export
//!
//! Forsyth-Edwards Notation describes a position in six space-separated fields:
//! placement, side to move, castling rights, en passant target, half-move clock
//! and full-move number. The two counters may be omitted on input and default
//! to `0` and `1`.

use crate::board::BoardState;
use crate::constants::*;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::*;

impl BoardState {
    /// Parse a FEN string into a fresh state with a one-entry repetition history
    ///
    /// # Errors
    ///
    /// [`ChessEngineError::InvalidFen`] when a field is malformed, a side does
    /// not have exactly one king, or the side not to move is in check.
    pub fn from_fen(fen: &str) -> ChessEngineResult<BoardState> {
        let invalid = |reason: &str| ChessEngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(invalid("expected 4 to 6 fields"));
        }

        let board = parse_placement(fields[0]).map_err(|reason| invalid(&reason))?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("side to move must be 'w' or 'b'")),
        };

        let mut castling = CastlingRights::NONE;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                let (color, side) = match c {
                    'K' => (Color::White, CastleSide::King),
                    'Q' => (Color::White, CastleSide::Queen),
                    'k' => (Color::Black, CastleSide::King),
                    'q' => (Color::Black, CastleSide::Queen),
                    _ => return Err(invalid("unknown castling right")),
                };
                castling.insert(color, side);
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            square => {
                let square = Square::parse(square).map_err(|_| invalid("bad en passant square"))?;
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if square.rank() != expected_rank {
                    return Err(invalid("en passant square on wrong rank"));
                }
                Some(square)
            }
        };

        let halfmove_clock = match fields.get(4) {
            Some(text) => text.parse().map_err(|_| invalid("bad half-move clock"))?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(text) => text.parse().map_err(|_| invalid("bad full-move number"))?,
            None => 1,
        };
        if fullmove_number == 0 {
            return Err(invalid("full-move number starts at 1"));
        }

        for color in [Color::White, Color::Black] {
            let king = KING_ID * color.sign();
            if board.iter().filter(|&&piece| piece == king).count() != 1 {
                return Err(invalid("each side needs exactly one king"));
            }
        }
        if crate::move_gen::is_in_check(&board, side_to_move.opposite()) {
            return Err(invalid("side not to move is in check"));
        }

        Ok(BoardState::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    /// Render the current position as FEN
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for (c, color, side) in [
            ('K', Color::White, CastleSide::King),
            ('Q', Color::White, CastleSide::Queen),
            ('k', Color::Black, CastleSide::King),
            ('q', Color::Black, CastleSide::Queen),
        ] {
            if self.castling.has(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, en_passant, self.halfmove_clock, self.fullmove_number
        )
    }
}

fn parse_placement(placement: &str) -> Result<Board, String> {
    let mut board = [0i8; 64];
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err("placement needs 8 ranks".to_string());
    }

    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(format!("bad empty-square count '{}'", c));
                }
                file += skip as u8;
            } else {
                let kind = PieceKind::from_letter(c).ok_or_else(|| format!("unknown piece '{}'", c))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let square = Square::new(file, rank).ok_or_else(|| format!("rank {} overflows", rank + 1))?;
                if kind == PieceKind::Pawn && (rank == 0 || rank == 7) {
                    return Err("pawn on first or last rank".to_string());
                }
                board[square.index()] = Piece::new(color, kind).code();
                file += 1;
            }
            if file > 8 {
                return Err(format!("rank {} overflows", rank + 1));
            }
        }
        if file != 8 {
            return Err(format!("rank {} has {} files", rank + 1, file));
        }
    }

    Ok(board)
}
