//! Raw game records
//!
//! [`RawGameRecord`] is the input format of the reducer: a list of move
//! notations with optional annotations and an optional declared result, as an
//! external PGN parser would hand it over. Records also round-trip through
//! JSON, which is how reduced corpora are stored between pipeline stages.
//!
//! [`RawGameRecord::from_movetext`] reads the one-game-per-line movetext
//! layout used by reduced PGN dumps:
//!
//! ```text
//! 1. e4 e5 2. Nf3 {main line} Nc6 3. Bb5 $1 a6 ; Ruy Lopez
//! 1-0
//! ```
//!
//! Move numbers are skipped, `{...}` and `;` comments and `$n` NAGs are kept
//! as annotations of the preceding move, `(...)` variations are dropped and a
//! trailing result token becomes the declared result.

use serde::{Deserialize, Serialize};

use super::MalformedGame;

/// One move as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawMove {
    pub notation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl RawMove {
    pub fn new(notation: impl Into<String>) -> Self {
        RawMove {
            notation: notation.into(),
            annotations: Vec::new(),
        }
    }
}

/// One unvalidated game
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawGameRecord {
    /// Starting position, standard initial position when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_fen: Option<String>,
    pub moves: Vec<RawMove>,
    /// Declared outcome as a PGN result token (`1-0`, `0-1`, `1/2-1/2`, `*`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

const RESULT_TOKENS: [&str; 5] = ["1-0", "0-1", "1/2-1/2", "½-½", "*"];

impl RawGameRecord {
    /// Record from bare notations, no annotations or result
    pub fn from_notations<I, S>(notations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawGameRecord {
            start_fen: None,
            moves: notations.into_iter().map(RawMove::new).collect(),
            result: None,
        }
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_start_fen(mut self, fen: impl Into<String>) -> Self {
        self.start_fen = Some(fen.into());
        self
    }

    /// Parse one line (or block) of movetext
    ///
    /// # Errors
    ///
    /// [`MalformedGame::Unparsable`] for unterminated comments or variations
    /// and for moves written after the result token.
    pub fn from_movetext(text: &str) -> Result<Self, MalformedGame> {
        let unparsable = |reason: &str| MalformedGame::Unparsable {
            reason: reason.to_string(),
        };

        let mut record = RawGameRecord::default();
        let mut chars = text.chars().peekable();
        let mut word = String::new();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    record.push_word(&mut word)?;
                    let mut comment = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(inner) => comment.push(inner),
                            None => return Err(unparsable("unterminated '{' comment")),
                        }
                    }
                    record.annotate(comment.trim());
                }
                ';' => {
                    record.push_word(&mut word)?;
                    let mut comment = String::new();
                    while let Some(&inner) = chars.peek() {
                        if inner == '\n' {
                            break;
                        }
                        comment.push(inner);
                        chars.next();
                    }
                    record.annotate(comment.trim());
                }
                '(' => {
                    record.push_word(&mut word)?;
                    let mut depth = 1usize;
                    while depth > 0 {
                        match chars.next() {
                            Some('(') => depth += 1,
                            Some(')') => depth -= 1,
                            Some(_) => {}
                            None => return Err(unparsable("unterminated '(' variation")),
                        }
                    }
                }
                ')' => return Err(unparsable("unbalanced ')'")),
                c if c.is_whitespace() => record.push_word(&mut word)?,
                c => word.push(c),
            }
        }
        record.push_word(&mut word)?;
        Ok(record)
    }

    fn annotate(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.moves.last_mut() {
            last.annotations.push(text.to_string());
        }
    }

    fn push_word(&mut self, word: &mut String) -> Result<(), MalformedGame> {
        if word.is_empty() {
            return Ok(());
        }
        let taken = std::mem::take(word);

        if self.result.is_some() {
            return Err(MalformedGame::Unparsable {
                reason: format!("'{}' follows the result token", taken),
            });
        }
        if RESULT_TOKENS.contains(&taken.as_str()) {
            self.result = Some(taken);
            return Ok(());
        }
        if taken == "e.p." {
            return Ok(());
        }
        if let Some(nag) = taken.strip_prefix('$') {
            if !nag.is_empty() && nag.chars().all(|c| c.is_ascii_digit()) {
                self.annotate(&taken);
                return Ok(());
            }
        }

        // "12." / "12..." / "12.e4"
        let body = taken.trim_start_matches(|c: char| c.is_ascii_digit());
        let body = if body.len() < taken.len() && body.starts_with('.') {
            body.trim_start_matches('.')
        } else {
            taken.as_str()
        };
        if body.is_empty() {
            return Ok(());
        }

        // "e4!?" -> notation "e4", annotation "!?"
        let notation = body.trim_end_matches(['!', '?']);
        let mut raw = RawMove::new(notation);
        if notation.len() < body.len() {
            raw.annotations.push(body[notation.len()..].to_string());
        }
        self.moves.push(raw);
        Ok(())
    }

    /// Render back to a single movetext line
    pub fn to_movetext(&self) -> String {
        let mut parts: Vec<&str> = self.moves.iter().map(|m| m.notation.as_str()).collect();
        if let Some(result) = &self.result {
            parts.push(result);
        }
        parts.join(" ")
    }
}
