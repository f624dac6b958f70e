// src/exam/code.rs

use std::{fmt, str::FromStr, sync::LazyLock};

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of characters in a room code.
pub const CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Z]{6}$").expect("static pattern is valid"));

/// A short, human-enterable room code such as `ABC123`.
///
/// Codes are drawn uniformly at random and never checked against live
/// sessions, so two hosts can collide. With 36^6 codes and classroom-sized
/// traffic the risk is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Draws a fresh random code.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses user input. Surrounding whitespace is ignored and letters are upper-cased.
impl FromStr for SessionCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if !CODE_PATTERN.is_match(&code) {
            return Err(AppError::BadRequest("Invalid Exam ID.".to_string()));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for SessionCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}
