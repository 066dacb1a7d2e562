//! # Query Parsing Module
//!
//! Turns the raw words of a `search` or `set` command into typed criteria.
//!
//! ## Query Shapes
//!
//! ```text
//! reel                 dance only
//! reel *=2             dance and difficulty
//! reel in d            dance and key ("in" is filler)
//! reel in em *g1       dance, key and difficulty
//! *l3                  difficulty only
//! ```
//!
//! Difficulty tokens are `*` followed by an operator (`=` equal, `l` less
//! than, `g` greater than) and a single digit.

use crate::error::{Result, TuneError};
use crate::tune::DIFFICULTY_MARKER;
use lazy_static::lazy_static;
use regex::Regex;

/// Musical mode family of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    /// Also covers dorian, which these tunes treat as a minor key.
    Minor,
}

const MAJOR_SUFFIXES: &[&str] = &["", "maj", "major", "+"];
const MINOR_SUFFIXES: &[&str] = &["m", "min", "minor", "dor", "dorian"];

impl Mode {
    /// Every way a key of this mode may be written after its letter.
    /// The first entry is the canonical one.
    #[must_use]
    pub const fn suffixes(self) -> &'static [&'static str] {
        match self {
            Mode::Major => MAJOR_SUFFIXES,
            Mode::Minor => MINOR_SUFFIXES,
        }
    }

    /// Classifies a suffix. Anything not listed as minor reads as major.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        if MINOR_SUFFIXES.contains(&suffix) {
            return Mode::Minor;
        }
        if !MAJOR_SUFFIXES.contains(&suffix) {
            log::debug!("Unknown mode suffix `{suffix}`, reading it as major");
        }
        Mode::Major
    }
}

/// A key letter together with its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub letter: char,
    pub mode: Mode,
}

impl KeySpec {
    /// All accepted spellings, e.g. `d, dmaj, dmajor, d+`.
    #[must_use]
    pub fn notations(&self) -> Vec<String> {
        self.mode
            .suffixes()
            .iter()
            .map(|suffix| format!("{}{suffix}", self.letter))
            .collect()
    }

    /// The spelling used by the transition weight table (`d`, `em`).
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}{}", self.letter, self.mode.suffixes()[0])
    }

    /// True if `token` is one of this key's spellings.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match chars.next() {
            Some(letter) if letter.to_ascii_lowercase() == self.letter => {
                self.mode.suffixes().contains(&chars.as_str())
            }
            _ => false,
        }
    }
}

/// Parses a key token: one letter, then an optional mode suffix.
pub fn parse_key(token: &str) -> Result<KeySpec> {
    let token = token.trim().to_lowercase();
    let mut chars = token.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(|| TuneError::MalformedQuery(format!("`{token}` is not a key")))?;

    Ok(KeySpec {
        letter,
        mode: Mode::from_suffix(chars.as_str()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Less,
    Greater,
}

impl Comparison {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(Comparison::Equal),
            'l' => Some(Comparison::Less),
            'g' => Some(Comparison::Greater),
            _ => None,
        }
    }

    #[must_use]
    pub fn apply(self, lhs: usize, rhs: usize) -> bool {
        match self {
            Comparison::Equal => lhs == rhs,
            Comparison::Less => lhs < rhs,
            Comparison::Greater => lhs > rhs,
        }
    }
}

/// Difficulty filter, compared against the length of a tune's marker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySpec {
    pub comparison: Comparison,
    pub level: usize,
}

impl DifficultySpec {
    #[must_use]
    pub fn matches(&self, level: usize) -> bool {
        self.comparison.apply(level, self.level)
    }
}

/// Parses `*=2`, `*l3`, `*g1`.
pub fn parse_difficulty(token: &str) -> Result<DifficultySpec> {
    let invalid = || TuneError::InvalidDifficultyFormat(token.to_string());
    let lowered = token.trim().to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();

    let &[marker, symbol, digit] = chars.as_slice() else {
        return Err(invalid());
    };
    if marker != DIFFICULTY_MARKER {
        return Err(invalid());
    }
    let comparison = Comparison::from_symbol(symbol).ok_or_else(invalid)?;
    let level = digit.to_digit(10).ok_or_else(invalid)? as usize;

    Ok(DifficultySpec { comparison, level })
}

fn is_difficulty_token(token: &str) -> bool {
    token.contains(DIFFICULTY_MARKER)
}

/// Parsed `search` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub dance: Option<String>,
    pub key: Option<KeySpec>,
    pub difficulty: Option<DifficultySpec>,
}

/// Parses the words of a search.
///
/// The first word is a dance or a difficulty. A second word is either a
/// difficulty or the filler before a key, which must then follow as the third
/// word. With more than three words the last one sets the difficulty.
pub fn parse_query<S: AsRef<str>>(tokens: &[S]) -> Result<Query> {
    let tokens: Vec<String> = tokens
        .iter()
        .map(|token| token.as_ref().trim().to_lowercase())
        .collect();

    let first = tokens
        .first()
        .ok_or_else(|| TuneError::MalformedQuery("the query is empty".to_string()))?;

    let mut query = Query::default();
    if is_difficulty_token(first) {
        query.difficulty = Some(parse_difficulty(first)?);
    } else {
        query.dance = Some(first.clone());
    }

    if let Some(second) = tokens.get(1) {
        if is_difficulty_token(second) {
            query.difficulty = Some(parse_difficulty(second)?);
        } else {
            let key = tokens.get(2).ok_or_else(|| {
                TuneError::MalformedQuery(format!("expected a key after `{second}`"))
            })?;
            query.key = Some(parse_key(key)?);
        }
    }

    if tokens.len() > 3 {
        if let Some(last) = tokens.last() {
            query.difficulty = Some(parse_difficulty(last)?);
        }
    }

    log::debug!("Parsed query {tokens:?} into {query:?}");
    Ok(query)
}

/// Removes a trailing difficulty word from `set` arguments.
pub fn split_difficulty_suffix(tokens: &mut Vec<String>) -> Result<Option<DifficultySpec>> {
    match tokens.last() {
        Some(last) if is_difficulty_token(last) => {
            let spec = parse_difficulty(last)?;
            tokens.pop();
            Ok(Some(spec))
        }
        _ => Ok(None),
    }
}

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#".*?(['"])(.*)(['"]).*"#).expect("valid title pattern");
}

/// Extracts a quoted title, e.g. `"'the kesh'"` gives `the kesh`.
#[must_use]
pub fn parse_title(text: &str) -> Option<String> {
    QUOTED
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}
