use crate::error::{Result, TuneError};
use serde::{Deserialize, Serialize};

/// Character used to spell out a difficulty level, one per step.
pub const DIFFICULTY_MARKER: char = '*';

/// One row of the tune list.
/// Every text field is lower-cased when the table is built.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TuneRecord {
    /// Zero-based position of the row in the source.
    /// The only identifier used when comparing or excluding tunes.
    pub id: usize,
    pub dance: String,
    pub title: String,
    /// Raw key notation, possibly several keys (`"dmaj, emin"`).
    pub key: String,
    pub instrument: String,
    /// A run of [`DIFFICULTY_MARKER`]s; its length is the level.
    pub difficulty: String,
}

impl TuneRecord {
    /// Difficulty level, i.e. the length of the marker run.
    #[must_use]
    pub fn difficulty_level(&self) -> usize {
        self.difficulty.trim().chars().count()
    }

    /// Tokens of the key field, split on whitespace and commas.
    pub fn key_tokens(&self) -> impl Iterator<Item = &str> {
        self.key
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
    }

    /// The first key written on the row, used to steer set generation.
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        self.key_tokens().next()
    }

    /// `Title (Key) **`, title-cased for display.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!(
            "{} ({}) {}",
            title_case(&self.title),
            title_case(&self.key),
            self.difficulty
        )
    }
}

/// Upper-cases the first letter of every word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = !c.is_alphanumeric() && c != '\'';
        }
    }
    out
}

/// 1-based column positions of each field in a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub dance: usize,
    pub title: usize,
    pub key: usize,
    /// Missing cells in this column are read as empty.
    pub instrument: usize,
    pub difficulty: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            dance: 1,
            title: 2,
            key: 3,
            instrument: 4,
            difficulty: 5,
        }
    }
}

impl ColumnLayout {
    /// Rejects zero positions, which would be meaningless 1-based.
    pub fn validate(&self) -> Result<()> {
        let all = [self.dance, self.title, self.key, self.instrument, self.difficulty];
        if all.contains(&0) {
            return Err(TuneError::Config(
                "column positions are counted from 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The whole tune list, in source order. Read-only once built.
#[derive(Debug, Clone)]
pub struct TuneTable {
    records: Vec<TuneRecord>,
}

impl TuneTable {
    /// Builds a table from already-split rows.
    ///
    /// Each record gets its row index as id and every value is lower-cased.
    /// Fails if there are no rows or a row lacks one of the required columns.
    pub fn from_rows<I, R, S>(origin: &str, rows: I, layout: &ColumnLayout) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        layout.validate()?;

        let mut records = Vec::new();
        for (id, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let cell = |column: usize, name: &str| -> Result<String> {
                row.get(column - 1)
                    .map(|value| value.as_ref().trim().to_lowercase())
                    .ok_or_else(|| {
                        TuneError::load(
                            origin,
                            format!("row {} has no {name} column ({column})", id + 1),
                        )
                    })
            };

            records.push(TuneRecord {
                id,
                dance: cell(layout.dance, "dance")?,
                title: cell(layout.title, "title")?,
                key: cell(layout.key, "key")?,
                instrument: cell(layout.instrument, "instrument").unwrap_or_default(),
                difficulty: cell(layout.difficulty, "difficulty")?,
            });
        }

        if records.is_empty() {
            return Err(TuneError::load(origin, "the tune list is empty"));
        }

        log::info!("Loaded {} tunes from {origin}", records.len());
        Ok(Self { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&TuneRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TuneRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[TuneRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a TuneTable {
    type Item = &'a TuneRecord;
    type IntoIter = std::slice::Iter<'a, TuneRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
