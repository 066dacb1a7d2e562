//! The loaded tune list together with its key weights: the entry point the
//! command line talks to.

use crate::config::Settings;
use crate::error::{Result, TuneError};
use crate::filter::{filter, Criteria};
use crate::loader;
use crate::query::{parse_query, split_difficulty_suffix};
use crate::sequence::{SetGenerator, SetOptions};
use crate::tune::{TuneRecord, TuneTable};
use crate::weights::TransitionWeights;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct TuneList {
    table: TuneTable,
    weights: TransitionWeights,
}

impl TuneList {
    #[must_use]
    pub fn new(table: TuneTable, weights: TransitionWeights) -> Self {
        Self { table, weights }
    }

    /// Loads the table and weights named by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let table = loader::load_table(&settings.source, &settings.load_options())?;
        let weights = match &settings.weights {
            Some(path) => TransitionWeights::load(path)?,
            None => TransitionWeights::builtin().clone(),
        };
        Ok(Self::new(table, weights))
    }

    #[must_use]
    pub fn table(&self) -> &TuneTable {
        &self.table
    }

    #[must_use]
    pub fn weights(&self) -> &TransitionWeights {
        &self.weights
    }

    /// Runs a search query, optionally narrowed by a title substring.
    /// An empty result is not an error.
    pub fn search<S: AsRef<str>>(&self, tokens: &[S], title: Option<&str>) -> Result<Vec<&TuneRecord>> {
        let mut criteria = match (tokens.is_empty(), title) {
            (true, Some(_)) => Criteria::default(),
            (true, None) => {
                return Err(TuneError::MalformedQuery("nothing to search for".to_string()));
            }
            (false, _) => Criteria::from(parse_query(tokens)?),
        };
        if let Some(title) = title {
            criteria = criteria.with_title(title);
        }
        Ok(filter(&self.table, &criteria))
    }

    /// Every tune whose title contains `title`.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Vec<&TuneRecord> {
        filter(&self.table, &Criteria::default().with_title(title.trim()))
    }

    /// Resolves a title to a single tune.
    ///
    /// With several matches, `choice` (1-based) picks one. Without a choice,
    /// or with one out of range, the matches are returned inside
    /// [`TuneError::AmbiguousSelection`] so the caller can ask the user.
    pub fn select_seed(&self, title: &str, choice: Option<usize>) -> Result<&TuneRecord> {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return Err(TuneError::MalformedQuery("a title is required".to_string()));
        }

        let matches = self.find_by_title(&title);
        match (matches.len(), choice) {
            (0, _) => Err(TuneError::TuneNotFound(title)),
            (1, None) => Ok(matches[0]),
            (count, Some(choice)) if (1..=count).contains(&choice) => Ok(matches[choice - 1]),
            (_, choice) => Err(TuneError::AmbiguousSelection {
                title,
                candidates: matches.into_iter().cloned().collect(),
                choice,
            }),
        }
    }

    /// Builds a set around `seed`.
    pub fn random_set<R: Rng>(&self, rng: &mut R, seed: &TuneRecord, options: &SetOptions) -> Result<Vec<TuneRecord>> {
        SetGenerator::new(&self.table, &self.weights).generate(rng, seed, options)
    }

    /// Builds a set from the words after `set -t`: a title, optionally ending
    /// in a difficulty such as `*l3`, which then overrides `options`.
    pub fn random_set_from_title<R: Rng>(
        &self,
        rng: &mut R,
        words: &[String],
        choice: Option<usize>,
        options: &SetOptions,
    ) -> Result<Vec<TuneRecord>> {
        let mut words = words.to_vec();
        let mut options = options.clone();
        if let Some(difficulty) = split_difficulty_suffix(&mut words)? {
            options.difficulty = Some(difficulty);
        }

        let seed = self.select_seed(&words.join(" "), choice)?.clone();
        self.random_set(rng, &seed, &options)
    }
}
