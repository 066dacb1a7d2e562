//! # Key Transition Weights
//!
//! How likely a set is to move from one key into another. Rows map a key (in
//! canonical spelling, see [`KeySpec::canonical`](crate::query::KeySpec::canonical))
//! to relative weights for the keys that may follow it.
//!
//! ## Data Format
//!
//! ```json
//! { "d": { "g": 30, "a": 15, "em": 15 },
//!   "g": { "d": 30, "em": 20 } }
//! ```
//!
//! A built-in table ships with the crate; `--weights` or the `weights` config
//! entry replaces it with a JSON file of the same shape.
//!
//! ## Direction
//!
//! Going forward the row of the current key is used as stored. Going backward
//! we need the keys likely to *precede* the anchor: every key whose row lists
//! the anchor contributes that weight multiplied by the size of its row.

use crate::error::{Phase, Result, TuneError};
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Keys drawn uniformly when no weights are known for the current key.
pub const FALLBACK_KEYS: [&str; 5] = ["d", "g", "em", "bm", "am"];

type WeightRow = BTreeMap<String, f64>;

/// Read-only key-to-key weight table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionWeights {
    rows: BTreeMap<String, WeightRow>,
}

lazy_static! {
    static ref BUILTIN: TransitionWeights =
        TransitionWeights::from_json_str(include_str!("../data/weights.json"))
            .unwrap_or_else(|e| {
                log::error!("Built-in weight table is invalid: {e}");
                TransitionWeights::default()
            });
}

impl TransitionWeights {
    /// The table bundled with the crate.
    #[must_use]
    pub fn builtin() -> &'static TransitionWeights {
        &BUILTIN
    }

    /// Parses a JSON weight table. Keys are lower-cased; weights must be
    /// finite and non-negative.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, WeightRow> =
            serde_json::from_str(json).map_err(|e| TuneError::Weights(e.to_string()))?;

        let mut rows = BTreeMap::new();
        for (from, row) in raw {
            let mut normalized = WeightRow::new();
            for (to, weight) in row {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(TuneError::Weights(format!(
                        "weight {weight} for {from} -> {to} must be a non-negative number"
                    )));
                }
                normalized.insert(to.to_lowercase(), weight);
            }
            rows.insert(from.to_lowercase(), normalized);
        }

        Ok(Self { rows })
    }

    /// Reads a JSON weight table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| TuneError::Weights(format!("cannot read {}: {e}", path.display())))?;
        let weights = Self::from_json_str(&json)?;
        log::info!("Loaded weights for {} keys from {}", weights.rows.len(), path.display());
        Ok(weights)
    }

    /// Number of keys with an outgoing row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keys that may follow `key`, with their stored weights.
    #[must_use]
    pub fn forward(&self, key: &str) -> Option<Vec<(&str, f64)>> {
        self.rows
            .get(key)
            .map(|row| row.iter().map(|(to, w)| (to.as_str(), *w)).collect())
    }

    /// Keys that may precede `anchor`: each key listing `anchor` in its row,
    /// weighted by that entry times the row's length.
    #[must_use]
    pub fn backward(&self, anchor: &str) -> Vec<(&str, f64)> {
        self.rows
            .iter()
            .filter_map(|(from, row)| {
                row.get(anchor)
                    .map(|w| (from.as_str(), w * row.len() as f64))
            })
            .collect()
    }

    /// Picks the next key from `key` in the given direction.
    ///
    /// Falls back to a uniform pick from [`FALLBACK_KEYS`] when there is
    /// nothing to weigh.
    pub fn draw<R: Rng>(&self, rng: &mut R, phase: Phase, key: &str) -> Result<String> {
        let edges = match phase {
            Phase::Forward => self.forward(key).unwrap_or_default(),
            Phase::Backward => self.backward(key),
        };

        let (population, weights): (Vec<&str>, Vec<f64>) = edges.into_iter().unzip();
        let cumulative = cumulative_percentages(&weights);

        if cumulative.is_empty() {
            log::warn!("No {phase} weights found for `{key}`, picking a common key");
            let fallback = FALLBACK_KEYS.choose(rng).ok_or(TuneError::EmptyWeights)?;
            return Ok((*fallback).to_string());
        }

        let chosen = weighted_choice(rng, &population, &cumulative)?;
        log::debug!("Drew {phase} key `{chosen}` from `{key}`");
        Ok((*chosen).to_string())
    }
}

/// Running totals of `weights`, scaled so the last one is 100.
/// Empty if the weights sum to zero.
#[must_use]
pub fn cumulative_percentages(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    weights
        .iter()
        .scan(0.0, |running, w| {
            *running += w / total * 100.0;
            Some(*running)
        })
        .collect()
}

/// Draws an integer in `0..=100` and returns the first item whose cumulative
/// weight reaches it. The draw is clamped to the last cumulative value so
/// rounding can never leave it unmatched.
pub fn weighted_choice<'a, R, K>(rng: &mut R, population: &'a [K], cumulative: &[f64]) -> Result<&'a K>
where
    R: Rng,
{
    if population.is_empty() || population.len() != cumulative.len() {
        return Err(TuneError::EmptyWeights);
    }
    let ceiling = cumulative[cumulative.len() - 1];
    if !ceiling.is_finite() {
        return Err(TuneError::EmptyWeights);
    }

    let draw = f64::from(rng.gen_range(0..=100_u32)).min(ceiling);

    population
        .iter()
        .zip(cumulative)
        .find(|(_, &weight)| weight >= draw)
        .map(|(item, _)| item)
        .ok_or(TuneError::EmptyWeights)
}
