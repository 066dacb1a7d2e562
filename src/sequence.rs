//! # Set Generation
//!
//! Builds a set of tunes around a seed tune. The seed is placed at a chosen
//! (or random) position; the walk first fills the slots after it, each new
//! tune's key drawn from the forward weights of the previous tune's key, then
//! fills the slots before it from the backward weights of the current first
//! tune. Every candidate must share the seed's dance, match the active
//! difficulty, and not already be in the set.
//!
//! Each slot gets a bounded number of draws. A key with no unused tunes is
//! simply drawn again, and when the budget runs out the whole generation
//! fails rather than returning a short set.

use crate::error::{Phase, Result, TuneError};
use crate::filter::{filter, Criteria};
use crate::query::{parse_key, DifficultySpec};
use crate::tune::{TuneRecord, TuneTable};
use crate::weights::TransitionWeights;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Tunes in a set unless asked otherwise.
pub const DEFAULT_SET_LENGTH: usize = 3;
/// Draws allowed per slot before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Shape of the set to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOptions {
    pub length: usize,
    /// 1-based slot of the seed; random when `None`.
    pub position: Option<usize>,
    pub difficulty: Option<DifficultySpec>,
    pub max_attempts: usize,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_SET_LENGTH,
            position: None,
            difficulty: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where the walk is. Cursors count filled slots, 1-based like `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Forward { cursor: usize },
    Backward { cursor: usize },
    Done,
}

/// Weighted random walk over a tune table.
#[derive(Debug, Clone, Copy)]
pub struct SetGenerator<'a> {
    table: &'a TuneTable,
    weights: &'a TransitionWeights,
}

impl<'a> SetGenerator<'a> {
    #[must_use]
    pub fn new(table: &'a TuneTable, weights: &'a TransitionWeights) -> Self {
        Self { table, weights }
    }

    /// Builds a set of `options.length` tunes with `seed` at
    /// `options.position`.
    ///
    /// # Errors
    ///
    /// - [`TuneError::InvalidSetShape`] if the length is zero or the position
    ///   falls outside the set.
    /// - [`TuneError::CandidatePoolExhausted`] if some slot cannot be filled
    ///   within `options.max_attempts` draws.
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        seed: &TuneRecord,
        options: &SetOptions,
    ) -> Result<Vec<TuneRecord>> {
        let length = options.length;
        if length == 0 {
            return Err(TuneError::InvalidSetShape { length, position: options.position.unwrap_or(0) });
        }
        let position = match options.position {
            Some(position) if (1..=length).contains(&position) => position,
            Some(position) => return Err(TuneError::InvalidSetShape { length, position }),
            None => rng.gen_range(1..=length),
        };
        log::debug!("Building a set of {length} around `{}` at slot {position}", seed.title);

        let mut selected = VecDeque::from([seed.clone()]);
        let mut walk = Walk::Forward { cursor: position };

        while walk != Walk::Done {
            walk = match walk {
                Walk::Forward { cursor } if cursor < length => {
                    let key = anchor_key(selected.back());
                    let tune = self.next_tune(rng, Phase::Forward, &key, seed, options, &selected)?;
                    selected.push_back(tune);
                    Walk::Forward { cursor: cursor + 1 }
                }
                Walk::Forward { .. } => Walk::Backward { cursor: position - 1 },
                Walk::Backward { cursor } if cursor > 0 => {
                    let key = anchor_key(selected.front());
                    let tune = self.next_tune(rng, Phase::Backward, &key, seed, options, &selected)?;
                    selected.push_front(tune);
                    Walk::Backward { cursor: cursor - 1 }
                }
                Walk::Backward { .. } | Walk::Done => Walk::Done,
            };
        }

        debug_assert_eq!(selected.len(), length);
        Ok(selected.into())
    }

    /// Draws keys until one yields an unused tune of the seed's dance.
    fn next_tune<R: Rng>(
        &self,
        rng: &mut R,
        phase: Phase,
        key: &str,
        seed: &TuneRecord,
        options: &SetOptions,
        selected: &VecDeque<TuneRecord>,
    ) -> Result<TuneRecord> {
        let attempts = options.max_attempts.max(1);

        for attempt in 1..=attempts {
            let drawn = self.weights.draw(rng, phase, key)?;
            let Ok(spec) = parse_key(&drawn) else {
                log::warn!("Skipping unusable key `{drawn}` from the weight table");
                continue;
            };

            let criteria = Criteria {
                dance: Some(seed.dance.clone()),
                key: Some(spec),
                difficulty: options.difficulty,
                title: None,
            };
            let pool: Vec<&TuneRecord> = filter(self.table, &criteria)
                .into_iter()
                .filter(|tune| selected.iter().all(|chosen| chosen.id != tune.id))
                .collect();

            if let Some(tune) = pool.choose(rng) {
                log::debug!("{phase}: `{}` ({}) after {attempt} draw(s)", tune.title, tune.key);
                return Ok((*tune).clone());
            }
            log::trace!("{phase}: no unused {} in `{drawn}` (draw {attempt})", seed.dance);
        }

        Err(TuneError::CandidatePoolExhausted {
            phase,
            key: key.to_string(),
            attempts,
        })
    }
}

/// Canonical spelling of a tune's first key, or empty if it has none.
fn anchor_key(tune: Option<&TuneRecord>) -> String {
    tune.and_then(TuneRecord::first_key)
        .and_then(|key| parse_key(key).ok())
        .map(|spec| spec.canonical())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_difficulty;
    use crate::tune::ColumnLayout;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn table() -> TuneTable {
        TuneTable::from_rows(
            "test",
            vec![
                vec!["reel", "the wind that shakes the barley", "dmaj", "", "**"],
                vec!["reel", "drowsy maggie", "edor", "", "***"],
                vec!["reel", "the silver spear", "d", "", "*"],
                vec!["reel", "the maid behind the bar", "d", "", "**"],
                vec!["reel", "the mountain road", "d", "", "**"],
                vec!["reel", "miss mcleod's", "g", "", "*"],
                vec!["reel", "the earl's chair", "d", "", "***"],
                vec!["jig", "the kesh", "g", "", "*"],
                vec!["jig", "out on the ocean", "g", "", "**"],
            ],
            &ColumnLayout::default(),
        )
        .unwrap()
    }

    fn d_and_g_only() -> TransitionWeights {
        TransitionWeights::from_json_str(r#"{ "d": { "d": 60, "g": 40 }, "g": { "d": 100 } }"#).unwrap()
    }

    #[test]
    fn test_set_has_requested_length_and_seed_position() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(0).unwrap().clone();

        for position in 1..=3 {
            let mut rng = StdRng::seed_from_u64(position as u64);
            let options = SetOptions { position: Some(position), ..SetOptions::default() };
            let set = generator.generate(&mut rng, &seed, &options).unwrap();

            assert_eq!(set.len(), 3);
            assert_eq!(set[position - 1].id, seed.id);
            let unique: HashSet<usize> = set.iter().map(|tune| tune.id).collect();
            assert_eq!(unique.len(), 3, "duplicates in {set:?}");
            assert!(set.iter().all(|tune| tune.dance == "reel"));
        }
    }

    #[test]
    fn test_random_position_is_within_set() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(2).unwrap().clone();

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            let set = generator.generate(&mut rng, &seed, &SetOptions::default()).unwrap();
            assert_eq!(set.len(), 3);
            assert_eq!(set.iter().filter(|tune| tune.id == seed.id).count(), 1);
        }
    }

    #[test]
    fn test_difficulty_applies_to_added_tunes() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(0).unwrap().clone();
        let options = SetOptions {
            position: Some(1),
            difficulty: Some(parse_difficulty("*=2").unwrap()),
            ..SetOptions::default()
        };

        let mut rng = StdRng::seed_from_u64(1);
        let set = generator.generate(&mut rng, &seed, &options).unwrap();
        assert!(set[1..].iter().all(|tune| tune.difficulty_level() == 2));
    }

    #[test]
    fn test_length_one_is_just_the_seed() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(5).unwrap().clone();
        let options = SetOptions { length: 1, ..SetOptions::default() };

        let set = generator.generate(&mut StdRng::seed_from_u64(0), &seed, &options).unwrap();
        assert_eq!(set, vec![seed]);
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(0).unwrap().clone();
        let mut rng = StdRng::seed_from_u64(0);

        let zero = SetOptions { length: 0, ..SetOptions::default() };
        assert!(matches!(generator.generate(&mut rng, &seed, &zero), Err(TuneError::InvalidSetShape { .. })));

        let outside = SetOptions { position: Some(4), ..SetOptions::default() };
        assert!(matches!(generator.generate(&mut rng, &seed, &outside), Err(TuneError::InvalidSetShape { .. })));
    }

    #[test]
    fn test_empty_pool_gives_up_instead_of_looping() {
        let table = table();
        let weights = d_and_g_only();
        let generator = SetGenerator::new(&table, &weights);
        // Only two jigs exist, so a set of three jigs cannot be finished.
        let seed = table.get(7).unwrap().clone();
        let options = SetOptions { length: 3, position: Some(1), max_attempts: 25, ..SetOptions::default() };

        let err = generator
            .generate(&mut StdRng::seed_from_u64(4), &seed, &options)
            .unwrap_err();
        match err {
            TuneError::CandidatePoolExhausted { attempts, .. } => assert_eq!(attempts, 25),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_seed_key_uses_fallback_keys() {
        let table = table();
        let weights = TransitionWeights::default();
        let generator = SetGenerator::new(&table, &weights);
        let seed = table.get(1).unwrap().clone();
        let options = SetOptions { position: Some(2), ..SetOptions::default() };

        let set = generator.generate(&mut StdRng::seed_from_u64(8), &seed, &options).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set[1].id, seed.id);
    }

    #[test]
    fn test_anchor_key_is_canonical() {
        let tune = TuneRecord { key: "Edor, G".to_lowercase(), ..TuneRecord::default() };
        assert_eq!(anchor_key(Some(&tune)), "em");
        assert_eq!(anchor_key(Some(&TuneRecord::default())), "");
        assert_eq!(anchor_key(None), "");
    }
}
