//! Multi-criteria filtering over the tune table.
//!
//! Each criterion is evaluated on its own to the set of ids it accepts and
//! the sets are intersected, so criteria are independent of one another and
//! of the order they are listed in. Results always come back in table order.

use crate::query::{DifficultySpec, KeySpec, Query};
use crate::tune::{TuneRecord, TuneTable};
use std::collections::BTreeSet;

/// Everything a search or a set step can filter on. `None` fields are
/// skipped rather than matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Substring of the dance.
    pub dance: Option<String>,
    pub key: Option<KeySpec>,
    pub difficulty: Option<DifficultySpec>,
    /// Substring of the title.
    pub title: Option<String>,
}

impl Criteria {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into().to_lowercase());
        self
    }

    fn predicates(&self) -> Vec<Box<dyn Fn(&TuneRecord) -> bool + '_>> {
        let mut predicates: Vec<Box<dyn Fn(&TuneRecord) -> bool + '_>> = Vec::new();

        if let Some(dance) = &self.dance {
            predicates.push(Box::new(move |tune: &TuneRecord| tune.dance.contains(dance.as_str())));
        }
        if let Some(key) = &self.key {
            predicates.push(Box::new(move |tune: &TuneRecord| tune.key_tokens().any(|token| key.matches(token))));
        }
        if let Some(difficulty) = &self.difficulty {
            predicates.push(Box::new(move |tune: &TuneRecord| difficulty.matches(tune.difficulty_level())));
        }
        if let Some(title) = &self.title {
            predicates.push(Box::new(move |tune: &TuneRecord| tune.title.contains(title.as_str())));
        }

        predicates
    }
}

impl From<Query> for Criteria {
    fn from(query: Query) -> Self {
        Self {
            dance: query.dance,
            key: query.key,
            difficulty: query.difficulty,
            title: None,
        }
    }
}

/// Returns the tunes accepted by every criterion, in table order.
#[must_use]
pub fn filter<'a>(table: &'a TuneTable, criteria: &Criteria) -> Vec<&'a TuneRecord> {
    let universe: BTreeSet<usize> = table.iter().map(|tune| tune.id).collect();

    let ids = criteria
        .predicates()
        .iter()
        .fold(universe, |running, predicate| {
            let accepted: BTreeSet<usize> = table
                .iter()
                .filter(|&tune| predicate(tune))
                .map(|tune| tune.id)
                .collect();
            running.intersection(&accepted).copied().collect()
        });

    log::trace!("{criteria:?} matched {} of {} tunes", ids.len(), table.len());

    ids.into_iter().filter_map(|id| table.get(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{parse_difficulty, parse_key};
    use crate::tune::ColumnLayout;

    fn table() -> TuneTable {
        TuneTable::from_rows(
            "test",
            vec![
                vec!["reel", "the wind that shakes the barley", "dmaj", "fiddle", "**"],
                vec!["reel", "drowsy maggie", "edor", "fiddle", "***"],
                vec!["jig", "the kesh", "g", "flute", "*"],
                vec!["slip jig", "the butterfly", "em", "whistle", "***"],
                vec!["reel", "the silver spear", "d major", "fiddle", "*"],
                vec!["reel", "the maid behind the bar", "dmin", "fiddle", "**"],
            ],
            &ColumnLayout::default(),
        )
        .unwrap()
    }

    fn ids(tunes: &[&TuneRecord]) -> Vec<usize> {
        tunes.iter().map(|tune| tune.id).collect()
    }

    #[test]
    fn test_no_criteria_returns_everything() {
        let table = table();
        assert_eq!(filter(&table, &Criteria::default()).len(), table.len());
    }

    #[test]
    fn test_dance_is_a_substring_match() {
        let table = table();
        let jigs = filter(&table, &Criteria { dance: Some("jig".into()), ..Criteria::default() });
        assert_eq!(ids(&jigs), vec![2, 3]);

        let reels = filter(&table, &Criteria { dance: Some("reel".into()), ..Criteria::default() });
        assert!(reels.iter().all(|tune| tune.dance.contains("reel")));
        assert_eq!(reels.len(), 4);
    }

    #[test]
    fn test_key_uses_expanded_spellings() {
        let table = table();
        let in_d = filter(&table, &Criteria { key: Some(parse_key("d").unwrap()), ..Criteria::default() });
        assert_eq!(ids(&in_d), vec![0, 4]);

        let in_dm = filter(&table, &Criteria { key: Some(parse_key("dm").unwrap()), ..Criteria::default() });
        assert_eq!(ids(&in_dm), vec![5]);
    }

    #[test]
    fn test_criteria_intersect() {
        let table = table();
        let criteria = Criteria {
            dance: Some("reel".into()),
            key: Some(parse_key("d").unwrap()),
            difficulty: Some(parse_difficulty("*=2").unwrap()),
            title: None,
        };
        let found = filter(&table, &criteria);
        assert_eq!(ids(&found), vec![0]);
        for tune in found {
            assert!(tune.dance.contains("reel"));
            assert_eq!(tune.difficulty_level(), 2);
        }
    }

    #[test]
    fn test_difficulty_operators() {
        let table = table();
        let harder = filter(&table, &Criteria { difficulty: Some(parse_difficulty("*g1").unwrap()), ..Criteria::default() });
        assert!(harder.iter().all(|tune| tune.difficulty_level() > 1));
        assert_eq!(harder.len(), 4);

        let easier = filter(&table, &Criteria { difficulty: Some(parse_difficulty("*l3").unwrap()), ..Criteria::default() });
        assert!(easier.iter().all(|tune| tune.difficulty != "***"));
    }

    #[test]
    fn test_title_filter_and_empty_result() {
        let table = table();
        let wind = filter(&table, &Criteria::default().with_title("Wind"));
        assert_eq!(ids(&wind), vec![0]);

        let nothing = filter(&table, &Criteria::default().with_title("polka"));
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_results_keep_table_order() {
        let table = table();
        let criteria = Criteria {
            title: Some("the".into()),
            dance: Some("reel".into()),
            ..Criteria::default()
        };
        let found = ids(&filter(&table, &criteria));
        let mut sorted = found.clone();
        sorted.sort_unstable();
        assert_eq!(found, sorted);
    }
}
