//! Top and bottom performer ranking.
//!
//! Only entries with an achievement are ranked. The two lists never share an
//! entry: when there are too few rated entries to fill both, the rated set is
//! split between them instead.

use rust_decimal::Decimal;
use serde::Serialize;

/// An entry together with the achievement it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<T> {
    /// The ranked entry.
    pub item: T,
    /// Its achievement percentage.
    pub achievement: Decimal,
}

/// Rated entries sorted best first, plus the count of unrated ones.
#[derive(Debug, Clone)]
pub struct Ranking<T> {
    descending: Vec<Ranked<T>>,
    // Positions into `descending`, worst first.
    ascending: Vec<usize>,
    unrated: usize,
}

impl<T> Ranking<T> {
    /// Ranks `items` by `achievement`, breaking ties by `tie_key` ascending.
    ///
    /// Entries whose achievement is `None` are counted but never ranked.
    pub fn build<K, A, F>(items: impl IntoIterator<Item = T>, achievement: A, tie_key: F) -> Self
    where
        K: Ord,
        A: Fn(&T) -> Option<Decimal>,
        F: Fn(&T) -> K,
    {
        let mut unrated = 0;
        let mut rated = Vec::new();
        for item in items {
            match achievement(&item) {
                Some(achievement) => {
                    let key = tie_key(&item);
                    rated.push((Ranked { item, achievement }, key));
                }
                None => unrated += 1,
            }
        }

        rated.sort_by(|(a, ka), (b, kb)| {
            b.achievement.cmp(&a.achievement).then_with(|| ka.cmp(kb))
        });

        let mut ascending: Vec<usize> = (0..rated.len()).collect();
        ascending.sort_by(|&i, &j| {
            let ((a, ka), (b, kb)) = (&rated[i], &rated[j]);
            a.achievement.cmp(&b.achievement).then_with(|| ka.cmp(kb))
        });

        Self {
            descending: rated.into_iter().map(|(ranked, _)| ranked).collect(),
            ascending,
            unrated,
        }
    }

    /// Every rated entry, best first.
    #[must_use]
    pub fn sorted_descending(&self) -> &[Ranked<T>] {
        &self.descending
    }

    /// Number of entries that carried an achievement.
    #[must_use]
    pub fn rated_count(&self) -> usize {
        self.descending.len()
    }

    /// Number of entries left out for lack of an achievement.
    #[must_use]
    pub fn unrated_count(&self) -> usize {
        self.unrated
    }

    fn top_len(&self, n: usize) -> usize {
        let k = self.rated_count();
        if k >= n.saturating_mul(2) {
            n
        } else {
            n.min(k.div_ceil(2))
        }
    }

    /// Up to `n` best entries, best first.
    #[must_use]
    pub fn top(&self, n: usize) -> &[Ranked<T>] {
        &self.descending[..self.top_len(n)]
    }

    /// Up to `n` worst entries not already in [`Ranking::top`], worst first.
    #[must_use]
    pub fn bottom(&self, n: usize) -> Vec<&Ranked<T>> {
        let top_len = self.top_len(n);
        let len = n.min(self.rated_count() - top_len);
        self.ascending
            .iter()
            .filter(|&&i| i >= top_len)
            .take(len)
            .map(|&i| &self.descending[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn rank(entries: &[(&'static str, Option<Decimal>)]) -> Ranking<(&'static str, Option<Decimal>)> {
        Ranking::build(entries.iter().copied(), |e| e.1, |e| e.0.to_lowercase())
    }

    fn names<'a>(entries: impl IntoIterator<Item = &'a Ranked<(&'static str, Option<Decimal>)>>) -> Vec<&'static str> {
        entries.into_iter().map(|r| r.item.0).collect()
    }

    #[test]
    fn test_null_excluded_and_lists_split() {
        let ranking = rank(&[
            ("A", Some(dec!(110))),
            ("B", None),
            ("C", Some(dec!(90))),
            ("D", Some(dec!(95))),
        ]);

        assert_eq!(names(ranking.top(2)), vec!["A", "D"]);
        assert_eq!(names(ranking.bottom(2)), vec!["C"]);
        assert_eq!(ranking.unrated_count(), 1);
        assert_eq!(ranking.rated_count(), 3);
    }

    #[test]
    fn test_enough_entries_for_both_lists() {
        let ranking = rank(&[
            ("A", Some(dec!(50))),
            ("B", Some(dec!(60))),
            ("C", Some(dec!(70))),
            ("D", Some(dec!(80))),
            ("E", Some(dec!(90))),
        ]);

        assert_eq!(names(ranking.top(2)), vec!["E", "D"]);
        assert_eq!(names(ranking.bottom(2)), vec!["A", "B"]);
    }

    #[test]
    fn test_ties_broken_by_name_case_insensitive() {
        let ranking = rank(&[
            ("delta", Some(dec!(100))),
            ("Bravo", Some(dec!(100))),
            ("alpha", Some(dec!(100))),
            ("Charlie", Some(dec!(100))),
        ]);

        assert_eq!(names(ranking.top(2)), vec!["alpha", "Bravo"]);
        assert_eq!(names(ranking.bottom(2)), vec!["Charlie", "delta"]);
    }

    #[test]
    fn test_single_rated_entry_goes_to_top() {
        let ranking = rank(&[("A", Some(dec!(40))), ("B", None)]);

        assert_eq!(names(ranking.top(5)), vec!["A"]);
        assert!(ranking.bottom(5).is_empty());
    }

    #[test]
    fn test_empty_and_zero_n() {
        let ranking = rank(&[("A", None)]);
        assert!(ranking.top(5).is_empty());
        assert!(ranking.bottom(5).is_empty());

        let ranking = rank(&[("A", Some(dec!(1)))]);
        assert!(ranking.top(0).is_empty());
        assert!(ranking.bottom(0).is_empty());
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let entries = [
            ("x", Some(dec!(100))),
            ("Y", Some(dec!(100))),
            ("z", Some(dec!(99))),
        ];
        let mut reversed = entries;
        reversed.reverse();

        assert_eq!(names(rank(&entries).top(3)), names(rank(&reversed).top(3)));
    }

    proptest! {
        #[test]
        fn prop_lists_disjoint_and_bounded(
            scores in prop::collection::vec(prop::option::of(-500i64..500), 0..20),
            n in 0usize..8,
        ) {
            let entries: Vec<(usize, Option<Decimal>)> = scores
                .into_iter()
                .map(|s| s.map(Decimal::from))
                .enumerate()
                .collect();
            let rated = entries.iter().filter(|e| e.1.is_some()).count();
            let ranking = Ranking::build(entries.clone(), |e| e.1, |e| e.0);

            let top: Vec<usize> = ranking.top(n).iter().map(|r| r.item.0).collect();
            let bottom: Vec<usize> = ranking.bottom(n).iter().map(|r| r.item.0).collect();

            prop_assert!(top.len() <= n && bottom.len() <= n);
            prop_assert!(top.iter().all(|i| !bottom.contains(i)));
            prop_assert!(top.iter().chain(&bottom).all(|&i| entries[i].1.is_some()));
            prop_assert_eq!(top.len() + bottom.len(), rated.min(n * 2));
            prop_assert_eq!(ranking.unrated_count(), entries.len() - rated);
        }
    }
}
