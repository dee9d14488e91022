//! Approximate string matching
//!
//! [`FuzzySet`] indexes strings by character n-grams (trigrams, then
//! bigrams) and ranks candidates by cosine similarity of their gram
//! counts. The best candidates are then re-scored with a normalized
//! Levenshtein similarity, so a score of `1.0` means identical (ignoring
//! case) and lower scores mean more edits.

use std::collections::HashMap;

use super::expectation::Polarity;

const GRAM_SIZE_LOWER: usize = 2;
const GRAM_SIZE_UPPER: usize = 3;
/// Candidates scoring below this are not considered matches at all.
pub const MIN_MATCH_SCORE: f64 = 0.33;
/// Only this many cosine-ranked candidates are re-scored by edit distance.
const LEVENSHTEIN_CANDIDATES: usize = 50;

#[derive(Debug, Clone)]
struct IndexedItem {
    norm: f64,
    normalized: String,
}

/// An n-gram similarity index over a set of strings.
#[derive(Debug, Clone, Default)]
pub struct FuzzySet {
    /// normalized value -> value as added
    exact: HashMap<String, String>,
    /// gram -> (item index, gram count), shared across gram sizes
    match_dict: HashMap<String, Vec<(usize, usize)>>,
    /// gram size -> indexed items
    items: HashMap<usize, Vec<IndexedItem>>,
}

impl FuzzySet {
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for value in values {
            set.add(value.as_ref());
        }
        set
    }

    /// Add a value; returns false when an equal (case-insensitive) value exists.
    pub fn add(&mut self, value: &str) -> bool {
        let normalized = normalize(value);
        if self.exact.contains_key(&normalized) {
            return false;
        }

        for gram_size in GRAM_SIZE_LOWER..=GRAM_SIZE_UPPER {
            let items = self.items.entry(gram_size).or_default();
            let index = items.len();
            let counts = gram_counts(&normalized, gram_size);
            let mut sum_of_squares = 0usize;
            for (gram, count) in counts {
                sum_of_squares += count * count;
                self.match_dict.entry(gram).or_default().push((index, count));
            }
            items.push(IndexedItem {
                norm: (sum_of_squares as f64).sqrt(),
                normalized: normalized.clone(),
            });
        }

        self.exact.insert(normalized, value.to_string());
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Scored matches for `query`, best first, or `None` when nothing scores
    /// at least `min_score`.
    #[must_use]
    pub fn get(&self, query: &str, min_score: f64) -> Option<Vec<(f64, String)>> {
        let normalized = normalize(query);
        if let Some(value) = self.exact.get(&normalized) {
            return Some(vec![(1.0, value.clone())]);
        }

        (GRAM_SIZE_LOWER..=GRAM_SIZE_UPPER)
            .rev()
            .filter_map(|gram_size| self.lookup(&normalized, gram_size, min_score))
            .find(|results| !results.is_empty())
    }

    /// Best similarity score for `query` with the default minimum, if any.
    #[must_use]
    pub fn best_score(&self, query: &str) -> Option<f64> {
        self.get(query, MIN_MATCH_SCORE)
            .and_then(|matches| matches.first().map(|(score, _)| *score))
    }

    fn lookup(&self, normalized: &str, gram_size: usize, min_score: f64) -> Option<Vec<(f64, String)>> {
        let items = self.items.get(&gram_size)?;
        let mut dot_products: HashMap<usize, usize> = HashMap::new();
        let mut sum_of_squares = 0usize;

        for (gram, count) in gram_counts(normalized, gram_size) {
            sum_of_squares += count * count;
            if let Some(entries) = self.match_dict.get(&gram) {
                for &(index, other_count) in entries {
                    *dot_products.entry(index).or_insert(0) += count * other_count;
                }
            }
        }

        if dot_products.is_empty() {
            return None;
        }

        let query_norm = (sum_of_squares as f64).sqrt();
        let mut ranked: Vec<(f64, &str)> = dot_products
            .into_iter()
            .map(|(index, dot)| {
                let item = &items[index];
                (dot as f64 / (query_norm * item.norm), item.normalized.as_str())
            })
            .collect();
        sort_descending(&mut ranked);

        let mut rescored: Vec<(f64, &str)> = ranked
            .into_iter()
            .take(LEVENSHTEIN_CANDIDATES)
            .map(|(_, candidate)| (similarity(candidate, normalized), candidate))
            .collect();
        sort_descending(&mut rescored);

        Some(
            rescored
                .into_iter()
                .filter(|(score, _)| *score >= min_score)
                .filter_map(|(score, candidate)| {
                    self.exact.get(candidate).map(|value| (score, value.clone()))
                })
                .collect(),
        )
    }
}

fn sort_descending(scores: &mut [(f64, &str)]) {
    scores.sort_by(|a, b| b.0.total_cmp(&a.0));
}

fn normalize(value: &str) -> String {
    value.to_lowercase()
}

fn is_gram_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{00C0}'..='\u{00FF}').contains(&c) || c == ',' || c == ' '
}

/// Grams of `value` padded with `-` on both ends.
fn grams(value: &str, gram_size: usize) -> Vec<String> {
    let mut simplified: Vec<char> = std::iter::once('-')
        .chain(value.to_lowercase().chars().filter(|c| is_gram_char(*c)))
        .chain(std::iter::once('-'))
        .collect();
    while simplified.len() < gram_size {
        simplified.push('-');
    }
    simplified
        .windows(gram_size)
        .map(|window| window.iter().collect())
        .collect()
}

fn gram_counts(value: &str, gram_size: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for gram in grams(value, gram_size) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Levenshtein similarity normalized by the longer string's length.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Result of an approximate-match assertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOutcome {
    pub matched: bool,
    /// Best similarity found, `None` when no candidate matched at all.
    pub score: Option<f64>,
}

/// Decide an approximate-match assertion.
///
/// `Should` matches when the best score reaches `threshold`.
/// `ShouldNot` inverts that decision, so "no candidate at all" and
/// "candidate below threshold" both count as not approximating.
#[must_use]
pub fn approximates(polarity: Polarity, actual: &str, expected: &str, threshold: f64) -> FuzzyOutcome {
    let index = FuzzySet::new([expected]);
    let score = index.best_score(actual);
    let reaches = score.is_some_and(|score| score >= threshold);

    FuzzyOutcome {
        matched: match polarity {
            Polarity::Should => reaches,
            Polarity::ShouldNot => !reaches,
        },
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_case() {
        let set = FuzzySet::new(["Hello There"]);
        assert_eq!(set.get("hello there", MIN_MATCH_SCORE), Some(vec![(1.0, "Hello There".to_string())]));
    }

    #[test]
    fn one_edit_scores_by_longer_length() {
        let score = FuzzySet::new(["Hello ther"]).best_score("Hello there").unwrap();
        assert!((score - (1.0 - 1.0 / 11.0)).abs() < 1e-9);
    }

    #[test]
    fn dissimilar_strings_have_no_match() {
        assert_eq!(FuzzySet::new(["abc"]).best_score("xyz"), None);
    }

    #[test]
    fn duplicate_adds_are_ignored() {
        let mut set = FuzzySet::new(["one"]);
        assert!(!set.add("ONE"));
        assert!(set.add("two"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn best_candidate_ranks_first() {
        let set = FuzzySet::new(["weather today", "weather tomorrow", "traffic"]);
        let matches = set.get("weather todya", MIN_MATCH_SCORE).unwrap();
        assert_eq!(matches[0].1, "weather today");
    }

    #[test]
    fn grams_are_padded() {
        assert_eq!(grams("a", 3), vec!["-a-".to_string()]);
        assert_eq!(grams("", 3), vec!["---".to_string()]);
        assert_eq!(grams("ab", 2), vec!["-a", "ab", "b-"]);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn approximates_threshold_boundaries() {
        let passes = approximates(Polarity::Should, "Hello there", "Hello ther", 0.90);
        assert!(passes.matched);

        let fails = approximates(Polarity::Should, "Hello there", "Hello ther", 0.999);
        assert!(!fails.matched);
        assert!(fails.score.is_some());
    }

    #[test]
    fn should_not_counts_missing_score_as_not_approximating() {
        let outcome = approximates(Polarity::ShouldNot, "xyz", "abc", 0.93);
        assert!(outcome.matched);
        assert_eq!(outcome.score, None);
    }
}
