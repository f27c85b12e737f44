//! Fuzzy matching of sale records against a card query.

use crate::models::{CardQuery, SaleRecord};

/// Minimum similarity for a player name to count as the same player.
pub const PLAYER_NAME_THRESHOLD: f64 = 0.85;
/// Minimum similarity for a brand match (only applied when the query has one).
pub const BRAND_THRESHOLD: f64 = 0.80;
/// Minimum similarity for a parallel/variation match.
pub const PARALLEL_THRESHOLD: f64 = 0.70;

/// Normalized similarity between two strings in `[0, 1]`.
///
/// Case-insensitive and whitespace-collapsed: `1 - distance / max_len` over
/// the normalized forms, where distance is the Levenshtein edit distance.
/// Two empty strings are identical (1.0); empty vs non-empty is 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());

    1.0 - levenshtein(&a_chars, &b_chars) as f64 / max_len as f64
}

/// Lowercases and collapses runs of whitespace to single spaces.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein edit distance over char slices (two-row dynamic programming).
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Outcome of matching one optional field of a record against the query.
///
/// `Inconclusive` covers both "the query doesn't constrain this field" and
/// "the record doesn't know its value"; only a positive `Mismatches`
/// disqualifies a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch {
    Matches,
    Mismatches,
    Inconclusive,
}

/// Matches an optional text field (brand, parallel) with unknown-value leniency.
pub fn match_optional_field(record_value: &str, query_value: &str, threshold: f64) -> FieldMatch {
    if query_value.trim().is_empty() || record_value.trim().is_empty() {
        return FieldMatch::Inconclusive;
    }
    if similarity(record_value, query_value) >= threshold {
        FieldMatch::Matches
    } else {
        FieldMatch::Mismatches
    }
}

/// Filters candidate sale records down to the ones comparable to `query`.
///
/// Predicates are applied in order of how strongly each field gates
/// comparability: exact sport and year, then player identity (0.85), brand
/// (0.80), parallel (0.70), and finally an exact graded/raw split. Grade
/// tiers are discrete, so grading is never fuzzy-matched.
///
/// Returns a new vec, most recent sale first; `candidates` is left untouched.
pub fn find_comparables(query: &CardQuery, candidates: &[SaleRecord]) -> Vec<SaleRecord> {
    let mut comparables: Vec<SaleRecord> = candidates
        .iter()
        .filter(|record| is_comparable(query, record))
        .cloned()
        .collect();

    comparables.sort_by(|a, b| b.sold_date.cmp(&a.sold_date));

    log::debug!(
        "Matched {} of {} candidate records for {} {} {}",
        comparables.len(),
        candidates.len(),
        query.year,
        query.player_name,
        query.sport
    );

    comparables
}

fn is_comparable(query: &CardQuery, record: &SaleRecord) -> bool {
    if record.sport != query.sport || record.year != query.year {
        return false;
    }

    if similarity(&record.player_name, &query.player_name) < PLAYER_NAME_THRESHOLD {
        return false;
    }

    if match_optional_field(&record.brand, &query.brand, BRAND_THRESHOLD) == FieldMatch::Mismatches
    {
        return false;
    }

    if match_optional_field(&record.parallel_name, &query.parallel_name, PARALLEL_THRESHOLD)
        == FieldMatch::Mismatches
    {
        return false;
    }

    if query.is_graded {
        record.is_graded
            && record.grade_company == query.grade_company
            && record.grade_value == query.grade_value
    } else {
        !record.is_graded
    }
}

#[cfg(test)]
#[path = "card_matching_tests.rs"]
mod tests;
