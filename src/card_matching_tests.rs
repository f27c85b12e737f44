//! Tests for the similarity scorer and the comparable-record filter.

use chrono::{Duration, Utc};

use super::{
    find_comparables, match_optional_field, similarity, FieldMatch, BRAND_THRESHOLD,
    PARALLEL_THRESHOLD,
};
use crate::models::{CardQuery, SaleRecord, Sport};

fn record(player: &str, days_ago: i64) -> SaleRecord {
    SaleRecord {
        sport: Sport::Baseball,
        year: 2024,
        player_name: player.to_string(),
        brand: String::new(),
        parallel_name: String::new(),
        is_graded: false,
        grade_company: String::new(),
        grade_value: String::new(),
        sold_price: 50.0,
        sold_date: Utc::now() - Duration::days(days_ago),
    }
}

fn query(player: &str) -> CardQuery {
    CardQuery::new(Sport::Baseball, 2024, player)
}

// ── similarity ───────────────────────────────────────────────────────

#[test]
fn identical_strings_score_one() {
    for s in ["Shohei Ohtani", "a", "Topps Chrome", "2024 Prizm Silver"] {
        assert_eq!(similarity(s, s), 1.0);
    }
}

#[test]
fn similarity_is_symmetric() {
    let pairs = [
        ("Shohei Ohtani", "Shohei Ohtanni"),
        ("Topps", "Topps Chrome"),
        ("", "Bowman"),
        ("Mike Trout", "Mike Troutt"),
    ];
    for (a, b) in pairs {
        assert_eq!(similarity(a, b), similarity(b, a));
    }
}

#[test]
fn empty_string_rules() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("   ", ""), 1.0);
    assert_eq!(similarity("", "Ohtani"), 0.0);
    assert_eq!(similarity("Ohtani", ""), 0.0);
}

#[test]
fn case_and_whitespace_are_normalized() {
    assert_eq!(similarity("SHOHEI  OHTANI", "shohei ohtani"), 1.0);
    assert_eq!(similarity("  Topps Chrome ", "topps chrome"), 1.0);
}

#[test]
fn single_typo_scores_high() {
    let score = similarity("Shohei Ohtani", "Shohei Ohtanni");
    assert!(score > 0.9, "one inserted char should score high, got {score}");
}

#[test]
fn unrelated_names_score_low() {
    let score = similarity("Shohei Ohtani", "Victor Wembanyama");
    assert!(score < 0.5, "unrelated names should score low, got {score}");
}

// ── filter: player-name threshold boundary ───────────────────────────

#[test]
fn player_similarity_at_threshold_is_included() {
    // 20 chars with 3 substitutions: 1 - 3/20 = 0.85 exactly
    let q = query("abcdefghijklmnopqrst");
    let r = record("xxxdefghijklmnopqrst", 5);
    assert_eq!(similarity(&r.player_name, &q.player_name), 0.85);
    assert_eq!(find_comparables(&q, &[r]).len(), 1);
}

#[test]
fn player_similarity_below_threshold_is_excluded() {
    // 25 chars with 4 substitutions: 1 - 4/25 = 0.84
    let q = query("abcdefghijklmnopqrstuvwxy");
    let r = record("xxxxefghijklmnopqrstuvwxy", 5);
    assert_eq!(similarity(&r.player_name, &q.player_name), 0.84);
    assert!(find_comparables(&q, &[r]).is_empty());
}

// ── filter: sport and year are exact gates ───────────────────────────

#[test]
fn sport_mismatch_excludes_record() {
    let q = CardQuery::new(Sport::Basketball, 2024, "Shohei Ohtani");
    let r = record("Shohei Ohtani", 5);
    assert!(find_comparables(&q, &[r]).is_empty());
}

#[test]
fn year_mismatch_excludes_record() {
    let q = CardQuery::new(Sport::Baseball, 2023, "Shohei Ohtani");
    let r = record("Shohei Ohtani", 5);
    assert!(find_comparables(&q, &[r]).is_empty());
}

// ── filter: optional-field leniency ──────────────────────────────────

#[test]
fn unknown_record_brand_is_inconclusive_not_mismatch() {
    assert_eq!(
        match_optional_field("", "Topps", BRAND_THRESHOLD),
        FieldMatch::Inconclusive
    );

    let mut q = query("Shohei Ohtani");
    q.brand = "Topps".to_string();
    let r = record("Shohei Ohtani", 5); // brand unknown
    assert_eq!(find_comparables(&q, &[r]).len(), 1);
}

#[test]
fn unconstrained_query_brand_is_inconclusive() {
    assert_eq!(
        match_optional_field("Topps", "", BRAND_THRESHOLD),
        FieldMatch::Inconclusive
    );
}

#[test]
fn wrong_brand_is_a_mismatch() {
    assert_eq!(
        match_optional_field("Panini Prizm", "Topps Chrome", BRAND_THRESHOLD),
        FieldMatch::Mismatches
    );

    let mut q = query("Shohei Ohtani");
    q.brand = "Topps Chrome".to_string();
    let mut r = record("Shohei Ohtani", 5);
    r.brand = "Panini Prizm".to_string();
    assert!(find_comparables(&q, &[r]).is_empty());
}

#[test]
fn near_brand_passes_fuzzy_match() {
    let mut q = query("Shohei Ohtani");
    q.brand = "Topps Chrome".to_string();
    let mut r = record("Shohei Ohtani", 5);
    r.brand = "Topps Chrom".to_string();
    assert_eq!(find_comparables(&q, &[r]).len(), 1);
}

#[test]
fn parallel_uses_loosest_threshold() {
    assert_eq!(
        match_optional_field("Silver Prizm", "Silver", PARALLEL_THRESHOLD),
        FieldMatch::Mismatches
    );
    assert_eq!(
        match_optional_field("Gold Wave", "GoldWave", PARALLEL_THRESHOLD),
        FieldMatch::Matches
    );
}

// ── filter: grading branch ───────────────────────────────────────────

#[test]
fn graded_query_never_matches_raw_record() {
    let mut q = query("Shohei Ohtani");
    q.is_graded = true;
    q.grade_company = "PSA".to_string();
    q.grade_value = "10".to_string();

    let r = record("Shohei Ohtani", 5); // raw, otherwise identical
    assert!(find_comparables(&q, &[r]).is_empty());
}

#[test]
fn raw_query_never_matches_graded_record() {
    let q = query("Shohei Ohtani");
    let mut r = record("Shohei Ohtani", 5);
    r.is_graded = true;
    r.grade_company = "PSA".to_string();
    r.grade_value = "10".to_string();
    assert!(find_comparables(&q, &[r]).is_empty());
}

#[test]
fn grade_tier_must_match_exactly() {
    let mut q = query("Shohei Ohtani");
    q.is_graded = true;
    q.grade_company = "PSA".to_string();
    q.grade_value = "10".to_string();

    let mut nine = record("Shohei Ohtani", 5);
    nine.is_graded = true;
    nine.grade_company = "PSA".to_string();
    nine.grade_value = "9".to_string();

    let mut bgs_ten = record("Shohei Ohtani", 3);
    bgs_ten.is_graded = true;
    bgs_ten.grade_company = "BGS".to_string();
    bgs_ten.grade_value = "10".to_string();

    let mut psa_ten = record("Shohei Ohtani", 1);
    psa_ten.is_graded = true;
    psa_ten.grade_company = "PSA".to_string();
    psa_ten.grade_value = "10".to_string();

    let matches = find_comparables(&q, &[nine, bgs_ten, psa_ten.clone()]);
    assert_eq!(matches, vec![psa_ten]);
}

// ── filter: output ordering ──────────────────────────────────────────

#[test]
fn comparables_are_most_recent_first() {
    let q = query("Shohei Ohtani");
    let old = record("Shohei Ohtani", 30);
    let mid = record("Shohei Ohtani", 10);
    let new = record("Shohei Ohtani", 1);

    let matches = find_comparables(&q, &[old.clone(), new.clone(), mid.clone()]);
    assert_eq!(matches, vec![new, mid, old]);
}
