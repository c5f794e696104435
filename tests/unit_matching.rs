// Unit tests for the matching engine through the public API.
//
// Covers the properties every keyword pass relies on: matches are a subset
// of the list, matching is idempotent, the classifier returns exactly one
// label by rank, co-occurrence pairs are C(n,2), and the three-way regional
// focus rule.

use papersift::keywords::list::{Dimension, KeywordList};
use papersift::matching::classifier::{three_way, two_way, EquationCategory};
use papersift::matching::cooccurrence::{CooccurrenceTracker, DocumentLabels};
use papersift::matching::focus::{determine, FocusTally, RegionalFocus};
use papersift::matching::matcher::{find_matches, Matcher};
use papersift::matching::tagger::{MentionExtractor, Tagger};

fn list(name: &str, keywords: &[&str]) -> KeywordList {
    KeywordList::from_strs(name, keywords).unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn regions() -> Dimension {
    Dimension::grouped(
        "regions",
        vec![
            ("USA".to_string(), strings(&["california", "united states"])),
            (
                "Canada".to_string(),
                strings(&["canada", "british columbia", "alberta"]),
            ),
        ],
    )
    .unwrap()
}

// ============================================================
// Keyword matcher
// ============================================================

#[test]
fn matches_are_subset_of_list_and_idempotent() {
    let keywords = list("themes", &["wildfire", "smoke", "drought", "flood"]);
    let text = "Smoke from the wildfire, then more smoke. Wildfire season.";

    let first = find_matches(text, &keywords).unwrap();
    let second = find_matches(text, &keywords).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, vec!["wildfire", "smoke"]);
    assert!(first.iter().all(|k| keywords.keywords().contains(k)));
}

#[test]
fn class_does_not_match_classifier() {
    let m = Matcher::bounded(&list("methods", &["class"])).unwrap();
    assert!(m.all_matches("a gradient boosted classifier").is_empty());
}

#[test]
fn svm_matches_svm_based() {
    let m = Matcher::bounded(&list("methods", &["SVM"])).unwrap();
    assert_eq!(m.all_matches("SVM-based classification"), vec!["SVM"]);
}

#[test]
fn first_match_and_all_matches_differ() {
    let m = Matcher::bounded(&list("pde", &["heat equation", "wave equation"])).unwrap();
    let text = "the wave equation and the heat equation";
    assert_eq!(m.first_match(text), Some("heat equation"));
    assert_eq!(m.all_matches(text).len(), 2);
}

// ============================================================
// Classifier
// ============================================================

#[test]
fn classifier_returns_first_true_predicate() {
    let pde = list("pde_categories", &["heat equation"]);
    let sde = list("sde_categories", &["Brownian motion"]);
    let sensor = list("sensor_categories", &["LiDAR"]);
    let c = three_way(&pde, &sde, &sensor).unwrap();

    let cases = [
        ("heat equation, Brownian motion and LiDAR", EquationCategory::Both),
        ("heat equation with LiDAR", EquationCategory::PdeOnly),
        ("Brownian motion with LiDAR", EquationCategory::SdeOnly),
        ("LiDAR only", EquationCategory::SensorOnly),
        ("nothing relevant", EquationCategory::Neither),
        ("", EquationCategory::Neither),
    ];
    for (text, expected) in cases {
        assert_eq!(c.classify(text), expected, "text: {text}");
    }
}

#[test]
fn two_way_never_returns_sensor_only() {
    let pde = list("pde_categories", &["heat equation"]);
    let sde = list("sde_categories", &["Brownian motion"]);
    let c = two_way(&pde, &sde).unwrap();
    assert!(!c.labels().contains(&EquationCategory::SensorOnly));
    assert_eq!(c.classify("LiDAR only"), EquationCategory::Neither);
}

#[test]
fn classification_is_deterministic() {
    let pde = list("pde_categories", &["heat equation"]);
    let sde = list("sde_categories", &["Ito"]);
    let c = two_way(&pde, &sde).unwrap();
    let text = "Ito calculus meets the heat equation";
    assert_eq!(c.classify(text), c.classify(text));
}

// ============================================================
// Co-occurrence
// ============================================================

#[test]
fn theme_pairs_equal_n_choose_2() {
    for n in 2..6usize {
        let labels: Vec<String> = (0..n).map(|i| format!("theme{i}")).collect();
        let mut tracker = CooccurrenceTracker::new(&["themes"], &[]);
        let mut doc = DocumentLabels::new();
        doc.insert("themes", &labels);
        tracker.record(&doc);
        assert_eq!(tracker.within("themes").len(), n * (n - 1) / 2);
    }
}

#[test]
fn pairs_accumulate_across_documents() {
    let mut tracker = CooccurrenceTracker::new(&["themes"], &[("themes", "datasets")]);
    for _ in 0..3 {
        let mut doc = DocumentLabels::new();
        doc.insert("themes", &strings(&["wildfire", "smoke"]));
        doc.insert("datasets", &strings(&["MODIS"]));
        tracker.record(&doc);
    }
    assert_eq!(tracker.within_count("themes", "smoke", "wildfire"), 3);
    assert_eq!(tracker.cross_count("themes", "datasets", "smoke", "MODIS"), 3);
}

// ============================================================
// Tagger and regional focus
// ============================================================

#[test]
fn british_columbia_is_regional_canada() {
    let tagger = Tagger::new(&regions()).unwrap();
    let text = "Fire weather in British Columbia";
    let found = tagger.tag(text);
    assert_eq!(found, vec!["Canada"]);
    assert_eq!(determine(&found, text), RegionalFocus::Regional);
}

#[test]
fn global_only_is_excluded_from_regional_and_unclear() {
    let tagger = Tagger::new(&regions()).unwrap();
    let mut tally = FocusTally::default();
    for text in [
        "A GLOBAL assessment of burned area",
        "Fires in Alberta",
        "an unrelated study of urban transit",
    ] {
        tally.record(determine(&tagger.tag(text), text));
    }
    assert_eq!(tally.regional, 1);
    assert_eq!(tally.unclear, 1);
    assert_eq!(tally.global, 1);
}

#[test]
fn dimensions_are_tagged_independently() {
    let regions = Tagger::new(&regions()).unwrap();
    let datasets = Tagger::new(&Dimension::flat(&list("datasets", &["MODIS", "VIIRS"]))).unwrap();
    let text = "MODIS and VIIRS over California and Alberta";
    assert_eq!(regions.tag(text), vec!["USA", "Canada"]);
    assert_eq!(datasets.tag(text), vec!["MODIS", "VIIRS"]);
}

#[test]
fn mention_window_is_five_words() {
    let extractor = MentionExtractor::new(&list("dataset_variations", &["MODIS"])).unwrap();
    let mentions = extractor.extract("MODIS imagery used for training the model daily");
    assert_eq!(mentions.len(), 1);
    assert_eq!(
        mentions[0].following,
        vec!["imagery", "used", "for", "training", "the"]
    );
}

#[test]
fn mention_recorded_per_occurrence() {
    let extractor = MentionExtractor::new(&list("dataset_variations", &["MODIS"])).unwrap();
    let mentions = extractor.extract("MODIS burned area. Later, MODIS active fire counts.");
    assert_eq!(mentions.len(), 2);
}
