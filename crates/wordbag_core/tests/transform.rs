use std::sync::{Arc, Once};

use pretty_assertions::assert_eq;
use wordbag_core::{join_fragments, StopwordSet, TokenBag, TokenFilter};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn english_filter() -> TokenFilter {
    TokenFilter::new(Arc::new(StopwordSet::english()))
}

const JOB_AD: [&str; 6] = [
    "  Data Scientist (m/f/d)  ",
    "We are looking for someone with Python, SQL and C++ experience.",
    "Skills:   D3.js   Tableau   Spark",
    "",
    "Salary: 80,000 - 95,000 EUR",
    "Apply now! Apply today!",
];

#[test]
fn dedup_is_idempotent() {
    init_logging();
    let filter = english_filter();
    let first = filter.filter(&join_fragments(&JOB_AD));

    let rejoined = first.iter().collect::<Vec<_>>().join(" ");
    let second = filter.filter(&rejoined);

    assert_eq!(first, second);
}

#[test]
fn no_stopword_survives() {
    init_logging();
    let stopwords = Arc::new(StopwordSet::english());
    let filter = TokenFilter::new(stopwords.clone());
    let bag = filter.filter(&join_fragments(&JOB_AD));

    assert!(!bag.is_empty());
    for token in bag.iter() {
        assert!(!stopwords.contains(token), "stopword {token} leaked");
    }
}

#[test]
fn tokens_stay_in_character_class() {
    init_logging();
    let noisy = [
        "\u{201c}Caf\u{e9}\u{201d} \u{2014} na\u{ef}ve r\u{e9}sum\u{e9}",
        "e-mail: jobs@example.com, tel. +49 (0)30 1234",
        "<tags> & {braces} [brackets] ~tilde~ 42% $100",
    ];
    let bag = TokenFilter::new(Arc::new(StopwordSet::empty())).filter(&join_fragments(&noisy));

    assert!(!bag.is_empty());
    for token in bag.iter() {
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '+' || c == '3'),
            "token {token:?} escapes the character class"
        );
    }
}

#[test]
fn symbol_names_survive_filtering() {
    init_logging();
    let bag = english_filter().filter(&join_fragments(&JOB_AD));

    assert!(bag.contains("c++"));
    assert!(bag.contains("d3"));
    assert!(bag.contains("python"));
    assert!(bag.contains("sql"));
}

#[test]
fn line_join_merges_adjacent_words() {
    init_logging();
    let joined = join_fragments(&["Senior developer, remote end", "Start date: ASAP"]);
    assert!(joined.contains("endStart"));

    let bag = TokenFilter::new(Arc::new(StopwordSet::empty())).filter(&joined);
    assert!(bag.contains("endstart"));
    assert!(!bag.contains("end"));
}

#[test]
fn frequency_counts_documents_not_occurrences() {
    init_logging();
    let filter = TokenFilter::new(Arc::new(StopwordSet::from_words(["and"])));
    let bags: Vec<TokenBag> = [
        "rust rust rust and go",
        "rust and python",
        "python and sql",
    ]
    .iter()
    .map(|text| filter.filter(text))
    .collect();

    let mut frequency = wordbag_core::DocumentFrequency::new();
    frequency.extend(&bags);

    assert_eq!(frequency.documents(), 3);
    assert_eq!(frequency.count("rust"), 2);
    assert_eq!(frequency.count("and"), 0);
    let top: Vec<(String, usize)> = frequency
        .top(3)
        .into_iter()
        .map(|entry| (entry.token, entry.documents))
        .collect();
    assert_eq!(
        top,
        vec![
            ("python".to_string(), 2),
            ("rust".to_string(), 2),
            ("go".to_string(), 1),
        ]
    );
}
