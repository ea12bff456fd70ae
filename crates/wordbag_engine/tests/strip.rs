use scraper::Html;
use wordbag_engine::{
    DocumentParser, FragmentParser, MarkupStripper, ParserKind, ParserStrategy, StripError,
};

/// A parser that never finds anything, standing in for a strict parser
/// that gives up on malformed input.
struct BlankParser;

impl ParserStrategy for BlankParser {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn parse(&self, _markup: &str) -> Result<Html, StripError> {
        Ok(Html::new_document())
    }
}

fn visible(lines: &[String]) -> String {
    lines.join("\n")
}

#[test]
fn script_and_style_never_reach_output() {
    let markup = r#"<html><head><style>body { color: red }</style>
        <script>var tracking = "pixel";</script></head>
        <body><p>Hello <script>alert(1)</script>World</p>
        <div><style>.x{}</style>Visible</div></body></html>"#;

    let text = visible(&MarkupStripper::default().strip(markup).unwrap());

    assert!(text.contains("Hello World"));
    assert!(text.contains("Visible"));
    assert!(!text.contains("alert"));
    assert!(!text.contains("tracking"));
    assert!(!text.contains("color"));
}

/// A parser whose backing library is missing.
struct UnavailableParser;

impl ParserStrategy for UnavailableParser {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn parse(&self, _markup: &str) -> Result<Html, StripError> {
        Err(StripError::Failed {
            parser: self.name(),
            reason: "library not loaded".to_string(),
        })
    }
}

#[test]
fn lines_come_only_from_line_breaks_in_the_text() {
    let markup = "<h1>Data Engineer</h1>\n<ul><li>Spark</li> <li>Kafka</li></ul><p>Remote<br>Berlin</p>";
    let lines: Vec<String> = MarkupStripper::default()
        .strip(markup)
        .unwrap()
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();

    assert_eq!(lines, vec!["Data Engineer", "Spark KafkaRemoteBerlin"]);
}

#[test]
fn spacing_between_table_cells_survives() {
    let markup = "<table><tr><td>Python</td> <td>SQL</td></tr></table><p>Senior </p><p>Rust</p>";
    let text = visible(&MarkupStripper::default().strip(markup).unwrap());
    assert_eq!(text, "Python SQLSenior Rust");
}

#[test]
fn comments_are_not_text() {
    let markup = "<p>kept<!-- hidden note --></p>";
    let text = visible(&MarkupStripper::default().strip(markup).unwrap());
    assert!(text.contains("kept"));
    assert!(!text.contains("hidden"));
}

#[test]
fn empty_tree_falls_back_to_next_strategy() {
    let stripper = MarkupStripper::new(vec![Box::new(BlankParser)]).with_fallback(Box::new(DocumentParser));
    let text = visible(&stripper.strip("<p>recovered</p>").unwrap());
    assert_eq!(text.trim(), "recovered");
}

#[test]
fn first_non_empty_strategy_wins() {
    let stripper = MarkupStripper::new(vec![Box::new(FragmentParser), Box::new(BlankParser)]);
    let text = visible(&stripper.strip("<p>first</p>").unwrap());
    assert_eq!(text.trim(), "first");
}

#[test]
fn all_empty_strategies_yield_no_text() {
    let stripper = MarkupStripper::from_kinds(&[ParserKind::Document, ParserKind::Fragment]);
    let lines = stripper.strip("   ").unwrap();
    assert!(lines.iter().all(|line| line.trim().is_empty()));
}

#[test]
fn missing_parsers_is_an_error() {
    let stripper = MarkupStripper::new(Vec::new());
    assert_eq!(stripper.strip("<p>x</p>").unwrap_err(), StripError::NoParsers);
}

#[test]
fn failing_strategy_propagates() {
    let stripper = MarkupStripper::new(vec![Box::new(UnavailableParser)])
        .with_fallback(Box::new(DocumentParser));
    let err = stripper.strip("<p>x</p>").unwrap_err();
    assert!(matches!(err, StripError::Failed { parser: "unavailable", .. }));
}

#[test]
fn nul_characters_do_not_stop_parsing() {
    let text = visible(&MarkupStripper::default().strip("<p>Rust\0 developer</p>").unwrap());
    assert!(text.contains("Rust"));
    assert!(text.contains("developer"));
}
