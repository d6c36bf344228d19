use proxima_core::analysis::Analyzer;
use proxima_core::persist::{save_index, IndexPaths};
use proxima_core::{Error, Index};
use proxima_search::SearchSession;
use tempfile::tempdir;

fn persist_tiny_index(dir: &std::path::Path) {
    let analyzer = Analyzer::with_default_stopwords();
    let docs = vec![
        "the stock market fell today the stock rose".to_string(),
        "corn and wheat shipments rose sharply".to_string(),
    ];
    let index = Index::build(&docs, &analyzer);
    save_index(&IndexPaths::new(dir), &index, "2026-01-01T00:00:00Z".to_string()).unwrap();
}

#[test]
fn answers_all_three_grammars_from_disk() {
    let dir = tempdir().unwrap();
    persist_tiny_index(dir.path());
    let session = SearchSession::open(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(session.answer_line("2 stock market").unwrap(), "[1]");
    assert_eq!(session.answer_line("3 stock /1 rose").unwrap(), "[1]");
    assert_eq!(session.answer_line("1 rose AND stock").unwrap(), "[1]");
    assert_eq!(session.answer_line("1 rose AND shipments").unwrap(), "[2]");
    assert_eq!(session.answer_line("1 stock AND wheat").unwrap(), "[]");
}

#[test]
fn unknown_term_renders_empty_not_fault() {
    let dir = tempdir().unwrap();
    persist_tiny_index(dir.path());
    let session = SearchSession::open(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(session.answer_line("1 stock AND banana").unwrap(), "[]");
}

#[test]
fn syntax_error_aborts_only_that_query() {
    let dir = tempdir().unwrap();
    persist_tiny_index(dir.path());
    let session = SearchSession::open(dir.path().to_str().unwrap()).unwrap();
    assert!(matches!(
        session.answer_line("3 stock /x rose"),
        Err(Error::QuerySyntax { .. })
    ));
    // the session is untouched by the failed query
    assert_eq!(session.answer_line("2 stock market").unwrap(), "[1]");
}

#[test]
fn missing_index_directory_is_unavailable() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        SearchSession::open(missing.to_str().unwrap()),
        Err(Error::IndexUnavailable { .. })
    ));
}
