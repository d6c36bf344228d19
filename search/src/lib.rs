use proxima_core::analysis::Analyzer;
use proxima_core::matcher;
use proxima_core::persist::{load_index, IndexPaths};
use proxima_core::{DocId, Error, Index, Query};

/// A loaded read-only index plus the analyzer that canonicalizes query
/// keywords the same way the indexer canonicalized document tokens.
pub struct SearchSession {
    index: Index,
    analyzer: Analyzer,
}

impl SearchSession {
    /// Load a persisted index. Missing or unreadable tables are fatal for
    /// this invocation (`Error::IndexUnavailable`).
    pub fn open(index_dir: &str) -> Result<Self, Error> {
        let index = load_index(&IndexPaths::new(index_dir))?;
        Ok(Self { index, analyzer: Analyzer::with_default_stopwords() })
    }

    /// Answer one query line, rendering the ascending match list as
    /// `[1, 7, 42]`. A keyword absent from the corpus answers `[]`;
    /// syntax errors propagate to the caller without a partial result.
    pub fn answer_line(&self, line: &str) -> Result<String, Error> {
        let query = Query::parse(line, &self.analyzer)?;
        match matcher::search(&self.index, &query) {
            Ok(ids) => Ok(render(&ids)),
            Err(Error::UnknownTerm { term }) => {
                tracing::warn!(%term, "query term not in dictionary");
                Ok(render(&[]))
            }
            Err(err) => Err(err),
        }
    }
}

/// `[]`, `[1]`, `[1, 7, 42]` — bracketed, comma-separated, ascending.
pub fn render(ids: &[DocId]) -> String {
    let items: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bracketed_lists() {
        assert_eq!(render(&[]), "[]");
        assert_eq!(render(&[1]), "[1]");
        assert_eq!(render(&[1, 7, 42]), "[1, 7, 42]");
    }
}
