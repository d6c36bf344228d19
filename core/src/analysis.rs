use crate::Position;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref DEFAULT_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Stopword set plus stemmer, shared by indexing and query parsing so both
/// sides canonicalize terms identically.
pub struct Analyzer {
    stemmer: Stemmer,
    stopwords: HashSet<String>,
}

impl Analyzer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English), stopwords }
    }

    pub fn with_default_stopwords() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect())
    }

    /// Load a whitespace-separated stopword file, one set for the whole build.
    pub fn from_stopword_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading stopword file {}", path.as_ref().display()))?;
        let stopwords = text.split_whitespace().map(|w| w.to_lowercase()).collect();
        Ok(Self::new(stopwords))
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Canonicalize a single token: NFKC, lowercase, stem. Used for query
    /// keywords, which bypass stopword filtering.
    pub fn stem(&self, token: &str) -> String {
        let normalized = token.nfkc().collect::<String>().to_lowercase();
        self.stemmer.stem(&normalized).to_string()
    }

    /// Tokenize a document into (stem, position) pairs by whitespace split.
    ///
    /// Every token advances the position counter; stopwords are dropped from
    /// the output only. This keeps proximity distances comparable across
    /// terms regardless of intervening stopwords.
    pub fn tokenize(&self, text: &str) -> Vec<(String, Position)> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut out = Vec::new();
        for (pos, token) in normalized.split_whitespace().enumerate() {
            if self.is_stopword(token) {
                continue;
            }
            out.push((self.stemmer.stem(token).to_string(), pos as Position));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_surface_forms() {
        let a = Analyzer::with_default_stopwords();
        let toks = a.tokenize("running runners run");
        assert!(toks.iter().all(|(w, _)| w == "run" || w == "runner"));
    }

    #[test]
    fn stopwords_keep_their_position_slots() {
        let a = Analyzer::with_default_stopwords();
        let toks = a.tokenize("the stock market fell today the stock rose");
        let positions: Vec<(&str, Position)> =
            toks.iter().map(|(w, p)| (w.as_str(), *p)).collect();
        assert_eq!(
            positions,
            vec![("stock", 1), ("market", 2), ("fell", 3), ("today", 4), ("stock", 6), ("rose", 7)]
        );
    }

    #[test]
    fn custom_stopword_set() {
        let a = Analyzer::new(["the".to_string()].into_iter().collect());
        let toks = a.tokenize("the and the");
        let words: Vec<&str> = toks.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["and"]);
    }

    #[test]
    fn query_stem_matches_index_stem() {
        let a = Analyzer::with_default_stopwords();
        let toks = a.tokenize("markets");
        assert_eq!(toks[0].0, a.stem("Markets"));
    }
}
