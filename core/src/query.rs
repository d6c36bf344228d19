use crate::analysis::Analyzer;
use crate::error::Error;

/// Positional constraint between consecutive keywords.
///
/// The three surface grammars reduce to one keyword list plus one of these
/// variants, so the matcher never branches on query type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Type 1: keywords must co-occur in a document, no positional relation.
    Conjunction,
    /// Type 2: each keyword's position must immediately follow the previous
    /// one (gap 0). Stopwords still occupy position slots, so a phrase never
    /// spans a stopword-masked gap.
    Phrase,
    /// Type 3: explicit maximum forward distance between each consecutive
    /// keyword pair; carries exactly `keywords.len() - 1` bounds.
    Proximity(Vec<u32>),
}

/// A normalized query: stemmed keywords plus the positional constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub keywords: Vec<String>,
    pub kind: QueryKind,
}

impl Query {
    /// Parse a query line: a leading type marker `1`, `2`, or `3`, then the
    /// grammar for that type. Keywords are canonicalized with the same
    /// analyzer used at index time.
    ///
    /// - `1 <term> AND <term> [AND <term> ...]`
    /// - `2 <term> <term> [<term> ...]`
    /// - `3 <term> /<N> <term> [/<N> <term> ...]`
    pub fn parse(line: &str, analyzer: &Analyzer) -> Result<Query, Error> {
        let mut parts = line.split_whitespace();
        let marker = parts.next().ok_or_else(|| Error::syntax("empty query"))?;
        let tokens: Vec<&str> = parts.collect();
        if tokens.is_empty() {
            return Err(Error::syntax("query has no terms"));
        }
        match marker {
            "1" => parse_conjunction(&tokens, analyzer),
            "2" => Ok(Query {
                keywords: tokens.iter().map(|t| analyzer.stem(t)).collect(),
                kind: QueryKind::Phrase,
            }),
            "3" => parse_proximity(&tokens, analyzer),
            other => Err(Error::syntax(format!("unknown query type marker {other:?}"))),
        }
    }

    /// Per-gap distance bounds, `None` for pure conjunction.
    pub fn gaps(&self) -> Option<Vec<u32>> {
        match &self.kind {
            QueryKind::Conjunction => None,
            QueryKind::Phrase => Some(vec![0; self.keywords.len().saturating_sub(1)]),
            QueryKind::Proximity(bounds) => Some(bounds.clone()),
        }
    }
}

/// Keywords at even slots, the literal connective `AND` at odd slots. The
/// connective is recognized by slot position, so an even-slot token is always
/// a keyword.
fn parse_conjunction(tokens: &[&str], analyzer: &Analyzer) -> Result<Query, Error> {
    if tokens.len() % 2 == 0 {
        return Err(Error::syntax("type 1 expects <term> AND <term> [AND <term> ...]"));
    }
    let mut keywords = Vec::with_capacity(tokens.len() / 2 + 1);
    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 1 {
            if *token != "AND" {
                return Err(Error::syntax(format!("expected AND connective, found {token:?}")));
            }
        } else {
            keywords.push(analyzer.stem(token));
        }
    }
    Ok(Query { keywords, kind: QueryKind::Conjunction })
}

/// Keywords at even slots, `/N` markers at odd slots, N a non-negative
/// integer.
fn parse_proximity(tokens: &[&str], analyzer: &Analyzer) -> Result<Query, Error> {
    if tokens.len() % 2 == 0 {
        return Err(Error::syntax("type 3 expects <term> /<N> <term> [/<N> <term> ...]"));
    }
    let mut keywords = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut bounds = Vec::with_capacity(tokens.len() / 2);
    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 1 {
            let digits = token
                .strip_prefix('/')
                .ok_or_else(|| Error::syntax(format!("expected /N marker, found {token:?}")))?;
            let n: u32 = digits
                .parse()
                .map_err(|_| Error::syntax(format!("invalid proximity bound {token:?}")))?;
            bounds.push(n);
        } else {
            keywords.push(analyzer.stem(token));
        }
    }
    Ok(Query { keywords, kind: QueryKind::Proximity(bounds) })
}
