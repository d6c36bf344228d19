use crate::error::Error;
use crate::index::Index;
use crate::query::Query;
use crate::{DocId, Position, TermId};
use std::sync::atomic::{AtomicBool, Ordering};

/// Evaluate a normalized query, returning matching doc ids in ascending
/// order. An empty result is `Ok(vec![])`, never an error; a keyword absent
/// from the dictionary is `Error::UnknownTerm`.
pub fn search(index: &Index, query: &Query) -> Result<Vec<DocId>, Error> {
    search_cancellable(index, query, &AtomicBool::new(false))
}

/// Like [`search`], but checks `cancel` between candidate documents so a
/// runaway evaluation over a pathological corpus can be abandoned.
pub fn search_cancellable(
    index: &Index,
    query: &Query,
    cancel: &AtomicBool,
) -> Result<Vec<DocId>, Error> {
    let mut term_ids = Vec::with_capacity(query.keywords.len());
    for keyword in &query.keywords {
        let id = index
            .dictionary
            .id(keyword)
            .ok_or_else(|| Error::UnknownTerm { term: keyword.clone() })?;
        term_ids.push(id);
    }

    // Candidate reduction: intersect per-keyword document sets. This answers
    // the conjunction case directly and shrinks the positional search space.
    let first = match term_ids.first().and_then(|&tid| index.postings.documents(tid)) {
        Some(docs) => docs,
        None => return Ok(Vec::new()),
    };
    let mut candidates: Vec<DocId> = first.keys().copied().collect();
    for &tid in &term_ids[1..] {
        let docs = match index.postings.documents(tid) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        candidates.retain(|doc| docs.contains_key(doc));
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
    }

    // BTreeMap keys come out ascending, so candidates are already sorted.
    let gaps = match query.gaps() {
        None => return Ok(candidates),
        Some(gaps) if gaps.is_empty() => return Ok(candidates),
        Some(gaps) => gaps,
    };

    let mut matched = Vec::new();
    for &doc in &candidates {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }
        if chain_matches(index, &term_ids, &gaps, doc) {
            matched.push(doc);
        }
    }
    Ok(matched)
}

/// Chained window check over one candidate document.
///
/// The active set starts as keyword 1's posting list. Each round maps every
/// active position p to the smallest position q >= p of the next keyword and
/// keeps q iff q <= p + gap + 1. Choosing the smallest feasible q is sound:
/// each bound constrains only the gap from the immediately preceding chosen
/// position, so a smaller q never forecloses a completion a larger q would
/// allow. Replacing this with a cross-product of position combinations, or
/// with the last qualifying successor, breaks either the complexity or the
/// bound.
fn chain_matches(index: &Index, term_ids: &[TermId], gaps: &[u32], doc: DocId) -> bool {
    let mut active: Vec<Position> = match index.postings.positions(term_ids[0], doc) {
        Some(list) => list.to_vec(),
        None => return false,
    };
    for (i, &gap) in gaps.iter().enumerate() {
        let next_list = match index.postings.positions(term_ids[i + 1], doc) {
            Some(list) => list,
            None => return false,
        };
        let mut survivors: Vec<Position> = Vec::new();
        for &p in &active {
            let ord = next_list.partition_point(|&q| q < p);
            if ord == next_list.len() {
                // active is ascending, so every later p also overshoots
                break;
            }
            let q = next_list[ord];
            if u64::from(q) <= u64::from(p) + u64::from(gap) + 1 {
                // successive q values are non-decreasing; dedup adjacent
                if survivors.last() != Some(&q) {
                    survivors.push(q);
                }
            }
        }
        if survivors.is_empty() {
            return false;
        }
        active = survivors;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::query::QueryKind;

    fn build(docs: &[&str]) -> (Index, Analyzer) {
        let analyzer = Analyzer::new(["the".to_string()].into_iter().collect());
        let docs: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        (Index::build(&docs, &analyzer), analyzer)
    }

    fn run(index: &Index, analyzer: &Analyzer, line: &str) -> Vec<DocId> {
        let query = Query::parse(line, analyzer).unwrap();
        search(index, &query).unwrap()
    }

    #[test]
    fn phrase_across_stopword_slots() {
        // stock@1 market@2: market is exactly stock + 0 + 1
        let (index, a) = build(&["the stock market fell today the stock rose"]);
        assert_eq!(run(&index, &a, "2 stock market"), vec![1]);
        // rose@7 is not adjacent to either stock occurrence's successor slot
        assert_eq!(run(&index, &a, "2 stock rose"), vec![1]);
        assert_eq!(run(&index, &a, "2 market rose"), Vec::<DocId>::new());
    }

    #[test]
    fn proximity_needs_only_one_qualifying_occurrence() {
        // stock@1 fails (rose@7 > 1+1+1) but stock@6 succeeds (7 <= 6+1+1)
        let (index, a) = build(&["the stock market fell today the stock rose"]);
        assert_eq!(run(&index, &a, "3 stock /1 rose"), vec![1]);
        assert_eq!(run(&index, &a, "3 market /1 rose"), Vec::<DocId>::new());
    }

    #[test]
    fn three_keyword_chain() {
        let (index, a) = build(&["alpha beta gamma", "alpha beta delta epsilon zeta gamma"]);
        assert_eq!(run(&index, &a, "3 alpha /0 beta /0 gamma"), vec![1]);
        assert_eq!(run(&index, &a, "3 alpha /0 beta /3 gamma"), vec![1, 2]);
    }

    #[test]
    fn conjunction_is_order_independent_intersection() {
        let (index, a) = build(&["wheat corn", "corn barley", "wheat corn barley"]);
        assert_eq!(run(&index, &a, "1 wheat AND corn"), vec![1, 3]);
        assert_eq!(run(&index, &a, "1 corn AND wheat"), vec![1, 3]);
        assert_eq!(run(&index, &a, "1 barley AND corn AND wheat"), vec![3]);
    }

    #[test]
    fn unknown_term_is_an_explicit_error() {
        let (index, a) = build(&["wheat corn"]);
        let query = Query::parse("1 wheat AND banana", &a).unwrap();
        assert!(matches!(search(&index, &query), Err(Error::UnknownTerm { .. })));
    }

    #[test]
    fn matcher_is_idempotent() {
        let (index, a) = build(&["alpha beta", "beta alpha", "alpha gamma beta"]);
        let query = Query::parse("3 alpha /2 beta", &a).unwrap();
        let first = search(&index, &query).unwrap();
        let second = search(&index, &query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn greedy_chain_survives_decoy_early_occurrences() {
        // b@1 chains from a@0 but strands c (c@9 too far); the surviving
        // window must come from a@4 b@5 c@6. A "first match then commit to a
        // single position" strategy that kept only b@1 would miss this.
        let (index, a) =
            build(&["a b x x a b c x x c"]);
        assert_eq!(run(&index, &a, "3 a /0 b /0 c"), vec![1]);
    }

    #[test]
    fn four_keyword_adversarial_chain() {
        // doc 1: a@0 b@1 c@2 d@3 satisfies /0 /0 /0
        // doc 2: every pair is close but the full chain cannot complete
        let (index, a) = build(&["a b c d", "a b c x x x d"]);
        assert_eq!(run(&index, &a, "3 a /0 b /0 c /0 d"), vec![1]);
        assert_eq!(run(&index, &a, "3 a /0 b /0 c /3 d"), vec![1, 2]);
    }

    #[test]
    fn duplicate_survivors_are_deduplicated() {
        // both a@0 and a@1 map to the same b@2 under a generous bound
        let (index, a) = build(&["a a b c"]);
        assert_eq!(run(&index, &a, "3 a /5 b /5 c"), vec![1]);
    }

    #[test]
    fn cancelled_evaluation_reports_cancelled() {
        let (index, a) = build(&["alpha beta", "alpha beta"]);
        let query = Query::parse("3 alpha /1 beta", &a).unwrap();
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            search_cancellable(&index, &query, &cancel),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn single_keyword_returns_containing_documents() {
        let (index, a) = build(&["wheat", "corn", "wheat corn"]);
        assert_eq!(run(&index, &a, "1 wheat"), vec![1, 3]);
        let query = Query { keywords: vec![a.stem("wheat")], kind: QueryKind::Phrase };
        assert_eq!(search(&index, &query).unwrap(), vec![1, 3]);
    }
}
