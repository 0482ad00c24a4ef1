//! Related-calculator ranking.
//!
//! Candidates are scored by additive similarity to the source page:
//!
//! | Signal                                             | Points |
//! |----------------------------------------------------|--------|
//! | Same category                                      | 10     |
//! | Source keyword also listed by the candidate        | 5 each |
//! | Token shared by a (source, candidate) keyword pair | 2 each |
//! | Token shared by the two names                      | 3 each |
//!
//! Tokens are lowercase whitespace-separated words longer than three
//! characters. Keyword tokens are counted once per keyword pair, so a token
//! that appears in several keywords on both sides scores several times.

use std::collections::HashSet;

use tracing::debug;

use crate::CalculatorMetadata;

pub const SAME_CATEGORY_POINTS: u32 = 10;
pub const SHARED_KEYWORD_POINTS: u32 = 5;
pub const SHARED_KEYWORD_TOKEN_POINTS: u32 = 2;
pub const SHARED_NAME_TOKEN_POINTS: u32 = 3;

/// Below this many resolved manual picks, the scored ranking tops the list up.
pub const MIN_MANUAL_RELATED: usize = 3;

/// Words of this many characters or fewer never count as tokens.
const SHORT_WORD_CHARS: usize = 3;

/// A candidate paired with its score against some source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceScore<'a> {
    pub candidate: &'a CalculatorMetadata,
    pub score: u32,
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > SHORT_WORD_CHARS)
        .collect()
}

fn shared_token_count(
    left: &str,
    right: &str,
) -> u32 {
    let right = tokens(right);
    tokens(left)
        .iter()
        .filter(|token| right.contains(token))
        .count() as u32
}

/// Similarity of `candidate` to `source`.
pub fn score(
    source: &CalculatorMetadata,
    candidate: &CalculatorMetadata,
) -> u32 {
    let mut total = 0;

    if candidate.category == source.category {
        total += SAME_CATEGORY_POINTS;
    }

    for keyword in &source.keywords {
        let keyword_lower = keyword.to_lowercase();
        if candidate
            .keywords
            .iter()
            .any(|other| other.to_lowercase() == keyword_lower)
        {
            total += SHARED_KEYWORD_POINTS;
        }

        for other in &candidate.keywords {
            total += SHARED_KEYWORD_TOKEN_POINTS * shared_token_count(keyword, other);
        }
    }

    total += SHARED_NAME_TOKEN_POINTS * shared_token_count(&source.name, &candidate.name);

    total
}

/// Scores every candidate except the source itself, in input order.
pub fn score_candidates<'a>(
    source: &CalculatorMetadata,
    candidates: &'a [CalculatorMetadata],
) -> Vec<RelevanceScore<'a>> {
    candidates
        .iter()
        .filter(|candidate| candidate.id != source.id)
        .map(|candidate| RelevanceScore {
            candidate,
            score: score(source, candidate),
        })
        .collect()
}

/// Top `max_results` candidates by score. Equal scores keep input order.
///
/// # Example
///
/// ```
/// use calc_core::CalculatorMetadata;
/// use calc_core::related::rank_related;
///
/// fn page(id: &str, category: &str, keywords: &[&str]) -> CalculatorMetadata {
///     CalculatorMetadata {
///         id: id.to_string(),
///         category: category.to_string(),
///         keywords: keywords.iter().map(|k| k.to_string()).collect(),
///         name: id.to_string(),
///         related_ids: None,
///     }
/// }
///
/// let source = page("income-tax", "finance", &["tax calculator"]);
/// let candidates = vec![
///     page("bmi", "health", &["tax calculator"]),
///     page("loan", "finance", &["credit"]),
/// ];
///
/// let ranked = rank_related(&source, &candidates, 5);
/// assert_eq!(ranked[0].id, "loan");
/// ```
pub fn rank_related<'a>(
    source: &CalculatorMetadata,
    candidates: &'a [CalculatorMetadata],
    max_results: usize,
) -> Vec<&'a CalculatorMetadata> {
    let mut scored = score_candidates(source, candidates);
    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    scored
        .into_iter()
        .take(max_results)
        .map(|s| s.candidate)
        .collect()
}

/// Related calculators for `source`, honouring its manual `related_ids`.
///
/// Manual picks come first in listed order. Unknown ids and the source's own
/// id are skipped. When fewer than [`MIN_MANUAL_RELATED`] picks resolve, the
/// scored ranking fills the list up to `max_results` without repeating a
/// manual pick.
pub fn related_for<'a>(
    source: &CalculatorMetadata,
    catalog: &'a [CalculatorMetadata],
    max_results: usize,
) -> Vec<&'a CalculatorMetadata> {
    let ranked = rank_related(source, catalog, catalog.len());

    let mut related: Vec<&CalculatorMetadata> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for id in source.related_ids.iter().flatten() {
        if id == &source.id || seen.contains(id.as_str()) {
            continue;
        }
        match catalog.iter().find(|c| &c.id == id) {
            Some(found) => {
                seen.insert(found.id.as_str());
                related.push(found);
            }
            None => debug!(source = %source.id, id = %id, "skipping unknown related id"),
        }
    }

    if related.len() < MIN_MANUAL_RELATED {
        for candidate in ranked {
            if related.len() >= max_results {
                break;
            }
            if seen.insert(candidate.id.as_str()) {
                related.push(candidate);
            }
        }
    }

    related.truncate(max_results);
    related
}
