//! Identity resolution: online handle + display name → registry rating.
//!
//! Resolution is a cascade where the first hit wins:
//! 1. `EXACT_HANDLE` - the lowercase handle is itself an index key
//! 2. `DIRECT_ORDER` - display name tokens as `first_last`
//! 3. `REVERSED_ORDER` - display name tokens as `last_first`
//! 4. `SUBSTRING_PARTIAL` - two-token names, each token loosely matching
//! 5. `VARIANT_SPELLING` - same surname, given name in the same spelling class
//!
//! The resolver never mutates the index and performs no I/O, so batches can
//! run in parallel over one shared index.

mod fuzzy;
mod types;

pub use types::{MatchResult, MatchStrategy, Query};

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::player_names::{NameKey, direct_key, name_tokens, reversed_key};
use crate::registry::RatingIndex;

/// Resolves a single query against the index.
///
/// # Arguments
/// * `query` - Handle plus optional display name and rating hint
/// * `index` - Registry index built by [`crate::registry::parse_registry`]
///
/// # Returns
/// * `MatchResult` - The first strategy that hits, or `MatchStrategy::None`
///
/// # Example
/// ```
/// use fide_bands::player_names::NameKey;
/// use fide_bands::registry::RatingIndex;
/// use fide_bands::resolver::{MatchStrategy, Query, resolve};
///
/// let index: RatingIndex = [(NameKey::new("magnus_carlsen"), 2900)].into_iter().collect();
/// let query = Query::new("dummyhandle").with_display_name("Magnus Carlsen");
///
/// let result = resolve(&query, &index);
/// assert_eq!(result.strategy, MatchStrategy::DirectOrder);
/// assert_eq!(result.rating, Some(2900));
/// ```
pub fn resolve(query: &Query, index: &RatingIndex) -> MatchResult {
    let handle_key = query.handle.trim().to_lowercase();
    if !handle_key.is_empty()
        && let Some(rating) = index.get(&handle_key)
    {
        debug!(handle = %query.handle, rating, "Resolved by exact handle");
        return MatchResult::found(NameKey::new(handle_key), rating, MatchStrategy::ExactHandle);
    }

    let Some(display_name) = query.display_name.as_deref() else {
        debug!(handle = %query.handle, "No display name, unresolved");
        return MatchResult::unresolved();
    };

    let tokens = name_tokens(display_name);
    let result = resolve_by_name(&tokens, query.federation_rating_hint, index);
    debug!(
        handle = %query.handle,
        display_name,
        strategy = %result.strategy,
        rating = ?result.rating,
        "Resolved by display name"
    );
    result
}

fn resolve_by_name(tokens: &[String], hint: Option<u32>, index: &RatingIndex) -> MatchResult {
    let exact_lookups = [
        (direct_key(tokens), MatchStrategy::DirectOrder),
        (reversed_key(tokens), MatchStrategy::ReversedOrder),
    ];
    for (key, strategy) in exact_lookups {
        if let Some(key) = key
            && let Some(rating) = index.get(key.as_str())
        {
            return MatchResult::found(key, rating, strategy);
        }
    }

    if let [first, last] = tokens {
        let candidates = fuzzy::substring_candidates(first, last, index);
        if let Some((key, rating)) = fuzzy::pick_best(candidates, hint) {
            return MatchResult::found(key.clone(), rating, MatchStrategy::SubstringPartial);
        }
    }

    if let [first, .., last] = tokens {
        let candidates = fuzzy::variant_candidates(first, last, index);
        if let Some((key, rating)) = fuzzy::pick_best(candidates, hint) {
            return MatchResult::found(key.clone(), rating, MatchStrategy::VariantSpelling);
        }
    }

    MatchResult::unresolved()
}

/// Resolves many queries in parallel. Results are in query order and
/// identical to resolving each query on its own.
#[instrument(skip_all, fields(queries = queries.len(), index_size = index.len()))]
pub fn resolve_batch(queries: &[Query], index: &RatingIndex) -> Vec<MatchResult> {
    let results: Vec<MatchResult> = queries.par_iter().map(|q| resolve(q, index)).collect();

    let resolved = results.iter().filter(|r| r.is_resolved()).count();
    info!("Resolved {resolved}/{} identities", queries.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, u32)]) -> RatingIndex {
        entries
            .iter()
            .map(|(k, r)| (NameKey::new(*k), *r))
            .collect()
    }

    fn sample_index() -> RatingIndex {
        index(&[
            ("magnus_carlsen", 2900),
            ("hikaru", 2750),
            ("hikaru_nakamura", 2880),
            ("nepomniachtchi_ian", 2770),
            ("aleksandr_grischuk", 2720),
            ("oleksandr_petrenko", 2600),
            ("daniil_dubov", 2760),
        ])
    }

    #[test]
    fn test_exact_handle() {
        let result = resolve(&Query::new("Hikaru"), &sample_index());
        assert_eq!(result.strategy, MatchStrategy::ExactHandle);
        assert_eq!(result.rating, Some(2750));
        assert_eq!(result.matched_name.unwrap().as_str(), "hikaru");
    }

    #[test]
    fn test_exact_handle_beats_direct_order() {
        let query = Query::new("hikaru").with_display_name("Hikaru Nakamura");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::ExactHandle);
        assert_eq!(result.rating, Some(2750));
    }

    #[test]
    fn test_direct_order() {
        let query = Query::new("dummyhandle").with_display_name("GM Magnus Carlsen (NOR)");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::DirectOrder);
        assert_eq!(result.rating, Some(2900));
        assert_eq!(result.matched_name.unwrap().as_str(), "magnus_carlsen");
    }

    #[test]
    fn test_reversed_order() {
        let query = Query::new("lachesisq").with_display_name("Ian Nepomniachtchi");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::ReversedOrder);
        assert_eq!(result.rating, Some(2770));
    }

    #[test]
    fn test_substring_partial() {
        let query = Query::new("x").with_display_name("Daniil Dubovv");
        let result = resolve(&query, &sample_index());
        // "dubov" and "dubovv" are both five or more characters
        assert_eq!(result.strategy, MatchStrategy::SubstringPartial);
        assert_eq!(result.rating, Some(2760));
    }

    #[test]
    fn test_substring_partial_needs_exactly_two_tokens() {
        let query = Query::new("x").with_display_name("Daniil Dmitrievich Dubovv");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::None);
    }

    #[test]
    fn test_different_surname_does_not_partially_match() {
        let query = Query::new("x").with_display_name("Oleksandr Ivanov");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::None);
        assert!(result.rating.is_none());
    }

    #[test]
    fn test_variant_spelling() {
        let query = Query::new("x").with_display_name("Alexander Grischuk");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::VariantSpelling);
        assert_eq!(result.matched_name.unwrap().as_str(), "aleksandr_grischuk");
    }

    #[test]
    fn test_variant_spelling_with_middle_name() {
        let query = Query::new("x").with_display_name("Olexandr Mykolayovych Petrenko");
        let result = resolve(&query, &sample_index());
        assert_eq!(result.strategy, MatchStrategy::VariantSpelling);
        assert_eq!(result.rating, Some(2600));
    }

    #[test]
    fn test_no_display_name_only_tries_handle() {
        let result = resolve(&Query::new("magnus_carlsen_fan"), &sample_index());
        assert_eq!(result, MatchResult::unresolved());
    }

    #[test]
    fn test_single_token_name_is_unresolved() {
        let query = Query::new("x").with_display_name("Magnus");
        assert_eq!(resolve(&query, &sample_index()).strategy, MatchStrategy::None);
    }

    #[test]
    fn test_empty_handle_is_not_looked_up() {
        let idx = index(&[("", 2600)]);
        assert_eq!(resolve(&Query::new("  "), &idx).strategy, MatchStrategy::None);
    }

    #[test]
    fn test_partial_tie_break_uses_hint_then_rating() {
        let idx = index(&[("magnus_carlsenn", 2600), ("magnus_ccarlsen", 2800)]);

        let no_hint = Query::new("x").with_display_name("Magnus Carlsen");
        assert_eq!(resolve(&no_hint, &idx).rating, Some(2800));

        let hinted = no_hint.clone().with_rating_hint(2610);
        assert_eq!(resolve(&hinted, &idx).rating, Some(2600));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let idx = sample_index();
        let queries = vec![
            Query::new("hikaru"),
            Query::new("a").with_display_name("Magnus Carlsen"),
            Query::new("b").with_display_name("Ian Nepomniachtchi"),
            Query::new("c").with_display_name("Daniil Dubovv"),
            Query::new("d").with_display_name("Alexander Grischuk"),
            Query::new("e").with_display_name("Nobody Atall"),
            Query::new("f"),
        ];

        let sequential: Vec<_> = queries.iter().map(|q| resolve(q, &idx)).collect();
        let parallel = resolve_batch(&queries, &idx);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let idx = index(&[("magnus_carlsenn", 2700), ("magnus_carlsenx", 2700)]);
        let query = Query::new("x").with_display_name("Magnus Carlsen");
        let first = resolve(&query, &idx);
        for _ in 0..20 {
            assert_eq!(resolve(&query, &idx), first);
        }
        assert_eq!(first.matched_name.unwrap().as_str(), "magnus_carlsenn");
    }
}
