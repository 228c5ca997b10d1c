//! The two fuzzy steps of the cascade and their tie-break.

use std::cmp::{Ordering, Reverse};

use crate::player_names::{NameKey, same_given_name};
use crate::registry::RatingIndex;

/// Tokens shorter than this only match exactly
const MIN_SUBSTRING_LEN: usize = 5;

/// Registry keys whose first and last parts loosely match a two-token name.
///
/// Each query token must equal the registry token, or, when both are at
/// least five characters long, one must contain the other.
pub(super) fn substring_candidates<'a>(
    first: &str,
    last: &str,
    index: &'a RatingIndex,
) -> Vec<(&'a NameKey, u32)> {
    index
        .iter()
        .filter(|(key, _)| {
            key.first_and_last().is_some_and(|(reg_first, reg_last)| {
                token_matches(first, reg_first) && token_matches(last, reg_last)
            })
        })
        .collect()
}

/// Registry keys with the same surname whose given name is `first` or
/// another spelling of it (for example `aleksandr_ivanov` for "Oleksandr
/// Ivanov"). Middle parts are ignored on both sides, so `jorden_van_foreest`
/// is found for "Jorden van Foreest".
pub(super) fn variant_candidates<'a>(
    first: &str,
    last: &str,
    index: &'a RatingIndex,
) -> Vec<(&'a NameKey, u32)> {
    index
        .iter()
        .filter(|(key, _)| {
            key.first_and_last().is_some_and(|(reg_first, reg_last)| {
                reg_last == last && same_given_name(first, reg_first)
            })
        })
        .collect()
}

/// Picks one candidate deterministically: closest to the rating hint when
/// there is one, then highest rating, then smallest key.
pub(super) fn pick_best<K: AsRef<str>>(
    candidates: Vec<(K, u32)>,
    hint: Option<u32>,
) -> Option<(K, u32)> {
    candidates.into_iter().min_by(|(ka, ra), (kb, rb)| {
        compare_candidates((ka.as_ref(), *ra), (kb.as_ref(), *rb), hint)
    })
}

fn compare_candidates(a: (&str, u32), b: (&str, u32), hint: Option<u32>) -> Ordering {
    let distance = |rating: u32| hint.map(|h| rating.abs_diff(h));
    distance(a.1)
        .cmp(&distance(b.1))
        .then_with(|| Reverse(a.1).cmp(&Reverse(b.1)))
        .then_with(|| a.0.cmp(b.0))
}

fn token_matches(query: &str, registry: &str) -> bool {
    query == registry
        || (query.len() >= MIN_SUBSTRING_LEN
            && registry.len() >= MIN_SUBSTRING_LEN
            && (registry.contains(query) || query.contains(registry)))
}
