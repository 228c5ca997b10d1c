//! Name normalization for the two naming conventions.
//!
//! This module provides functions for:
//! - Turning registry names (`"Last, First Middle"`) into `first_last` keys
//! - Cleaning free-text display names (`"GM Magnus Carlsen (NOR)"`)
//! - Building direct and reversed keys from cleaned display names
//! - Folding common Latin accents to ASCII

use regex::Regex;
use std::sync::LazyLock;

use super::key::NameKey;
use crate::constants::registry::PLACEHOLDER_NAMES;

/// Parenthetical 2-3 letter country code, e.g. `(nor)`
static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([a-z]{2,3}\)").expect("country code pattern is valid"));

/// Chess titles as whole words. Spelled-out forms come first so
/// "woman grandmaster" is removed in one piece.
static TITLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:woman international master|woman candidate master|woman fide master|",
        r"woman grandmaster|international master|candidate master|fide master|grandmaster|",
        r"wgm|wim|wfm|wcm|gm|im|fm|cm)\b",
    ))
    .expect("title pattern is valid")
});

/// Normalizes a registry display name into a `first_last` key.
///
/// Registry names are `"Last, First Middle"`. The surname is everything
/// before the first comma, the given name is the first word after it.
/// Multi-word surnames keep their words, joined with `_`. Names without a
/// comma fall back to the whole name with spaces turned into underscores.
///
/// Returns an empty string for placeholders and names without any letters.
/// The function is idempotent: a key passed back in comes out unchanged.
///
/// # Examples
/// ```
/// use fide_bands::player_names::normalize_registry_name;
///
/// assert_eq!(normalize_registry_name("Carlsen, Magnus"), "magnus_carlsen");
/// assert_eq!(normalize_registry_name("Nepomniachtchi, Ian Alexandrovich"), "ian_nepomniachtchi");
/// assert_eq!(normalize_registry_name("Van Foreest, Jorden"), "jorden_van_foreest");
/// assert_eq!(normalize_registry_name("magnus_carlsen"), "magnus_carlsen");
/// assert_eq!(normalize_registry_name("-, -"), "");
/// ```
pub fn normalize_registry_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || PLACEHOLDER_NAMES.contains(&trimmed) {
        return String::new();
    }

    let folded = fold_ascii(trimmed);
    if !folded.chars().any(|c| c.is_ascii_alphabetic()) {
        return String::new();
    }

    if let Some((surname, given)) = folded.split_once(',') {
        let surname = join_words(surname);
        let given = given
            .split_whitespace()
            .map(|word| word.replace(',', ""))
            .find(|word| !word.is_empty());

        if let Some(given) = given
            && !surname.is_empty()
        {
            return NameKey::from_parts(&given, &surname).as_str().to_string();
        }
    }

    join_words(&folded)
}

/// Cleans a free-text display name before fuzzy matching.
///
/// Lowercases and folds to ASCII, removes parenthetical country codes and
/// chess titles (whole words only, so "Jimmy" keeps its "im"), drops
/// punctuation-only words and collapses whitespace. The steps repeat until
/// nothing changes, which keeps the function idempotent even when removing
/// one title exposes another.
///
/// # Examples
/// ```
/// use fide_bands::player_names::normalize_free_text;
///
/// assert_eq!(normalize_free_text("GM Magnus Carlsen (NOR)"), "magnus carlsen");
/// assert_eq!(normalize_free_text("Grandmaster  Hikaru   Nakamura"), "hikaru nakamura");
/// assert_eq!(normalize_free_text("Jimmy Fimmel"), "jimmy fimmel");
/// assert_eq!(normalize_free_text("12345"), "");
/// ```
pub fn normalize_free_text(name: &str) -> String {
    let mut current = collapse_words(&fold_ascii(name));

    loop {
        let without_codes = COUNTRY_CODE.replace_all(&current, " ");
        let without_titles = TITLES.replace_all(&without_codes, " ");
        let next = collapse_words(&without_titles);
        if next == current {
            break;
        }
        current = next;
    }

    if current.chars().any(|c| c.is_ascii_alphabetic()) {
        current
    } else {
        String::new()
    }
}

/// Splits a display name into cleaned whitespace tokens.
///
/// # Example
/// ```
/// use fide_bands::player_names::name_tokens;
///
/// assert_eq!(name_tokens("IM Anna Muzychuk (UKR)"), vec!["anna", "muzychuk"]);
/// ```
pub fn name_tokens(display_name: &str) -> Vec<String> {
    normalize_free_text(display_name)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Key in registry order (`first_last`) from display-name tokens.
/// Needs at least two tokens; middle tokens are ignored.
pub fn direct_key<S: AsRef<str>>(tokens: &[S]) -> Option<NameKey> {
    match tokens {
        [first, .., last] => Some(NameKey::from_parts(first.as_ref(), last.as_ref())),
        _ => None,
    }
}

/// Key with the display-name tokens swapped (`last_first`), for display
/// names written surname first.
pub fn reversed_key<S: AsRef<str>>(tokens: &[S]) -> Option<NameKey> {
    match tokens {
        [first, .., last] => Some(NameKey::from_parts(last.as_ref(), first.as_ref())),
        _ => None,
    }
}

/// Lowercases and folds common accented Latin letters to ASCII.
/// Other non-ASCII characters are dropped.
///
/// # Example
/// ```
/// use fide_bands::player_names::fold_ascii;
///
/// assert_eq!(fold_ascii("Ørnulf Å. Müller-Łęcki"), "ornulf a. muller-lecki");
/// ```
pub fn fold_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
            'æ' => out.push_str("ae"),
            'ç' | 'ć' | 'č' => out.push('c'),
            'ď' | 'đ' | 'ð' => out.push('d'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => out.push('e'),
            'ğ' => out.push('g'),
            'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => out.push('i'),
            'ł' | 'ľ' => out.push('l'),
            'ñ' | 'ń' | 'ň' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => out.push('o'),
            'œ' => out.push_str("oe"),
            'ŕ' | 'ř' => out.push('r'),
            'ś' | 'š' | 'ş' | 'ș' => out.push('s'),
            'ß' => out.push_str("ss"),
            'ť' | 'ţ' | 'ț' => out.push('t'),
            'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'ź' | 'ż' | 'ž' => out.push('z'),
            'þ' => out.push_str("th"),
            _ => {}
        }
    }
    out
}

fn join_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.replace(',', ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn collapse_words(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| word.chars().any(|c| c.is_ascii_alphanumeric()))
        .collect::<Vec<_>>()
        .join(" ")
}
