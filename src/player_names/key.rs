//! The `first_last` join key shared by the registry index and name queries.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Normalized `"<first>_<last>"` name, lowercase ASCII.
///
/// Not unique across people: two registry rows with the same given name and
/// surname produce the same key. The key is only used to index ratings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    /// Separator between the given-name and surname parts
    pub const SEPARATOR: char = '_';

    /// Wraps an already-normalized key. Callers that start from raw text
    /// should go through [`super::normalize_registry_name`] instead.
    pub fn new(normalized: impl Into<String>) -> Self {
        Self(normalized.into())
    }

    /// Builds a key from two already-normalized tokens.
    ///
    /// # Example
    /// ```
    /// use fide_bands::player_names::NameKey;
    ///
    /// let key = NameKey::from_parts("magnus", "carlsen");
    /// assert_eq!(key.as_str(), "magnus_carlsen");
    /// ```
    pub fn from_parts(first: &str, last: &str) -> Self {
        Self(format!("{first}{}{last}", Self::SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First and last separator-delimited parts, or `None` when the key has
    /// fewer than two parts. Middle parts (multi-word surnames) are skipped,
    /// so `"jorden_van_foreest"` yields `("jorden", "foreest")`.
    pub fn first_and_last(&self) -> Option<(&str, &str)> {
        let mut parts = self.0.split(Self::SEPARATOR);
        let first = parts.next()?;
        let last = parts.next_back()?;
        Some((first, last))
    }
}

impl Borrow<str> for NameKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NameKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_first_and_last() {
        let key = NameKey::new("magnus_carlsen");
        assert_eq!(key.first_and_last(), Some(("magnus", "carlsen")));

        let key = NameKey::new("jorden_van_foreest");
        assert_eq!(key.first_and_last(), Some(("jorden", "foreest")));
    }

    #[test]
    fn test_first_and_last_single_part() {
        assert_eq!(NameKey::new("hikaru").first_and_last(), None);
        assert_eq!(NameKey::new("").first_and_last(), None);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(NameKey::new("magnus_carlsen"), 2900u32);
        assert_eq!(map.get("magnus_carlsen"), Some(&2900));
        assert_eq!(map.get("carlsen_magnus"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&NameKey::new("magnus_carlsen")).unwrap();
        assert_eq!(json, "\"magnus_carlsen\"");
    }
}
