use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player_names::NameKey;

/// Who we are trying to find in the registry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Online handle, any case
    pub handle: String,
    /// Free-text profile name in "First Last" order
    pub display_name: Option<String>,
    /// Expected rating, used only to choose between equally good fuzzy candidates
    pub federation_rating_hint: Option<u32>,
}

impl Query {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_rating_hint(mut self, hint: u32) -> Self {
        self.federation_rating_hint = Some(hint);
        self
    }
}

/// Which step of the cascade produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStrategy {
    ExactHandle,
    DirectOrder,
    ReversedOrder,
    SubstringPartial,
    VariantSpelling,
    None,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::ExactHandle => "EXACT_HANDLE",
            MatchStrategy::DirectOrder => "DIRECT_ORDER",
            MatchStrategy::ReversedOrder => "REVERSED_ORDER",
            MatchStrategy::SubstringPartial => "SUBSTRING_PARTIAL",
            MatchStrategy::VariantSpelling => "VARIANT_SPELLING",
            MatchStrategy::None => "NONE",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one resolution. `rating` and `matched_name` are both present
/// or both absent; they are absent exactly when `strategy` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub rating: Option<u32>,
    pub matched_name: Option<NameKey>,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    pub fn found(key: NameKey, rating: u32, strategy: MatchStrategy) -> Self {
        Self {
            rating: Some(rating),
            matched_name: Some(key),
            strategy,
        }
    }

    /// The normal "not in the registry" outcome
    pub fn unresolved() -> Self {
        Self {
            rating: None,
            matched_name: None,
            strategy: MatchStrategy::None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.strategy != MatchStrategy::None
    }
}
