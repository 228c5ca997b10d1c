//! Player name normalization and matching utilities.
//!
//! This module turns the two naming conventions into comparable keys:
//! - Registry names (`"Carlsen, Magnus"`) become `first_last` keys
//! - Free-text profile names are cleaned of titles and country codes
//! - Given-name transliteration variants are grouped into classes
//!
//! The module is organized into three components:
//! - `key`: The `NameKey` type the rating index is keyed by
//! - `normalize`: Registry and free-text normalization
//! - `variants`: Given-name spelling classes

// Submodules
mod key;
mod normalize;
mod variants;

pub use key::NameKey;

pub use normalize::{
    direct_key, fold_ascii, name_tokens, normalize_free_text, normalize_registry_name,
    reversed_key,
};

pub use variants::{same_given_name, variant_class};
