//! The name → rating lookup table and its JSON file form.

use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::player_names::NameKey;

/// Read-only after construction; shared by reference between resolver calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingIndex {
    ratings: HashMap<NameKey, u32>,
}

impl RatingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rating, returning the rating it replaced
    pub fn insert(&mut self, key: NameKey, rating: u32) -> Option<u32> {
        self.ratings.insert(key, rating)
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.ratings.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&NameKey, u32)> {
        self.ratings.iter().map(|(key, rating)| (key, *rating))
    }

    /// Entries by descending rating, ties by ascending key
    pub fn sorted_by_rating(&self) -> Vec<(&NameKey, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(ka, ra), (kb, rb)| rb.cmp(ra).then_with(|| ka.cmp(kb)));
        entries
    }

    /// Writes the index as a JSON object ordered by descending rating.
    ///
    /// # Arguments
    /// * `path` - Destination file; parent directories are created
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), entries = self.len()))]
    pub async fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        info!("Saved rating index to {}", path.display());
        Ok(())
    }

    /// Loads an index written by [`RatingIndex::save_to_path`].
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let ratings: HashMap<NameKey, u32> = serde_json::from_str(&content)?;
        debug!("Loaded {} index entries", ratings.len());
        Ok(Self { ratings })
    }
}

impl Serialize for RatingIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sorted_by_rating())
    }
}

impl FromIterator<(NameKey, u32)> for RatingIndex {
    fn from_iter<I: IntoIterator<Item = (NameKey, u32)>>(iter: I) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}
