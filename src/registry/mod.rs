//! Federation rating registry: fixed-width text parsing and the name → rating index.
//!
//! - `parser`: Turns the raw registry download into accepted entries and a `RatingIndex`
//! - `index`: The read-only lookup table the resolver works against, plus JSON persistence
//! - `download`: Fetches the zipped list when no local copy exists

mod download;
mod index;
mod parser;

pub use download::{DownloadOutcome, download_registry, extract_list};
pub use index::RatingIndex;
pub use parser::{ParseStats, RecordSkip, RegistryEntry, RegistryParse, parse_registry};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::error::AppError;

/// Terminal registry failures. Per-line problems are never errors; they are
/// counted in [`ParseStats`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no header line containing both \"ID Number\" and \"Name\"")]
    HeaderNotFound,

    #[error("header has no \"{label}\" column")]
    MissingColumn { label: String },
}

/// Which rating column of the registry to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    Standard,
    Rapid,
    #[default]
    Blitz,
}

impl RatingKind {
    /// Column label in the registry header
    pub fn column_label(self) -> &'static str {
        match self {
            RatingKind::Standard => "SRtng",
            RatingKind::Rapid => "RRtng",
            RatingKind::Blitz => "BRtng",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RatingKind::Standard => "standard",
            RatingKind::Rapid => "rapid",
            RatingKind::Blitz => "blitz",
        }
    }

    /// Conventional file name of an index built from this column.
    ///
    /// # Example
    /// ```
    /// use fide_bands::registry::RatingKind;
    ///
    /// assert_eq!(RatingKind::Blitz.index_file_name(2500), "fide_blitz_ratings_2500+.json");
    /// ```
    pub fn index_file_name(self, min_rating: u32) -> String {
        format!("fide_{}_ratings_{min_rating}+.json", self.as_str())
    }
}

impl fmt::Display for RatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a registry file from disk and parses it.
///
/// See [`decode_registry_bytes`] for how non-UTF-8 downloads are read.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn parse_registry_file(
    path: impl AsRef<Path>,
    min_rating: u32,
    kind: RatingKind,
) -> Result<RegistryParse, AppError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    info!("Read {} bytes of registry text", bytes.len());
    let text = decode_registry_bytes(bytes);

    Ok(parse_registry(&text, min_rating, kind)?)
}

/// Decodes registry bytes: UTF-8 when the whole file is valid UTF-8,
/// otherwise Latin-1.
///
/// Columns are counted in characters. Latin-1 maps every byte to one
/// character, so single-byte rows keep their alignment and accented names
/// survive. A lossy UTF-8 decode would not: a stray invalid byte can swallow
/// the bytes after it into one replacement character.
///
/// # Example
/// ```
/// use fide_bands::registry::decode_registry_bytes;
///
/// assert_eq!(decode_registry_bytes(b"M\xfcller".to_vec()), "Müller");
/// assert_eq!(decode_registry_bytes("Müller".as_bytes().to_vec()), "Müller");
/// ```
pub fn decode_registry_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("Registry is not UTF-8, reading it as Latin-1");
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    }
}
