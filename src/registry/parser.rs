//! Fixed-width registry parsing.

use tracing::{debug, info, instrument, warn};

use super::index::RatingIndex;
use super::{RatingKind, RegistryError};
use crate::constants::registry::{
    FED_LABEL, HEADER_ID_LABEL, HEADER_NAME_LABEL, ID_WIDTH, PLACEHOLDER_NAMES, RATING_WIDTH,
};
use crate::player_names::{NameKey, normalize_registry_name};

/// One accepted registry row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub id: u64,
    /// As written in the registry, `"Last, First [Middle]"`
    pub display_name: String,
    pub rating: u32,
    pub key: NameKey,
}

/// Why a record line was not indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSkip {
    /// No numeric id, or the line is too short to reach the name column
    MalformedRecord,
    /// Rating column blank or not numeric
    Unrated,
    BelowThreshold,
    PlaceholderName,
    /// Name normalized to an empty key
    EmptyKey,
}

/// Per-run counters. Always populated, even when every line was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_scanned: usize,
    pub accepted: usize,
    pub malformed_records: usize,
    pub unrated: usize,
    pub below_threshold: usize,
    pub placeholder_names: usize,
    pub empty_keys: usize,
    /// Accepted rows whose key replaced an earlier row's key
    pub collisions: usize,
}

impl ParseStats {
    fn record_skip(&mut self, reason: RecordSkip) {
        match reason {
            RecordSkip::MalformedRecord => self.malformed_records += 1,
            RecordSkip::Unrated => self.unrated += 1,
            RecordSkip::BelowThreshold => self.below_threshold += 1,
            RecordSkip::PlaceholderName => self.placeholder_names += 1,
            RecordSkip::EmptyKey => self.empty_keys += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.malformed_records
            + self.unrated
            + self.below_threshold
            + self.placeholder_names
            + self.empty_keys
    }
}

#[derive(Debug, Clone)]
pub struct RegistryParse {
    pub index: RatingIndex,
    /// Accepted rows in file order, including rows later shadowed by a collision
    pub entries: Vec<RegistryEntry>,
    pub stats: ParseStats,
}

impl RegistryParse {
    /// The `n` highest-rated accepted rows, ties in file order
    pub fn top_entries(&self, n: usize) -> Vec<&RegistryEntry> {
        let mut ranked: Vec<&RegistryEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
        ranked.truncate(n);
        ranked
    }

    /// Lowest, highest and mean rating of the accepted rows
    pub fn rating_range(&self) -> Option<(u32, u32, f64)> {
        let min = self.entries.iter().map(|e| e.rating).min()?;
        let max = self.entries.iter().map(|e| e.rating).max()?;
        let total: u64 = self.entries.iter().map(|e| u64::from(e.rating)).sum();
        Some((min, max, total as f64 / self.entries.len() as f64))
    }
}

/// Column positions (in characters) taken from the header line
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    fed: usize,
    rating: usize,
}

impl Columns {
    fn from_header(header: &str, kind: RatingKind) -> Result<Self, RegistryError> {
        let find = |label: &str| {
            header
                .find(label)
                .map(|byte| header[..byte].chars().count())
                .ok_or_else(|| RegistryError::MissingColumn {
                    label: label.to_string(),
                })
        };

        Ok(Self {
            name: find(HEADER_NAME_LABEL)?,
            fed: find(FED_LABEL)?,
            rating: find(kind.column_label())?,
        })
    }
}

/// Parses registry text into a name → rating index.
///
/// The header is the first line containing both "ID Number" and "Name";
/// the name, federation and rating column offsets are read from it and
/// every later line is sliced at those offsets. A line is indexed when its
/// first ten characters are a numeric id, its rating field is numeric and
/// at least `min_rating`, and its name normalizes to a non-empty key.
///
/// Lines that fail are counted in [`ParseStats`] and never abort the parse.
/// When two rows normalize to the same key, the later row wins.
///
/// # Errors
/// - [`RegistryError::HeaderNotFound`] when no header line exists
/// - [`RegistryError::MissingColumn`] when the header lacks "Fed" or the rating column
///
/// # Example
/// ```
/// use fide_bands::registry::{RatingKind, parse_registry};
///
/// let header = format!("{:<15}{:<34}{:<4}{}", "ID Number", "Name", "Fed", "BRtng");
/// let row = format!("{:<15}{:<34}{:<4}{}", "1503014", "Carlsen, Magnus", "NOR", "2900");
/// let text = format!("{header}\n{row}\n");
///
/// let parsed = parse_registry(&text, 2500, RatingKind::Blitz).unwrap();
/// assert_eq!(parsed.index.get("magnus_carlsen"), Some(2900));
/// ```
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_registry(
    text: &str,
    min_rating: u32,
    kind: RatingKind,
) -> Result<RegistryParse, RegistryError> {
    let mut lines = text.lines();

    let header = lines
        .by_ref()
        .find(|line| line.contains(HEADER_ID_LABEL) && line.contains(HEADER_NAME_LABEL))
        .ok_or_else(|| {
            warn!("Registry text has no header line");
            RegistryError::HeaderNotFound
        })?;

    let columns = Columns::from_header(header, kind)?;
    debug!(?columns, "Registry header columns");

    let mut index = RatingIndex::new();
    let mut entries = Vec::new();
    let mut stats = ParseStats::default();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        stats.lines_scanned += 1;

        match parse_record(line, columns, min_rating) {
            Ok(entry) => {
                if let Some(previous) = index.insert(entry.key.clone(), entry.rating) {
                    debug!(
                        key = %entry.key,
                        previous,
                        replacement = entry.rating,
                        "Registry key collision, keeping later row"
                    );
                    stats.collisions += 1;
                }
                stats.accepted += 1;
                entries.push(entry);
            }
            Err(reason) => stats.record_skip(reason),
        }
    }

    info!(
        accepted = stats.accepted,
        indexed = index.len(),
        skipped = stats.skipped(),
        malformed = stats.malformed_records,
        collisions = stats.collisions,
        "Parsed {} registry",
        kind
    );

    Ok(RegistryParse {
        index,
        entries,
        stats,
    })
}

fn parse_record(
    line: &str,
    columns: Columns,
    min_rating: u32,
) -> Result<RegistryEntry, RecordSkip> {
    let id_field = char_span(line, 0, ID_WIDTH).trim();
    if !is_all_digits(id_field) {
        return Err(RecordSkip::MalformedRecord);
    }
    let id = id_field
        .parse::<u64>()
        .map_err(|_| RecordSkip::MalformedRecord)?;

    let line_chars = char_len(line);
    if columns.name >= line_chars || columns.fed >= line_chars {
        return Err(RecordSkip::MalformedRecord);
    }
    let display_name = char_span(line, columns.name, columns.fed).trim();

    let rating_field = char_span(line, columns.rating, columns.rating + RATING_WIDTH).trim();
    if !is_all_digits(rating_field) {
        return Err(RecordSkip::Unrated);
    }
    let rating = rating_field
        .parse::<u32>()
        .map_err(|_| RecordSkip::Unrated)?;
    if rating < min_rating {
        return Err(RecordSkip::BelowThreshold);
    }

    if PLACEHOLDER_NAMES.contains(&display_name) {
        return Err(RecordSkip::PlaceholderName);
    }

    let key = normalize_registry_name(display_name);
    if key.is_empty() {
        return Err(RecordSkip::EmptyKey);
    }

    Ok(RegistryEntry {
        id,
        display_name: display_name.to_string(),
        rating,
        key: NameKey::new(key),
    })
}

fn is_all_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn char_len(line: &str) -> usize {
    if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    }
}

/// Byte offset of the `pos`-th character, or `None` past the end
fn char_to_byte(line: &str, pos: usize) -> Option<usize> {
    if line.is_ascii() {
        return (pos <= line.len()).then_some(pos);
    }
    line.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(line.len()))
        .nth(pos)
}

/// Characters `[start, end)` of `line`, clamped to the end of the line
fn char_span(line: &str, start: usize, end: usize) -> &str {
    let from = char_to_byte(line, start).unwrap_or(line.len());
    let to = char_to_byte(line, end).unwrap_or(line.len()).max(from);
    &line[from..to]
}
