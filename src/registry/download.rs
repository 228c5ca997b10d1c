//! Fetching the zipped registry list

use reqwest::Client;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{info, instrument};
use zip::ZipArchive;

use crate::constants::registry::LIST_FILE_NAME;
use crate::data_fetcher::api::fetch_utils::fetch_bytes;
use crate::error::AppError;

/// Outcome of [`download_registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// `dest` was already there and was left untouched
    AlreadyPresent,
    /// The list was downloaded and written, this many bytes
    Downloaded(usize),
}

/// Downloads the zipped player list from `url` and writes the list file to
/// `dest`. Nothing is fetched when `dest` already exists.
#[instrument(skip(client, dest), fields(dest = %dest.display()))]
pub async fn download_registry(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<DownloadOutcome, AppError> {
    if tokio::fs::try_exists(dest).await? {
        info!("Registry list already present at {}", dest.display());
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let archive = fetch_bytes(client, url).await?;
    let list = tokio::task::spawn_blocking(move || extract_list(&archive))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, &list).await?;
    info!("Wrote {} bytes of registry list to {}", list.len(), dest.display());
    Ok(DownloadOutcome::Downloaded(list.len()))
}

/// Pulls the player list out of a zip archive: the entry named
/// `players_list_foa.txt`, or failing that the first `.txt` file.
pub fn extract_list(archive: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    let mut chosen = None;
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().rsplit('/').next().unwrap_or_default().to_string();
        if name.eq_ignore_ascii_case(LIST_FILE_NAME) {
            chosen = Some(i);
            break;
        }
        if chosen.is_none() && name.to_ascii_lowercase().ends_with(".txt") {
            chosen = Some(i);
        }
    }

    let index = chosen.ok_or(zip::result::ZipError::FileNotFound)?;
    let mut entry = zip.by_index(index)?;
    let mut list = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or_default());
    entry.read_to_end(&mut list)?;
    Ok(list)
}
