//! Console tables and CSV/JSON export of an analysis
//!
//! Numbers are rounded to one decimal everywhere a person reads them. Files
//! are named `<player>_<kind>_<YYYYmmdd-HHMMSS>.<ext>` so repeated runs never
//! overwrite each other.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::analysis::{Analysis, OpponentRow};
use crate::error::AppError;
use crate::performance::{BandRow, BucketStats, PerformanceSummary};

/// Label of the all-bands row
pub const OVERALL_LABEL: &str = "Overall";

/// Files written by [`export_analysis`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub games: PathBuf,
    pub band_summary: PathBuf,
    pub opponent_breakdown: PathBuf,
    pub rating_mapping: PathBuf,
    pub name_mapping: PathBuf,
}

/// Rounds to one decimal. NaN stays NaN.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One row per observed band in rank order, then the overall row.
pub fn band_rows(summary: &PerformanceSummary) -> Vec<BandRow> {
    summary
        .bands
        .iter()
        .map(|bucket| BandRow::new(bucket.band.label(), &bucket.stats))
        .chain(std::iter::once(BandRow::new(OVERALL_LABEL, &summary.overall)))
        .map(|row| BandRow {
            score: round1(row.score),
            score_pct: round1(row.score_pct),
            avg_opponent_rating: round1(row.avg_opponent_rating),
            performance_rating: round1(row.performance_rating),
            ..row
        })
        .collect()
}

pub fn render_band_table(summary: &PerformanceSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>6} {:>7} {:>8} {:>8} {:>8}",
        "Band", "Games", "Score", "Score%", "AvgOpp", "Perf"
    );
    for row in band_rows(summary) {
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>7.1} {:>8.1} {:>8.1} {:>8.1}",
            row.band,
            row.games,
            row.score,
            row.score_pct,
            row.avg_opponent_rating,
            row.performance_rating
        );
    }
    out
}

/// Per-opponent table, at most `limit` rows.
pub fn render_opponent_table(opponents: &[OpponentRow], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>5} {:>6} {:>7} {:>7}  {:<18} {:<28}",
        "Opponent", "Games", "Score", "Score%", "Rating", "Strategy", "Matched name"
    );
    for row in opponents.iter().take(limit) {
        let rating = row
            .resolved_rating
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        let _ = writeln!(
            out,
            "{:<24} {:>5} {:>6.1} {:>7.1} {:>7}  {:<18} {:<28}",
            row.handle,
            row.games,
            row.score,
            round1(row.score_pct),
            rating,
            row.match_strategy.as_str(),
            row.matched_name.as_deref().unwrap_or("-")
        );
    }
    if opponents.len() > limit {
        let _ = writeln!(out, "... and {} more", opponents.len() - limit);
    }
    out
}

/// `Overall: N games, S/N (P%), avg opp A, performance R`
pub fn render_overall_line(overall: &BucketStats) -> String {
    format!(
        "Overall: {} games, {:.1}/{} ({:.1}%), avg opp {:.1}, performance {:.1}",
        overall.games,
        overall.total_score,
        overall.games,
        round1(overall.score_pct()),
        round1(overall.mean_opponent_rating),
        round1(overall.performance_rating())
    )
}

/// Prints the band table, the overall line and the top opponents.
pub fn print_report(player: &str, analysis: &Analysis, opponent_limit: usize) {
    println!("Performance of {player} by opponent band\n");
    print!("{}", render_band_table(&analysis.summary));
    println!();
    println!("{}", render_overall_line(&analysis.summary.overall));
    if analysis.excluded_games > 0 {
        println!(
            "{} games excluded (opponent unresolved or below the rating floor)",
            analysis.excluded_games
        );
    }
    if !analysis.opponents.is_empty() {
        println!();
        print!("{}", render_opponent_table(&analysis.opponents, opponent_limit));
    }
}

fn file_name(player: &str, kind: &str, stamp: &str, ext: &str) -> String {
    format!("{}_{kind}_{stamp}.{ext}", player.to_lowercase())
}

pub(crate) fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Writes the games, band summary and opponent CSVs plus the two JSON
/// mappings into `dir`, stamped with `now`.
#[instrument(skip(analysis, now))]
pub async fn export_analysis(
    dir: &Path,
    player: &str,
    analysis: &Analysis,
    now: DateTime<Local>,
) -> Result<ExportedFiles, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let stamp = now.format("%Y%m%d-%H%M%S").to_string();

    let files = ExportedFiles {
        games: dir.join(file_name(player, "games", &stamp, "csv")),
        band_summary: dir.join(file_name(player, "band_summary", &stamp, "csv")),
        opponent_breakdown: dir.join(file_name(player, "opponent_breakdown", &stamp, "csv")),
        rating_mapping: dir.join(file_name(player, "fide_mapping", &stamp, "json")),
        name_mapping: dir.join(file_name(player, "username_mapping", &stamp, "json")),
    };

    let opponents: Vec<OpponentRow> = analysis
        .opponents
        .iter()
        .map(|row| OpponentRow {
            score_pct: round1(row.score_pct),
            avg_opponent_rating: round1(row.avg_opponent_rating),
            ..row.clone()
        })
        .collect();

    tokio::fs::write(&files.games, to_csv(&analysis.games)?).await?;
    tokio::fs::write(&files.band_summary, to_csv(&band_rows(&analysis.summary))?).await?;
    tokio::fs::write(&files.opponent_breakdown, to_csv(&opponents)?).await?;

    let ratings: BTreeMap<&str, u32> = analysis
        .resolutions
        .iter()
        .filter_map(|(handle, result)| Some((handle.as_str(), result.rating?)))
        .collect();
    tokio::fs::write(&files.rating_mapping, serde_json::to_string_pretty(&ratings)?).await?;
    tokio::fs::write(
        &files.name_mapping,
        serde_json::to_string_pretty(&analysis.display_names)?,
    )
    .await?;

    info!("Exported analysis of {} to {}", player, dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisOptions, analyze};
    use crate::bands::Band;
    use crate::data_fetcher::cache::CachedProfile;
    use crate::data_fetcher::models::{Color, GameRecord};
    use crate::performance::{GameOutcome, aggregate};
    use crate::player_names::NameKey;
    use crate::registry::RatingIndex;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn summary() -> PerformanceSummary {
        aggregate([
            (Band::B600, GameOutcome::new(1.0, 2650).unwrap()),
            (Band::B800Plus, GameOutcome::new(0.5, 2850).unwrap()),
            (Band::B600, GameOutcome::new(0.0, 2620).unwrap()),
        ])
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(2600.04), 2600.0);
        assert!(round1(f64::NAN).is_nan());
    }

    #[test]
    fn test_band_rows_end_with_overall() {
        let rows = band_rows(&summary());
        let labels: Vec<&str> = rows.iter().map(|r| r.band.as_str()).collect();
        assert_eq!(labels, vec!["600", "800+", OVERALL_LABEL]);

        let overall = rows.last().unwrap();
        assert_eq!(overall.games, 3);
        assert_eq!(overall.score, 1.5);
        assert_eq!(overall.score_pct, 50.0);
        assert_eq!(overall.avg_opponent_rating, 2706.7);
    }

    #[test]
    fn test_render_band_table() {
        let table = render_band_table(&summary());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Band"));
        assert!(lines[1].starts_with("600"));
        assert!(lines[1].contains("2635.0"));
        assert!(lines[3].starts_with(OVERALL_LABEL));
    }

    #[test]
    fn test_render_overall_line() {
        let line = render_overall_line(&summary().overall);
        assert_eq!(
            line,
            "Overall: 3 games, 1.5/3 (50.0%), avg opp 2706.7, performance 2706.7"
        );
    }

    fn analysis() -> Analysis {
        let index: RatingIndex = [(NameKey::new("magnus_carlsen"), 2900)].into_iter().collect();
        let profiles = HashMap::from([(
            "dummyhandle".to_string(),
            CachedProfile {
                display_name: Some("Magnus Carlsen".to_string()),
                title: None,
                country: None,
                fetched_at: Utc::now(),
            },
        )]);
        let games = vec![
            GameRecord {
                end_time: Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap(),
                opponent_handle: "dummyhandle".to_string(),
                score: 0.5,
                opponent_game_rating: Some(3100),
                player_game_rating: Some(3000),
                opponent_color: Color::White,
                tournament_label: None,
                url: Some("https://www.chess.com/game/live/1".to_string()),
            },
            GameRecord {
                end_time: Utc.with_ymd_and_hms(2024, 1, 3, 20, 0, 0).unwrap(),
                opponent_handle: "nobody".to_string(),
                score: 1.0,
                opponent_game_rating: Some(2000),
                player_game_rating: Some(3000),
                opponent_color: Color::Black,
                tournament_label: None,
                url: None,
            },
        ];
        analyze(&games, &profiles, &index, &AnalysisOptions::default())
    }

    #[test]
    fn test_render_opponent_table_limit() {
        let analysis = analysis();
        let table = render_opponent_table(&analysis.opponents, 10);
        assert!(table.contains("dummyhandle"));
        assert!(table.contains("DIRECT_ORDER"));
        assert!(table.contains("magnus_carlsen"));

        let truncated = render_opponent_table(&analysis.opponents, 0);
        assert!(truncated.contains("... and 1 more"));
    }

    #[tokio::test]
    async fn test_export_analysis_writes_all_files() {
        let dir = tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 2, 1, 12, 30, 5).unwrap();
        let files = export_analysis(dir.path(), "Hikaru", &analysis(), now)
            .await
            .unwrap();

        assert_eq!(
            files.band_summary.file_name().unwrap(),
            "hikaru_band_summary_20240201-123005.csv"
        );

        let bands = tokio::fs::read_to_string(&files.band_summary).await.unwrap();
        let mut lines = bands.lines();
        assert_eq!(
            lines.next(),
            Some("band,games,score,score_pct,avg_opponent_rating,performance_rating")
        );
        assert_eq!(lines.next(), Some("800+,1,0.5,50.0,2900.0,2900.0"));

        let opponents = tokio::fs::read_to_string(&files.opponent_breakdown).await.unwrap();
        assert!(opponents.starts_with("handle,display_name,games,score,score_pct"));
        assert!(opponents.contains(
            "dummyhandle,Magnus Carlsen,1,0.5,50.0,2900.0,2900,magnus_carlsen,DIRECT_ORDER"
        ));

        let games = tokio::fs::read_to_string(&files.games).await.unwrap();
        assert_eq!(games.lines().count(), 2);

        let ratings: BTreeMap<String, u32> =
            serde_json::from_str(&tokio::fs::read_to_string(&files.rating_mapping).await.unwrap())
                .unwrap();
        assert_eq!(ratings, BTreeMap::from([("dummyhandle".to_string(), 2900)]));

        let names: BTreeMap<String, String> =
            serde_json::from_str(&tokio::fs::read_to_string(&files.name_mapping).await.unwrap())
                .unwrap();
        assert_eq!(names["dummyhandle"], "Magnus Carlsen");
    }
}
