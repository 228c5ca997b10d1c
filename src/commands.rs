use crate::analysis::{AnalysisOptions, analyze_with_averages};
use crate::bands::RatingSource;
use crate::cli::{AnalyzeArgs, BuildIndexArgs, ConfigArgs, RecomputeArgs, ResolveArgs};
use crate::config::Config;
use crate::constants::registry::LIST_FILE_NAME;
use crate::data_fetcher::api::{
    GameFilter, create_http_client, fetch_player_games, fetch_player_profile, fetch_profiles,
    fetch_two_year_averages, filter_titled_tuesday, parse_date, validate_date_range,
};
use crate::data_fetcher::cache::{PROFILE_CACHE_FILE, ProfileCache};
use crate::error::AppError;
use crate::recompute::{read_breakdown, recompute};
use crate::registry::{
    DownloadOutcome, RatingIndex, RatingKind, download_registry, parse_registry_file,
};
use crate::report::{
    band_rows, export_analysis, print_report, render_band_table, render_overall_line, to_csv,
};
use crate::resolver::{Query, resolve};
use chrono::Local;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Entries listed after a successful build
const TOP_ENTRIES_SHOWN: usize = 10;

/// Handles `build-index`.
///
/// Downloads the registry first when asked, parses it, prints the skip
/// counts and the strongest entries, and writes the index as JSON sorted by
/// descending rating.
pub async fn handle_build_index_command(
    args: &BuildIndexArgs,
    config: &Config,
) -> Result<(), AppError> {
    let registry = args
        .registry
        .clone()
        .unwrap_or_else(|| config.data_dir_path().join(LIST_FILE_NAME));

    if args.download {
        let client = create_http_client(config)?;
        match download_registry(&client, &args.registry_url, &registry).await? {
            DownloadOutcome::AlreadyPresent => {
                println!("Using existing registry at {}", registry.display());
            }
            DownloadOutcome::Downloaded(bytes) => {
                println!("Downloaded {bytes} bytes to {}", registry.display());
            }
        }
    }

    if !tokio::fs::try_exists(&registry).await? {
        return Err(AppError::config_error(format!(
            "Registry file not found: {}. Pass --download to fetch it.",
            registry.display()
        )));
    }

    let parse = parse_registry_file(&registry, args.min_rating, args.rating_kind).await?;
    let stats = &parse.stats;

    println!(
        "Scanned {} lines: {} accepted, {} skipped, {} key collisions",
        stats.lines_scanned,
        stats.accepted,
        stats.skipped(),
        stats.collisions
    );
    println!(
        "Skipped: {} malformed, {} unrated, {} below {}, {} placeholder names, {} empty keys",
        stats.malformed_records,
        stats.unrated,
        stats.below_threshold,
        args.min_rating,
        stats.placeholder_names,
        stats.empty_keys
    );

    let output = args.output.clone().unwrap_or_else(|| {
        config
            .data_dir_path()
            .join(args.rating_kind.index_file_name(args.min_rating))
    });
    parse.index.save_to_path(&output).await?;

    if let Some((min, max, mean)) = parse.rating_range() {
        println!("Ratings from {min} to {max}, average {mean:.1}");
        println!("Top {TOP_ENTRIES_SHOWN}:");
        for (rank, entry) in parse.top_entries(TOP_ENTRIES_SHOWN).iter().enumerate() {
            println!(
                "{:>3}. {:<40} {:>4}  (id {})",
                rank + 1,
                entry.display_name,
                entry.rating,
                entry.id
            );
        }
    }

    println!(
        "Wrote {} {} ratings to {}",
        parse.index.len(),
        args.rating_kind,
        output.display()
    );
    Ok(())
}

fn default_index_path(config: &Config, min_rating: u32) -> PathBuf {
    config
        .data_dir_path()
        .join(RatingKind::Blitz.index_file_name(min_rating))
}

async fn load_index_for(
    path: &Path,
    source: RatingSource,
) -> Result<RatingIndex, AppError> {
    if tokio::fs::try_exists(path).await? {
        return RatingIndex::load_from_path(path).await;
    }
    match source {
        RatingSource::Federation => Err(AppError::config_error(format!(
            "Rating index not found: {}. Run `fide_bands build-index` first or pass --index.",
            path.display()
        ))),
        RatingSource::Game | RatingSource::TwoYearAvg => {
            warn!(
                "No rating index at {}, opponents will not be resolved",
                path.display()
            );
            Ok(RatingIndex::new())
        }
    }
}

/// Handles `analyze`.
///
/// Validates the date range, confirms the player exists, fetches games and
/// opponent profiles, resolves opponents and prints the band report. Reports
/// are exported unless `--no-export` is given.
pub async fn handle_analyze_command(args: &AnalyzeArgs, config: &Config) -> Result<(), AppError> {
    let since = parse_date(&args.since)?;
    let until = parse_date(&args.until)?;
    validate_date_range(since, until)?;

    let index_path = args
        .index
        .clone()
        .unwrap_or_else(|| default_index_path(config, args.min_opp));
    let index = load_index_for(&index_path, args.rating_source).await?;
    info!("Using {} indexed ratings", index.len());

    let client = create_http_client(config)?;
    let player = args.player.trim().to_lowercase();

    // Fails fast with PlayerNotFound before any archive is fetched
    fetch_player_profile(&client, config, &player).await?;

    let filter = GameFilter::new(since, until)
        .include_unrated(args.include_unrated)
        .time_classes(&args.time_classes);
    let mut games = fetch_player_games(&client, config, &player, &filter).await?;
    if args.titled_tuesday {
        games = filter_titled_tuesday(games);
    }

    if games.is_empty() {
        println!("No matching games for {player} between {since} and {until}.");
        return Ok(());
    }

    let cache_path = config.data_dir_path().join(PROFILE_CACHE_FILE);
    let mut cache = ProfileCache::load_from_path(&cache_path).await?;
    let handles: Vec<String> = games.iter().map(|g| g.opponent_handle.clone()).collect();
    let profiles = fetch_profiles(&client, config, &mut cache, &handles).await;
    if let Err(e) = cache.save_to_path(&cache_path).await {
        warn!("Failed to save profile cache: {e}");
    }

    let options = AnalysisOptions {
        rating_source: args.rating_source,
        min_opp: args.min_opp,
    };
    let averages = if args.rating_source == RatingSource::TwoYearAvg {
        fetch_two_year_averages(&client, config, &handles, since, until).await
    } else {
        HashMap::new()
    };
    let analysis = analyze_with_averages(&games, &profiles, &index, &averages, &options);
    print_report(&player, &analysis, args.top);

    if !args.no_export {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.data_dir_path().join("reports"));
        let files = export_analysis(&dir, &player, &analysis, Local::now()).await?;
        println!();
        println!("Band summary:       {}", files.band_summary.display());
        println!("Opponent breakdown: {}", files.opponent_breakdown.display());
        println!("Games:              {}", files.games.display());
        println!("Rating mapping:     {}", files.rating_mapping.display());
        println!("Name mapping:       {}", files.name_mapping.display());
    }

    Ok(())
}

/// Handles `resolve`: one offline resolution against an index file.
pub async fn handle_resolve_command(args: &ResolveArgs) -> Result<(), AppError> {
    let index = RatingIndex::load_from_path(&args.index).await?;

    let mut query = Query::new(args.handle.clone());
    if let Some(name) = &args.name {
        query = query.with_display_name(name.clone());
    }
    if let Some(hint) = args.rating_hint {
        query = query.with_rating_hint(hint);
    }

    let result = resolve(&query, &index);
    println!("Handle:   {}", query.handle);
    println!(
        "Name:     {}",
        query.display_name.as_deref().unwrap_or("-")
    );
    println!("Strategy: {}", result.strategy);
    match (&result.matched_name, result.rating) {
        (Some(key), Some(rating)) => {
            println!("Matched:  {key}");
            println!("Rating:   {rating}");
        }
        _ => println!("No registry entry found"),
    }
    Ok(())
}

/// Handles `recompute`: re-bands an opponent breakdown CSV and prints the
/// band table, optionally writing it as CSV too.
pub async fn handle_recompute_command(args: &RecomputeArgs) -> Result<(), AppError> {
    let records = read_breakdown(&args.input).await?;
    let total_games: usize = records.iter().map(|r| r.games).sum();
    let total_score: f64 = records.iter().map(|r| r.score).sum();
    println!(
        "Read {} opponents, {} games, score {:.1}",
        records.len(),
        total_games,
        total_score
    );

    let result = recompute(&records, args.min_opp);
    for (band, opponents) in &result.band_opponents {
        println!("  {band}: {opponents} opponents");
    }
    if result.excluded_opponents > 0 {
        println!(
            "  {} opponents excluded (unresolved or below {})",
            result.excluded_opponents, args.min_opp
        );
    }

    println!();
    print!("{}", render_band_table(&result.summary));
    println!();
    println!("{}", render_overall_line(&result.summary.overall));

    if !result.top_band.is_empty() {
        println!();
        println!("Opponents in the top band:");
        for record in &result.top_band {
            println!(
                "  {} ({}): {} federation, {} games, {:.1} score",
                record.display_name.as_deref().unwrap_or("-"),
                record.handle,
                record.resolved_rating.unwrap_or_default(),
                record.games,
                record.score
            );
        }
    }

    if let Some(output) = &args.output {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, to_csv(&band_rows(&result.summary))?).await?;
        println!();
        println!("Band summary: {}", output.display());
    }
    Ok(())
}

/// Handles `config --list`.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles `config --set-*` / `--clear-log-file`.
///
/// Starts from the saved file (not environment overrides), applies the
/// changes and saves.
pub async fn handle_config_update_command(args: &ConfigArgs) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if tokio::fs::try_exists(&config_path).await? {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    apply_config_updates(&mut config, args);
    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

fn apply_config_updates(config: &mut Config, args: &ConfigArgs) {
    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.trim().trim_end_matches('/').to_string();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    if let Some(new_data_dir) = &args.new_data_dir {
        config.data_dir = Some(new_data_dir.clone());
    }
}
