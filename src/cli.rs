use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::bands::RatingSource;
use crate::constants::DEFAULT_MIN_RATING;
use crate::constants::registry::DOWNLOAD_URL;
use crate::registry::RatingKind;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Federation band performance analyser
///
/// Links online chess handles to federation registry ratings and reports how
/// a player scores against opponents in the 2500, 2600, 2700 and 2800+ bands.
///
/// Typical use:
/// - `build-index --download` once per registry release
/// - `analyze` for a player and date range
/// - `resolve` to check how a single opponent was matched
/// - `recompute` to re-band an exported opponent breakdown
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default
    /// location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,

    /// Write logs only to the log file, not to the terminal.
    #[arg(long = "quiet", short = 'q', global = true, help_heading = "Debug")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a fixed-width registry file into a rating index.
    BuildIndex(BuildIndexArgs),
    /// Fetch a player's games and report performance by opponent band.
    Analyze(AnalyzeArgs),
    /// Resolve one handle against a rating index, without fetching anything.
    Resolve(ResolveArgs),
    /// Re-band an exported opponent breakdown CSV by its resolved ratings.
    Recompute(RecomputeArgs),
    /// Show or change the configuration.
    Config(ConfigArgs),
}

#[derive(ClapArgs, Debug)]
pub struct BuildIndexArgs {
    /// Registry text file. Defaults to `players_list_foa.txt` in the data directory.
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Download and unzip the registry first, unless the file already exists.
    #[arg(long, help_heading = "Download")]
    pub download: bool,

    /// Where `--download` fetches the zipped list from.
    #[arg(long, value_name = "URL", default_value = DOWNLOAD_URL, help_heading = "Download")]
    pub registry_url: String,

    /// Keep entries rated at least this much.
    #[arg(long, default_value_t = DEFAULT_MIN_RATING)]
    pub min_rating: u32,

    /// Which rating column to read.
    #[arg(long, value_enum, default_value_t = RatingKind::Blitz)]
    pub rating_kind: RatingKind,

    /// Output file. Defaults to `fide_<kind>_ratings_<min>+.json` in the data directory.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct AnalyzeArgs {
    /// Handle of the player to analyse.
    #[arg(long)]
    pub player: String,

    /// First day of the range, YYYY-MM-DD.
    #[arg(long)]
    pub since: String,

    /// Last day of the range, YYYY-MM-DD.
    #[arg(long)]
    pub until: String,

    /// Only count Titled Tuesday games.
    #[arg(long, help_heading = "Game Selection")]
    pub titled_tuesday: bool,

    /// Count unrated games too.
    #[arg(long, help_heading = "Game Selection")]
    pub include_unrated: bool,

    /// Comma-separated time classes to count.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "blitz",
        help_heading = "Game Selection"
    )]
    pub time_classes: Vec<String>,

    /// Where opponent ratings for banding come from.
    #[arg(long, value_enum, default_value_t = RatingSource::Federation, help_heading = "Rating")]
    pub rating_source: RatingSource,

    /// Rating index file. Defaults to the blitz index for `--min-opp` in the data directory.
    #[arg(long, value_name = "FILE", help_heading = "Rating")]
    pub index: Option<PathBuf>,

    /// Leave out games against opponents rated below this.
    #[arg(long, default_value_t = DEFAULT_MIN_RATING, help_heading = "Rating")]
    pub min_opp: u32,

    /// Directory for CSV and JSON reports. Defaults to `reports` in the data directory.
    #[arg(long, value_name = "DIR", help_heading = "Output")]
    pub output_dir: Option<PathBuf>,

    /// Print the report without writing files.
    #[arg(long, help_heading = "Output")]
    pub no_export: bool,

    /// Number of opponents shown in the terminal.
    #[arg(long, default_value_t = 25, help_heading = "Output")]
    pub top: usize,
}

#[derive(ClapArgs, Debug)]
pub struct ResolveArgs {
    /// Rating index file.
    #[arg(long, value_name = "FILE")]
    pub index: PathBuf,

    /// Online handle.
    #[arg(long)]
    pub handle: String,

    /// Display name as shown on the profile, e.g. "GM Magnus Carlsen".
    #[arg(long)]
    pub name: Option<String>,

    /// Federation rating used to break ties between fuzzy candidates.
    #[arg(long)]
    pub rating_hint: Option<u32>,
}

#[derive(ClapArgs, Debug)]
pub struct RecomputeArgs {
    /// Opponent breakdown CSV written by `analyze`.
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Leave out opponents rated below this.
    #[arg(long, default_value_t = DEFAULT_MIN_RATING)]
    pub min_opp: u32,

    /// Also write the band summary as CSV.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// List current configuration settings.
    #[arg(long = "list", short = 'l')]
    pub list: bool,

    /// Update API domain in config.
    #[arg(long = "set-api-domain", value_name = "API_DOMAIN")]
    pub new_api_domain: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", conflicts_with = "new_log_file_path")]
    pub clear_log_file_path: bool,

    /// Update the data directory for indexes, caches and reports.
    #[arg(long = "set-data-dir")]
    pub new_data_dir: Option<String>,
}

impl ConfigArgs {
    /// True when any setting is being changed
    pub fn has_updates(&self) -> bool {
        self.new_api_domain.is_some()
            || self.new_log_file_path.is_some()
            || self.clear_log_file_path
            || self.new_data_dir.is_some()
    }
}

/// Commands that print results for a person read logs on stdout too;
/// `--quiet` sends everything to the file only.
pub fn logs_to_stdout(args: &Args) -> bool {
    !args.quiet && !matches!(args.command, Command::Config(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let args = Args::try_parse_from([
            "fide_bands",
            "analyze",
            "--player",
            "hikaru",
            "--since",
            "2024-01-01",
            "--until",
            "2024-03-31",
        ])
        .unwrap();

        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };
        assert_eq!(analyze.time_classes, vec!["blitz"]);
        assert_eq!(analyze.rating_source, RatingSource::Federation);
        assert_eq!(analyze.min_opp, 2500);
        assert!(!analyze.titled_tuesday);
        assert!(!analyze.no_export);
    }

    #[test]
    fn test_analyze_options_and_global_flags() {
        let args = Args::try_parse_from([
            "fide_bands",
            "analyze",
            "--player",
            "hikaru",
            "--since",
            "2024-01-01",
            "--until",
            "2024-03-31",
            "--time-classes",
            "blitz,rapid",
            "--rating-source",
            "game",
            "--titled-tuesday",
            "--debug",
            "--quiet",
        ])
        .unwrap();

        assert!(args.debug);
        assert!(!logs_to_stdout(&args));
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };
        assert_eq!(analyze.time_classes, vec!["blitz", "rapid"]);
        assert_eq!(analyze.rating_source, RatingSource::Game);
        assert!(analyze.titled_tuesday);
    }

    #[test]
    fn test_build_index_rating_kind() {
        let args = Args::try_parse_from([
            "fide_bands",
            "build-index",
            "--registry",
            "players_list.txt",
            "--rating-kind",
            "standard",
            "--min-rating",
            "2600",
        ])
        .unwrap();

        let Command::BuildIndex(build) = args.command else {
            panic!("expected build-index");
        };
        assert_eq!(build.rating_kind, RatingKind::Standard);
        assert_eq!(build.min_rating, 2600);
        assert_eq!(build.output, None);
        assert_eq!(build.registry, Some(PathBuf::from("players_list.txt")));
        assert!(!build.download);
    }

    #[test]
    fn test_build_index_download_defaults() {
        let args = Args::try_parse_from(["fide_bands", "build-index", "--download"]).unwrap();
        let Command::BuildIndex(build) = args.command else {
            panic!("expected build-index");
        };
        assert!(build.download);
        assert_eq!(build.registry, None);
        assert_eq!(build.registry_url, DOWNLOAD_URL);
    }

    #[test]
    fn test_recompute_and_two_year_source() {
        let args = Args::try_parse_from([
            "fide_bands",
            "recompute",
            "--input",
            "breakdown.csv",
            "--min-opp",
            "2600",
        ])
        .unwrap();
        let Command::Recompute(recompute) = args.command else {
            panic!("expected recompute");
        };
        assert_eq!(recompute.input, PathBuf::from("breakdown.csv"));
        assert_eq!(recompute.min_opp, 2600);
        assert_eq!(recompute.output, None);

        let args = Args::try_parse_from([
            "fide_bands",
            "analyze",
            "--player",
            "hikaru",
            "--since",
            "2024-01-01",
            "--until",
            "2024-03-31",
            "--rating-source",
            "two-year-avg",
        ])
        .unwrap();
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };
        assert_eq!(analyze.rating_source, RatingSource::TwoYearAvg);
    }

    #[test]
    fn test_config_flags() {
        let args = Args::try_parse_from(["fide_bands", "config", "--list"]).unwrap();
        let Command::Config(config) = &args.command else {
            panic!("expected config");
        };
        assert!(config.list);
        assert!(!config.has_updates());
        assert!(!logs_to_stdout(&args));

        let conflict = Args::try_parse_from([
            "fide_bands",
            "config",
            "--set-log-file",
            "/tmp/x.log",
            "--clear-log-file",
        ]);
        assert!(conflict.is_err());
    }
}
