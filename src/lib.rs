//! Federation Band Performance Library
//!
//! This library links online chess handles to a federation rating registry
//! and measures a player's results against opponents grouped into rating
//! bands (2500, 2600, 2700 and 2800+).
//!
//! # Examples
//!
//! ```rust
//! use fide_bands::bands::{Band, classify};
//! use fide_bands::registry::{RatingKind, parse_registry};
//! use fide_bands::resolver::{MatchStrategy, Query, resolve};
//!
//! let registry = format!(
//!     "{:<15}{:<61}{:<4}{:<6}{:<6}{:<6}\n{:<15}{:<61}{:<4}{:<6}{:<6}{:<6}\n",
//!     "ID Number", "Name", "Fed", "SRtng", "RRtng", "BRtng",
//!     "1503014", "Carlsen, Magnus", "NOR", "2830", "2820", "2900",
//! );
//! let parsed = parse_registry(&registry, 2500, RatingKind::Blitz).unwrap();
//!
//! let query = Query::new("dummyhandle").with_display_name("Magnus Carlsen");
//! let result = resolve(&query, &parsed.index);
//!
//! assert_eq!(result.strategy, MatchStrategy::DirectOrder);
//! assert_eq!(classify(result.rating), Some(Band::B800Plus));
//! ```

pub mod analysis;
pub mod bands;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod performance;
pub mod player_names;
pub mod recompute;
pub mod registry;
pub mod report;
pub mod resolver;

// Re-export commonly used types for convenience
pub use analysis::{Analysis, AnalysisOptions, analyze, analyze_with_averages};
pub use bands::{Band, RatingSource, classify};
pub use config::Config;
pub use error::AppError;
pub use performance::{GameOutcome, PerformanceSummary, aggregate, perf_rating};
pub use player_names::NameKey;
pub use registry::{RatingIndex, RatingKind, parse_registry};
pub use resolver::{MatchResult, MatchStrategy, Query, resolve, resolve_batch};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
