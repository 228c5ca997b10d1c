//! End-to-end tests for the complete analysis flow
//!
//! Registry text → rating index → resolution → bands → performance, plus the
//! same flow driven through mocked game and profile endpoints.

use chrono::NaiveDate;
use fide_bands::analysis::{AnalysisOptions, analyze};
use fide_bands::bands::{Band, classify};
use fide_bands::config::Config;
use fide_bands::data_fetcher::api::{
    GameFilter, create_http_client, fetch_player_games, fetch_profiles,
};
use fide_bands::data_fetcher::cache::ProfileCache;
use fide_bands::registry::{RatingIndex, RatingKind, parse_registry, parse_registry_file};
use fide_bands::resolver::{MatchStrategy, Query, resolve};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry_line(
    id: &str,
    name: &str,
    fed: &str,
    standard: &str,
    rapid: &str,
    blitz: &str,
) -> String {
    format!(
        "{id:<15}{name:<61}{fed:<4}{:<4}{:<5}{:<5}{standard:<6}{rapid:<6}{blitz:<6}",
        "", "", ""
    )
}

fn registry_text() -> String {
    let header = format!(
        "{:<15}{:<61}{:<4}{:<4}{:<5}{:<5}{:<6}{:<6}{:<6}",
        "ID Number", "Name", "Fed", "Sex", "Tit", "FOA", "SRtng", "RRtng", "BRtng"
    );
    [
        header,
        registry_line("1503014", "Carlsen, Magnus", "NOR", "2830", "2820", "2900"),
        registry_line("2016192", "Nakamura, Hikaru", "USA", "2800", "2750", "2870"),
        registry_line("14109603", "Grischuk, Alexander", "RUS", "2730", "2700", "2710"),
        registry_line("5202213", "So, Wesley", "USA", "2750", "2740", "2640"),
        registry_line("1234567", "Amateur, Average", "NOR", "1900", "1900", "1900"),
        registry_line("7654321", "-", "NOR", "2600", "2600", "2600"),
        registry_line("notanid", "Broken, Row", "XXX", "2600", "2600", "2600"),
        registry_line("9999999", "Unrated, Player", "FIN", "", "", ""),
    ]
    .join("\n")
}

#[test]
fn test_carlsen_scenario() {
    let parsed = parse_registry(&registry_text(), 2500, RatingKind::Blitz).unwrap();
    assert_eq!(parsed.index.get("magnus_carlsen"), Some(2900));

    let query = Query::new("dummyhandle").with_display_name("Magnus Carlsen");
    let result = resolve(&query, &parsed.index);

    assert_eq!(result.strategy, MatchStrategy::DirectOrder);
    assert_eq!(result.rating, Some(2900));
    assert_eq!(classify(result.rating), Some(Band::B800Plus));
}

#[test]
fn test_registry_skip_counts() {
    let parsed = parse_registry(&registry_text(), 2500, RatingKind::Blitz).unwrap();
    let stats = &parsed.stats;

    assert_eq!(stats.lines_scanned, 8);
    assert_eq!(stats.accepted, 4);
    assert_eq!(stats.below_threshold, 1);
    assert_eq!(stats.placeholder_names, 1);
    assert_eq!(stats.malformed_records, 1);
    assert_eq!(stats.unrated, 1);
    assert_eq!(stats.skipped(), 4);
    assert_eq!(parsed.index.len(), 4);
}

#[test]
fn test_rating_kind_selects_column() {
    let standard = parse_registry(&registry_text(), 2500, RatingKind::Standard).unwrap();
    assert_eq!(standard.index.get("magnus_carlsen"), Some(2830));
    assert_eq!(standard.index.get("wesley_so"), Some(2750));

    let rapid = parse_registry(&registry_text(), 2750, RatingKind::Rapid).unwrap();
    assert_eq!(rapid.index.get("magnus_carlsen"), Some(2820));
    assert_eq!(rapid.index.get("alexander_grischuk"), None);
}

#[tokio::test]
async fn test_index_file_round_trip_keeps_rating_order() {
    let dir = tempdir().unwrap();
    let registry_path = dir.path().join("players_list_foa.txt");
    tokio::fs::write(&registry_path, registry_text()).await.unwrap();

    let parsed = parse_registry_file(&registry_path, 2500, RatingKind::Blitz)
        .await
        .unwrap();
    let index_path = dir.path().join(RatingKind::Blitz.index_file_name(2500));
    parsed.index.save_to_path(&index_path).await.unwrap();

    let json = tokio::fs::read_to_string(&index_path).await.unwrap();
    let carlsen = json.find("magnus_carlsen").unwrap();
    let nakamura = json.find("hikaru_nakamura").unwrap();
    let so = json.find("wesley_so").unwrap();
    assert!(carlsen < nakamura && nakamura < so);

    let loaded = RatingIndex::load_from_path(&index_path).await.unwrap();
    assert_eq!(loaded, parsed.index);
}

#[tokio::test]
async fn test_full_pipeline_against_mock_api() {
    let mock_server = MockServer::start().await;
    let config = Config {
        api_domain: mock_server.uri(),
        ..Config::default()
    };
    let client = create_http_client(&config).unwrap();

    Mock::given(method("GET"))
        .and(path("/player/tester/games/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "archives": [format!("{}/player/tester/games/2024/01", mock_server.uri())]
        })))
        .mount(&mock_server)
        .await;

    let game =
        |opponent: &str, opponent_rating: u32, my_result: &str, their_result: &str, end: i64| {
            serde_json::json!({
                "url": "https://www.chess.com/game/live/1",
                "end_time": end,
                "rated": true,
                "time_class": "blitz",
                "white": { "username": "Tester", "rating": 2600, "result": my_result },
                "black": {
                    "username": opponent,
                    "rating": opponent_rating,
                    "result": their_result
                },
            })
        };
    Mock::given(method("GET"))
        .and(path("/player/tester/games/2024/01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "games": [
                game("DummyHandle", 3200, "checkmated", "win", 1_704_229_200),
                game("DummyHandle", 3200, "repetition", "repetition", 1_704_315_600),
                game("GMWSO", 2900, "win", "resigned", 1_704_402_000),
                game("Nobody", 2000, "win", "timeout", 1_704_488_400),
            ]
        })))
        .mount(&mock_server)
        .await;

    let profile = |username: &str, name: &str| {
        serde_json::json!({ "username": username, "name": name, "title": "GM" })
    };
    Mock::given(method("GET"))
        .and(path("/player/dummyhandle"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(profile("dummyhandle", "Magnus Carlsen")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/player/gmwso"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile("gmwso", "Wesley So (USA)")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/player/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let filter = GameFilter::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    );
    let games = fetch_player_games(&client, &config, "tester", &filter)
        .await
        .unwrap();
    assert_eq!(games.len(), 4);

    let mut cache = ProfileCache::new();
    let handles: Vec<String> = games.iter().map(|g| g.opponent_handle.clone()).collect();
    let profiles = fetch_profiles(&client, &config, &mut cache, &handles).await;
    assert_eq!(profiles.len(), 2);

    let index = parse_registry(&registry_text(), 2500, RatingKind::Blitz)
        .unwrap()
        .index;
    let analysis = analyze(&games, &profiles, &index, &AnalysisOptions::default());

    assert_eq!(analysis.excluded_games, 1);
    assert_eq!(analysis.summary.overall.games, 3);
    assert_eq!(analysis.summary.overall.total_score, 1.5);

    let top = analysis.summary.band(Band::B800Plus).unwrap();
    assert_eq!(top.stats.games, 2);
    assert_eq!(top.stats.total_score, 0.5);
    let six = analysis.summary.band(Band::B600).unwrap();
    assert_eq!(six.stats.games, 1);
    assert_eq!(six.stats.total_score, 1.0);

    assert_eq!(analysis.opponents[0].handle, "dummyhandle");
    assert_eq!(analysis.opponents[0].match_strategy, MatchStrategy::DirectOrder);
    assert_eq!(analysis.resolutions["gmwso"].rating, Some(2640));
    assert!(!analysis.resolutions["nobody"].is_resolved());
}
