//! Integration tests for the harvesting jobs
//!
//! These tests use wiremock to create mock HTTP servers and run the fetcher
//! and the jobs end-to-end against them.

use anime_harvest::config::{
    CatalogueConfig, CoversConfig, FetcherConfig, SeasonsConfig, TranslateConfig, UserAgentConfig,
};
use anime_harvest::crawler::{build_http_client, paginate, FetchError, Fetcher, RetryPolicy};
use anime_harvest::jobs::{run_catalogue, run_covers, run_seasons};
use anime_harvest::output::{read_compact, read_json, read_json_array, Score};
use anime_harvest::records::{CatalogueEntry, MangaDocument};
use anime_harvest::sources::SeasonSource;
use anime_harvest::state::PagerState;
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COVER_PREFIX: &str = "https://cdn.myanimelist.net/images/anime/";

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestHarvester".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// A fetcher with delays short enough for tests
fn test_fetcher(max_retries: u32) -> Fetcher {
    let client = build_http_client(&user_agent(), &FetcherConfig::default())
        .expect("Failed to build HTTP client");

    Fetcher::new(
        client,
        RetryPolicy {
            max_retries,
            retry_delay: Duration::from_millis(10),
            rate_limit_cooldown: Duration::from_millis(20),
            politeness_delay: Duration::from_millis(1),
        },
    )
}

/// A fetcher that never retries and waits `delay` between requests
fn paced_fetcher(delay: Duration) -> Fetcher {
    let client = build_http_client(&user_agent(), &FetcherConfig::default())
        .expect("Failed to build HTTP client");

    Fetcher::new(
        client,
        RetryPolicy {
            max_retries: 0,
            retry_delay: Duration::from_millis(10),
            rate_limit_cooldown: Duration::from_millis(20),
            politeness_delay: delay,
        },
    )
}

fn anime(id: u64, title: &str, day: &str, synopsis: Option<&str>) -> serde_json::Value {
    json!({
        "mal_id": id,
        "title": title,
        "images": {"jpg": {"large_image_url": format!("{}{}/{}l.jpg", COVER_PREFIX, id, id)}},
        "score": 8.0,
        "broadcast": {"day": day},
        "synopsis": synopsis,
    })
}

fn season_page(items: Vec<serde_json::Value>, has_next_page: bool) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "pagination": {"has_next_page": has_next_page},
        "data": items,
    }))
}

fn seasons_config(server: &MockServer, output_path: &Path) -> SeasonsConfig {
    SeasonsConfig {
        api_base: format!("{}/v4", server.uri()),
        current: "now".to_string(),
        upcoming: "upcoming".to_string(),
        sfw: true,
        max_pages: None,
        output_path: output_path.display().to_string(),
        cover_prefix: COVER_PREFIX.to_string(),
        cover_suffix: ".jpg".to_string(),
        translate: None,
    }
}

async fn mount_season(server: &MockServer, season: &str, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/seasons/{}", season)))
        .and(query_param("sfw", "true"))
        .and(query_param("page", page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let mock_server = MockServer::start().await;

    // First request is rate limited
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(3);
    let body = fetcher
        .get(&format!("{}/data", mock_server.uri()))
        .await
        .expect("Fetch should succeed after one retry");

    assert_eq!(body, "payload");
    mock_server.verify().await;
}

#[tokio::test]
async fn test_persistent_rate_limit_stops_at_cap() {
    let mock_server = MockServer::start().await;

    // One initial attempt plus two retries
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(2);
    let result = fetcher.get(&format!("{}/data", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::RateLimited { .. })));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_server_error_retried_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(3);
    let body = fetcher.get(&format!("{}/data", mock_server.uri())).await;

    assert_eq!(body, Ok("recovered".to_string()));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_not_found_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(3);
    let result = fetcher.get(&format!("{}/missing", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::NotFound { .. })));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_successful_requests_are_spaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(150);
    let fetcher = paced_fetcher(delay);
    let url = format!("{}/data", mock_server.uri());

    let start = Instant::now();
    for _ in 0..3 {
        assert_eq!(fetcher.get(&url).await, Ok("ok".to_string()));
    }

    // The first request goes out at once; each later one waits
    assert!(start.elapsed() >= delay * 2, "elapsed {:?}", start.elapsed());
    mock_server.verify().await;
}

#[tokio::test]
async fn test_concurrent_runs_share_the_delay() {
    let mock_server = MockServer::start().await;

    for season in ["now", "upcoming"] {
        mount_season(&mock_server, season, "1", season_page(vec![anime(1, "X", "Mondays", None)], true)).await;
        mount_season(&mock_server, season, "2", season_page(vec![anime(2, "Y", "Fridays", None)], false)).await;
    }

    let api_base = format!("{}/v4", mock_server.uri());
    let current = SeasonSource::new(&api_base, "now", true, None).expect("Valid source");
    let upcoming = SeasonSource::new(&api_base, "upcoming", true, None).expect("Valid source");

    let delay = Duration::from_millis(150);
    let fetcher = paced_fetcher(delay);

    let start = Instant::now();
    let (a, b) = tokio::join!(paginate(&current, &fetcher), paginate(&upcoming, &fetcher));
    let elapsed = start.elapsed();

    let a = a.expect("Current season run");
    let b = b.expect("Upcoming season run");
    assert_eq!(a.pages_fetched + b.pages_fetched, 4);
    assert_eq!(a.final_state, PagerState::NoMoreData);
    assert_eq!(b.final_state, PagerState::NoMoreData);

    // Four requests through one fetcher means three full gaps, not two per run in parallel
    assert!(elapsed >= delay * 3, "elapsed {:?}", elapsed);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_seasons_job_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("anime_seasons.json");

    mount_season(
        &mock_server,
        "now",
        "1",
        season_page(
            vec![
                anime(1, "X", "Mondays", None),
                anime(2, "Y", "Fridays", None),
            ],
            true,
        ),
    )
    .await;
    // Page 2 repeats (1, "X")
    mount_season(
        &mock_server,
        "now",
        "2",
        season_page(
            vec![anime(1, "X", "Mondays", None), anime(3, "Z", "Unknown", None)],
            true,
        ),
    )
    .await;
    mount_season(&mock_server, "now", "3", season_page(vec![], true)).await;
    mount_season(
        &mock_server,
        "upcoming",
        "1",
        season_page(vec![anime(4, "W", "Sundays", None)], false),
    )
    .await;

    let config = seasons_config(&mock_server, &output);
    let report = run_seasons(&config, &test_fetcher(1))
        .await
        .expect("Seasons job should run");

    assert!(report.succeeded());
    assert_eq!(report.final_state, Some(PagerState::NoMoreData));
    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.candidates, 5);
    assert_eq!(report.unique, 4);

    let written = read_compact(&output).expect("Output should be readable");
    assert_eq!(written.header, vec!["i", "t", "c", "s", "d"]);

    let ids: Vec<Option<u64>> = written.current.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(written.upcoming.len(), 1);

    let first = &written.current[0];
    assert_eq!(first.cover, "1/1l");
    assert_eq!(first.score, Score::Value(8.0));
    assert_eq!(first.day, "Lu");
    assert_eq!(written.current[2].day, "~");
    assert_eq!(written.upcoming[0].day, "Di");

    mock_server.verify().await;
}

#[tokio::test]
async fn test_seasons_job_writes_partial_results_on_failure() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("anime_seasons.json");

    mount_season(
        &mock_server,
        "now",
        "1",
        season_page(vec![anime(1, "X", "Mondays", None)], false),
    )
    .await;

    // Upcoming season keeps failing: one attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/v4/seasons/upcoming"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = seasons_config(&mock_server, &output);
    let report = run_seasons(&config, &test_fetcher(1))
        .await
        .expect("Seasons job should still write its output");

    assert!(!report.succeeded());
    assert_eq!(report.final_state, Some(PagerState::FetchFailed));
    assert!(report.error.as_deref().is_some_and(|e| e.contains("500")));

    let written = read_compact(&output).expect("Partial output should be readable");
    assert_eq!(written.current.len(), 1);
    assert!(written.upcoming.is_empty());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_seasons_job_translates_synopses() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("anime_seasons.json");

    mount_season(
        &mock_server,
        "now",
        "1",
        season_page(
            vec![
                anime(1, "X", "Mondays", Some("A mage's journey.")),
                anime(2, "Y", "Tuesdays", None),
            ],
            false,
        ),
    )
    .await;
    mount_season(
        &mock_server,
        "upcoming",
        "1",
        season_page(vec![anime(3, "Z", "Saturdays", Some("A sequel."))], false),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"translatedText": "Résumé traduit"})),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = seasons_config(&mock_server, &output);
    config.translate = Some(TranslateConfig {
        endpoint: format!("{}/translate", mock_server.uri()),
        source: "en".to_string(),
        target: "fr".to_string(),
        max_concurrent: 2,
    });

    let report = run_seasons(&config, &test_fetcher(0))
        .await
        .expect("Seasons job should run");
    assert!(report.succeeded());

    let written = read_compact(&output).expect("Output should be readable");
    assert_eq!(written.header.last().map(String::as_str), Some("y"));
    assert_eq!(written.current[0].synopsis.as_deref(), Some("Résumé traduit"));
    assert_eq!(written.current[1].synopsis.as_deref(), Some("~"));
    assert_eq!(written.upcoming[0].synopsis.as_deref(), Some("Résumé traduit"));

    mock_server.verify().await;
}

fn catalogue_html(cards: &[(&str, &str, &str)]) -> String {
    let cards: String = cards
        .iter()
        .map(|(href, title, label)| {
            format!(
                r#"<div class="shrink-0 m-3 rounded">
                     <a class="flex divide-x" href="{}"><img src="/img/{}.jpg"><h1>{}</h1></a>
                     <p>{}</p>
                   </div>"#,
                href, title, title, label
            )
        })
        .collect();
    format!("<html><body><div id=\"list\">{}</div></body></html>", cards)
}

async fn mount_catalogue_page(server: &MockServer, page: &str, html: String) {
    Mock::given(method("GET"))
        .and(path("/catalogue"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_catalogue_job_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("animes.json");

    mount_catalogue_page(
        &mock_server,
        "1",
        catalogue_html(&[
            ("/catalogue/frieren/", "Frieren", "Anime, Scans"),
            ("/catalogue/berserk/", "Berserk", "Scans"),
        ]),
    )
    .await;
    // Same card again behind a fragment, plus a new one
    mount_catalogue_page(
        &mock_server,
        "2",
        catalogue_html(&[
            ("/catalogue/frieren#episodes", "Frieren", "Anime"),
            ("/catalogue/dandadan/", "Dandadan", "Anime"),
        ]),
    )
    .await;
    mount_catalogue_page(&mock_server, "3", catalogue_html(&[])).await;

    let config = CatalogueConfig {
        base_url: format!("{}/catalogue", mock_server.uri()),
        page_param: "page".to_string(),
        max_pages: None,
        output_path: output.display().to_string(),
        card_selector: "a.flex.divide-x".to_string(),
        title_selector: "h1".to_string(),
        image_selector: "img[src]".to_string(),
        marker: "Anime".to_string(),
        marker_depth: 3,
    };

    let report = run_catalogue(&config, &test_fetcher(0))
        .await
        .expect("Catalogue job should run");

    assert!(report.succeeded());
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.candidates, 3);
    assert_eq!(report.unique, 2);

    let written: Vec<CatalogueEntry> = read_json_array(&output).expect("Output should be readable");
    let titles: Vec<&str> = written.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Frieren", "Dandadan"]);
    assert_eq!(
        written[0].link.as_deref(),
        Some(format!("{}/catalogue/frieren/", mock_server.uri()).as_str())
    );
    assert_eq!(
        written[1].image.as_deref(),
        Some(format!("{}/img/Dandadan.jpg", mock_server.uri()).as_str())
    );

    let raw = std::fs::read_to_string(&output).expect("Output should exist");
    assert!(raw.starts_with("[\n    {\n        \"titre\""));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_covers_job_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("list_scans_fr.json");
    let output = dir.path().join("list_scans_fr_updated.json");

    std::fs::write(
        &input,
        r#"{
            "source": "scans",
            "mangas": [
                {"name": "Berserk", "coverUrl": "", "chapters": 374},
                {"name": "Dorohedoro", "coverUrl": "https://cdn.example.com/d.jpg"},
                {"name": "Nobody Knows", "coverUrl": ""},
                {"name": "Blame!", "coverUrl": ""}
            ]
        }"#,
    )
    .expect("Failed to write input");

    Mock::given(method("GET"))
        .and(path("/v4/manga"))
        .and(query_param("q", "Berserk"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"images": {"jpg": {"image_url": "https://cdn.myanimelist.net/images/manga/1/157897.jpg"}}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/manga"))
        .and(query_param("q", "Nobody Knows"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = CoversConfig {
        api_base: format!("{}/v4", mock_server.uri()),
        input_path: input.display().to_string(),
        output_path: output.display().to_string(),
        default_count: 100,
    };

    // "Blame!" lies beyond the count and is never looked up
    let report = run_covers(&config, &test_fetcher(2), 3)
        .await
        .expect("Covers job should run");

    assert!(report.succeeded());
    let details: Vec<(&str, usize)> = report
        .details
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    assert_eq!(
        details,
        vec![
            ("Mangas processed", 3),
            ("Empty coverUrl before", 2),
            ("Covers fetched", 1),
            ("Remaining empty", 1),
        ]
    );

    let written: MangaDocument = read_json(&output).expect("Output should be readable");
    assert_eq!(
        written.mangas[0].cover_url(),
        "https://cdn.myanimelist.net/images/manga/1/157897.jpg"
    );
    assert_eq!(written.mangas[0].get("chapters"), Some(&json!(374)));
    assert_eq!(written.mangas[1].cover_url(), "https://cdn.example.com/d.jpg");
    assert_eq!(written.mangas[2].cover_url(), "");
    assert_eq!(written.mangas[3].cover_url(), "");
    assert_eq!(written.get("source"), Some(&json!("scans")));

    // Keys come back in their input order
    let raw = std::fs::read_to_string(&output).expect("Output should be readable");
    let source_at = raw.find("\"source\"").expect("source key written");
    let mangas_at = raw.find("\"mangas\"").expect("mangas key written");
    assert!(source_at < mangas_at);

    mock_server.verify().await;
}
