//! Integration tests for the HTTP fetcher and the cached command path
//!
//! A wiremock server stands in for PokeAPI.

use std::sync::Arc;
use std::time::Duration;

use pokedex::cache::ExpiringCache;
use pokedex::catch::Roll;
use pokedex::commands::{CommandError, Dispatcher};
use pokedex::data::{Endpoints, Fetch, FetchError, HttpFetcher, ResourceError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct AlwaysCatch;

impl Roll for AlwaysCatch {
    fn roll(&mut self) -> f64 {
        0.0
    }
}

fn dispatcher_for(server: &MockServer, cache: ExpiringCache) -> Dispatcher {
    Dispatcher::new(
        Endpoints::new(format!("{}/api/v2", server.uri())),
        cache,
        Arc::new(HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap()),
        Box::new(AlwaysCatch),
    )
}

#[tokio::test]
async fn test_fetch_returns_body_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/ditto"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"ditto"}"#))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let body = fetcher
        .fetch(&format!("{}/api/v2/pokemon/ditto", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, br#"{"name":"ditto"}"#.to_vec());
}

#[tokio::test]
async fn test_fetch_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let result = fetcher
        .fetch(&format!("{}/api/v2/pokemon/missingno", server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_repeated_map_hits_network_once() {
    let server = MockServer::start().await;
    let first = format!("{}/api/v2/location-area/", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/v2/location-area/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": first,
            "results": [{"name": "canalave-city-area", "url": "u"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = ExpiringCache::new();
    let mut dispatcher = dispatcher_for(&server, cache.clone());
    let mut out = Vec::new();

    // The page links back to itself, so mapb re-requests the same URL
    dispatcher.execute_line("map", &mut out).await.unwrap();
    dispatcher.execute_line("mapb", &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "canalave-city-area\ncanalave-city-area\n"
    );
    assert!(cache.get(&first).is_some());
    server.verify().await;
}

#[tokio::test]
async fn test_error_status_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let cache = ExpiringCache::new();
    let mut dispatcher = dispatcher_for(&server, cache.clone());
    let mut out = Vec::new();

    for _ in 0..2 {
        let result = dispatcher.execute_line("catch pikachu", &mut out).await;
        assert!(matches!(
            result,
            Err(CommandError::Resource(ResourceError::Fetch(FetchError::Status { status: 500, .. })))
        ));
    }

    assert!(cache.is_empty());
    assert!(dispatcher.session().pokedex.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_catch_then_inspect_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/bulbasaur"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "bulbasaur",
            "base_experience": 64,
            "height": 7,
            "weight": 69,
            "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": "s"}}],
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "t1"}},
                {"slot": 2, "type": {"name": "poison", "url": "t2"}}
            ]
        })))
        .mount(&server)
        .await;

    let mut dispatcher = dispatcher_for(&server, ExpiringCache::new());
    let mut out = Vec::new();

    dispatcher.execute_line("catch bulbasaur", &mut out).await.unwrap();
    out.clear();
    dispatcher.execute_line("inspect bulbasaur", &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Name: bulbasaur"));
    assert!(text.contains("Weight: 69"));
    assert!(text.contains("  - hp: 45"));
    assert!(text.contains("  - poison"));
    assert_eq!(dispatcher.session().caught("bulbasaur").unwrap().catch_chance, 0.85);
}

#[tokio::test]
async fn test_entry_refetched_after_sweep() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/location-area/eterna-city-area"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "eterna-city-area",
            "pokemon_encounters": [{"pokemon": {"name": "psyduck", "url": "u"}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let cache = ExpiringCache::new();
    let mut dispatcher = dispatcher_for(&server, cache.clone());
    let mut out = Vec::new();

    dispatcher.execute_line("explore eterna-city-area", &mut out).await.unwrap();
    cache.reap(chrono::Utc::now() + chrono::Duration::seconds(1));
    dispatcher.execute_line("explore eterna-city-area", &mut out).await.unwrap();

    server.verify().await;
}
