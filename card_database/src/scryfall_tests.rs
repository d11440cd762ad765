//! Tests for the Scryfall client against a mock server

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::BuildError;
use crate::scryfall::{CardSource, ScryfallClient};

fn card_json(name: &str, set: &str, cn: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "card",
        "name": name,
        "set": set,
        "collector_number": cn,
        "lang": "en"
    })
}

fn not_found_json() -> serde_json::Value {
    serde_json::json!({
        "object": "error",
        "status": 404,
        "code": "not_found",
        "details": "No cards found matching your query"
    })
}

#[tokio::test]
async fn bulk_data_uri_picks_requested_kind() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bulk-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                { "type": "default_cards", "download_uri": "https://data.example.com/default.json" },
                { "type": "all_cards", "download_uri": "https://data.example.com/all.json" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = ScryfallClient::with_base_url(&base_url)?;
        Ok::<_, BuildError>((client.bulk_data_uri("all_cards")?, client.bulk_data_uri("rulings")))
    })
    .await
    .unwrap();

    let (uri, missing) = result.unwrap();
    assert_eq!(uri, "https://data.example.com/all.json");
    assert!(matches!(missing, Err(BuildError::BulkDataUnavailable(kind)) if kind == "rulings"));
}

#[tokio::test]
async fn download_streams_body() {
    let mock_server = MockServer::start().await;
    let body = b"[{\"name\":\"Opt\"}]".to_vec();

    Mock::given(method("GET"))
        .and(path("/file/all.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&mock_server)
        .await;

    let url = format!("{}/file/all.json", mock_server.uri());
    let (count, written) = tokio::task::spawn_blocking(move || {
        let client = ScryfallClient::with_base_url("http://unused").unwrap();
        let mut out = Vec::new();
        let count = client.download(&url, &mut out).unwrap();
        (count, out)
    })
    .await
    .unwrap();

    assert_eq!(count, body.len() as u64);
    assert_eq!(written, body);
}

#[tokio::test]
async fn search_follows_next_page() {
    let mock_server = MockServer::start().await;
    let next_page = format!("{}/cards/search?page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", "game:arena -in:booster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "has_more": true,
            "next_page": next_page,
            "data": [card_json("Plains", "m21", "260")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "has_more": false,
            "data": [card_json("Island", "m21", "264"), card_json("Swamp", "m21", "268")]
        })))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let cards = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .search("game:arena -in:booster")
    })
    .await
    .unwrap()
    .unwrap();

    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Plains", "Island", "Swamp"]);
}

#[tokio::test]
async fn search_without_results_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_json()))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let cards = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .search("game:arena -in:booster")
    })
    .await
    .unwrap()
    .unwrap();

    assert!(cards.is_empty());
}

#[tokio::test]
async fn set_metadata_found_and_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sets/m21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "set",
            "code": "m21",
            "name": "Core Set 2021",
            "icon_svg_uri": "https://svgs.example.com/sets/m21.svg"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sets/zzz"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_json()))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let (found, unknown) = tokio::task::spawn_blocking(move || {
        let client = ScryfallClient::with_base_url(&base_url).unwrap();
        (
            client.set_metadata("m21").unwrap(),
            client.set_metadata("zzz").unwrap(),
        )
    })
    .await
    .unwrap();

    let found = found.unwrap();
    assert_eq!(found.code, "m21");
    assert_eq!(
        found.icon_svg_uri.as_deref(),
        Some("https://svgs.example.com/sets/m21.svg")
    );
    assert!(unknown.is_none());
}

#[tokio::test]
async fn server_error_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bulk-data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .bulk_data_uri("all_cards")
    })
    .await
    .unwrap();

    match result {
        Err(BuildError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("Expected BuildError::HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_bytes_returns_body() {
    let mock_server = MockServer::start().await;
    let svg = b"<svg viewBox=\"0 0 32 32\"></svg>".to_vec();

    Mock::given(method("GET"))
        .and(path("/sets/rna.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(svg.clone()))
        .mount(&mock_server)
        .await;

    let url = format!("{}/sets/rna.svg", mock_server.uri());
    let bytes = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url("http://unused")
            .unwrap()
            .fetch_bytes(&url)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(bytes, svg);
}
