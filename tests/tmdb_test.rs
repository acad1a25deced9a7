//! TMDB API client tests
//!
//! Tests discovery, search, preview fetching, auth modes and error handling.

use futures::future;
use mockito::{Matcher, Server};
use tokio_test::{assert_err, assert_ok};
use reelpeek::api::{TmdbClient, TmdbError};
use reelpeek::catalog::{self, CatalogOutcome, CatalogQuery};
use reelpeek::config::{AuthMode, Credentials, Session};

// =============================================================================
// Fixtures
// =============================================================================

const DISCOVER_RESPONSE: &str = r#"{
    "page": 1,
    "results": [
        {
            "id": 438631,
            "title": "Dune",
            "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
            "vote_average": 7.8,
            "release_date": "2021-09-15"
        },
        {
            "id": 78,
            "title": "Blade Runner",
            "poster_path": null,
            "vote_average": 7.9
        }
    ],
    "total_pages": 500,
    "total_results": 10000
}"#;

const DETAIL_RESPONSE: &str = r#"{
    "id": 78,
    "title": "Blade Runner",
    "poster_path": "/63N9uy8nd9j7Eog2axPQ8lbr3Wj.jpg",
    "vote_average": 7.9,
    "release_date": "1982-06-25",
    "overview": "In the smog-choked dystopian Los Angeles of 2019...",
    "runtime": 118
}"#;

const VIDEOS_RESPONSE: &str = r#"{
    "id": 78,
    "results": [
        {"site": "YouTube", "type": "Featurette", "key": "feat1", "official": true, "name": "Making Of"},
        {"site": "YouTube", "type": "Trailer", "key": "eogpIG53Cis", "official": true, "name": "Final Cut Trailer"}
    ]
}"#;

fn bearer_client(url: String) -> TmdbClient {
    let creds = Credentials::new(Some("v4-token".into()), None);
    TmdbClient::with_base_url(Session::new(creds, "unused"), url)
}

fn key_client(url: String) -> TmdbClient {
    let creds = Credentials::new(None, Some("v3-key".into()));
    TmdbClient::with_base_url(Session::new(creds, "unused"), url)
}

// =============================================================================
// Discovery / Search
// =============================================================================

#[tokio::test]
async fn test_discover_parses_results() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DISCOVER_RESPONSE)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let movies = assert_ok!(client.discover_popular().await);

    mock.assert_async().await;

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, 438631);
    assert_eq!(movies[0].title, "Dune");
    assert_eq!(movies[0].vote_average, Some(7.8));
    assert_eq!(movies[1].poster_path, None);
    assert_eq!(movies[1].rating_label(), "7.9");
}

#[tokio::test]
async fn test_bearer_mode_sends_authorization_header() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Regex("sort_by=popularity.desc".into()))
        .match_header("authorization", "Bearer v4-token")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let movies = client.discover_popular().await.unwrap();

    assert!(movies.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_key_mode_appends_query_param() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
            Matcher::UrlEncoded("api_key".into(), "v3-key".into()),
        ]))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(DISCOVER_RESPONSE)
        .create_async()
        .await;

    let client = key_client(server.url());
    assert_eq!(client.default_mode(), AuthMode::ApiKey);

    let movies = client.discover_popular().await.unwrap();
    mock.assert_async().await;
    assert_eq!(movies.len(), 2);
}

#[tokio::test]
async fn test_search_encodes_term() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "blade runner".into()),
            Matcher::UrlEncoded("api_key".into(), "v3-key".into()),
        ]))
        .with_status(200)
        .with_body(DISCOVER_RESPONSE)
        .create_async()
        .await;

    let client = key_client(server.url());
    let movies = client.search_movies("blade runner").await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies[1].title, "Blade Runner");
}

#[tokio::test]
async fn test_blank_search_falls_back_to_popular() {
    let mut server = Server::new_async().await;

    let search = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let discover = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DISCOVER_RESPONSE)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let query = CatalogQuery::from_term("   ");
    let outcome = catalog::load(&client, &query).await;

    search.assert_async().await;
    discover.assert_async().await;
    match outcome {
        CatalogOutcome::Movies(movies) => assert_eq!(movies.len(), 2),
        other => panic!("expected movies, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_with_no_results_gives_message() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"page": 1, "results": [], "total_results": 0}"#)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let outcome = catalog::load(&client, &CatalogQuery::Search("qwxz".into())).await;

    assert_eq!(
        outcome,
        CatalogOutcome::Message {
            text: "No movies found for \"qwxz\".".into(),
            is_error: false,
            needs_credentials: false,
        }
    );
}

// =============================================================================
// Preview (details + videos)
// =============================================================================

#[tokio::test]
async fn test_preview_fetches_detail_and_videos() {
    let mut server = Server::new_async().await;

    let detail = server
        .mock("GET", "/movie/78")
        .with_status(200)
        .with_body(DETAIL_RESPONSE)
        .create_async()
        .await;
    let videos = server
        .mock("GET", "/movie/78/videos")
        .with_status(200)
        .with_body(VIDEOS_RESPONSE)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let (movie, vids) = client.preview(78).await.unwrap();

    detail.assert_async().await;
    videos.assert_async().await;

    assert_eq!(movie.title, "Blade Runner");
    assert_eq!(movie.release_date(), Some("1982-06-25"));
    assert_eq!(vids.len(), 2);
    assert_eq!(vids[1].kind, "Trailer");

    let chosen = reelpeek::select_trailer(&vids).unwrap();
    assert_eq!(chosen.key, "eogpIG53Cis");
}

#[tokio::test]
async fn test_catalog_and_preview_share_a_client() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DISCOVER_RESPONSE)
        .create_async()
        .await;
    server
        .mock("GET", "/movie/78")
        .with_status(200)
        .with_body(DETAIL_RESPONSE)
        .create_async()
        .await;
    server
        .mock("GET", "/movie/78/videos")
        .with_status(200)
        .with_body(VIDEOS_RESPONSE)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let (outcome, preview) = future::join(
        catalog::load(&client, &CatalogQuery::Popular),
        client.preview(78),
    )
    .await;

    assert!(matches!(outcome, CatalogOutcome::Movies(ref m) if m.len() == 2));
    let (movie, _) = assert_ok!(preview);
    assert_eq!(movie.id, 78);
}

#[tokio::test]
async fn test_preview_failure_propagates() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/999999")
        .with_status(404)
        .with_body(r#"{"success":false,"status_code":34,"status_message":"The resource you requested could not be found."}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/movie/999999/videos")
        .with_status(200)
        .with_body(r#"{"id": 999999, "results": []}"#)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let err = client.preview(999999).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "The resource you requested could not be found.");
    assert!(!err.is_unauthorized());
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_missing_credentials_never_hit_network() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(Session::new(Credentials::default(), "unused"), server.url());
    let err = assert_err!(client.discover_popular().await);

    mock.assert_async().await;
    assert!(matches!(err, TmdbError::AuthMissing(AuthMode::ApiKey)));
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Missing TMDb API key. Please set a valid key.");
}

#[tokio::test]
async fn test_401_uses_status_message_from_body() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status_code":7,"status_message":"Invalid API key","success":false}"#)
        .create_async()
        .await;

    let client = key_client(server.url());
    let err = client.discover_popular().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Invalid API key");
    assert_eq!(err.to_string(), "401 Invalid API key");
}

#[tokio::test]
async fn test_401_flags_catalog_for_credentials() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status_message":"Invalid API key"}"#)
        .create_async()
        .await;

    let client = key_client(server.url());
    let outcome = catalog::load(&client, &CatalogQuery::Popular).await;

    assert!(outcome.needs_credentials());
    match outcome {
        CatalogOutcome::Message { text, is_error, .. } => {
            assert!(is_error);
            assert_eq!(text, "Failed to load movies. 401 Invalid API key");
        }
        other => panic!("expected message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_without_json_body_uses_reason() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/5")
        .with_status(404)
        .with_body("<html>not here</html>")
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let err = client.movie_detail(5).await.unwrap_err();

    assert_eq!(err.to_string(), "404 Not Found");
}

#[tokio::test]
async fn test_invalid_json_is_reported() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/5/videos")
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let err = client.movie_videos(5).await.unwrap_err();

    assert!(matches!(err, TmdbError::InvalidResponse(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_rate_limit_retries_then_fails() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/1")
        .with_status(429)
        .with_header("Retry-After", "0")
        .with_body(r#"{"status_message":"Your request count is over the allowed limit."}"#)
        .expect(3)
        .create_async()
        .await;

    let client = bearer_client(server.url());
    let err = client.movie_detail(1).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.message(), "Your request count is over the allowed limit.");
}
