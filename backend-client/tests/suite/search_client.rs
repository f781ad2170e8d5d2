use gitss_backend_client::ClientError;
use gitss_backend_client::ClientOptions;
use gitss_backend_client::SearchBackend;
use gitss_backend_client::SearchClient;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FacetKey;
use gitss_protocol::FilterParams;
use gitss_protocol::Term;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn client_for(server: &MockServer) -> SearchClient {
    SearchClient::new(ClientOptions {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

#[tokio::test]
async fn search_sends_encoded_filters_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("q", "fn main"))
        .and(query_param("i", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time": 0.5,
            "size": 42,
            "limit": 20,
            "current": 1,
            "next": 2,
            "isLastPage": false,
            "hits": [],
            "facets": {
                "ext": {"field": "ext", "terms": [{"term": ".go", "count": 10}]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = FilterParams::with_query("fn main");
    params.push_value(FacetKey::Ext, ".go");
    params.push_value(FacetKey::Ext, ".rs");
    let result = client_for(&server)
        .search(&params, 1)
        .await
        .expect("search result");

    assert_eq!(result.size, 42);
    assert_eq!(
        result.facets.expect("facets")["ext"].terms,
        vec![Term::new(".go", 10)]
    );
    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(
        requests[0].url.query(),
        Some("q=fn%20main&x=.go&x=.rs&i=1")
    );
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&FilterParams::with_query("x"), 0)
        .await
        .expect_err("status error");
    match err {
        ClientError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "search");
            assert_eq!(status, 500);
            assert_eq!(body, "index unavailable");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"size\": \"many\""))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&FilterParams::with_query("x"), 0)
        .await
        .expect_err("decode error");
    assert!(matches!(err, ClientError::Decode { endpoint: "search", .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Nothing listens on the discard port.
    let client = SearchClient::new(ClientOptions {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    })
    .expect("client");
    let err = client
        .search(&FilterParams::with_query("x"), 0)
        .await
        .expect_err("transport error");
    assert!(matches!(err, ClientError::Transport { .. }));
}

#[tokio::test]
async fn filters_are_scoped_by_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/filters/acme/web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": ["acme"],
            "projects": ["web"],
            "repositories": ["site", "docs"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let scope = BaseFilterParams {
        organization: Some("acme".to_string()),
        project: Some("web".to_string()),
        ..Default::default()
    };
    let filters = client_for(&server)
        .fetch_filters(&scope)
        .await
        .expect("filters");
    assert_eq!(filters.repositories, vec!["site", "docs"]);
    assert!(filters.branches.is_empty());
}

#[tokio::test]
async fn indexed_list_and_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indexed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "lastUpdated": "2024-01-01 00:00:00 JST",
                "organization": "acme",
                "project": "web",
                "repository": "site",
                "branches": {"main": "0a1b2c"},
                "tags": {}
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.3.0",
            "commitHash": "deadbeef"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let indexed = client.indexed().await.expect("indexed");
    assert_eq!(indexed.len(), 1);
    assert_eq!(indexed[0].branches.get("main").map(String::as_str), Some("0a1b2c"));

    let version = client.version().await.expect("version");
    assert_eq!(version.commit_hash, "deadbeef");
}
