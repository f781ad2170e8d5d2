use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn gitss(server: &MockServer) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("gitss")?;
    cmd.env_remove("RUST_LOG").args(["--base-url", &server.uri()]);
    Ok(cmd)
}

#[tokio::test(flavor = "multi_thread")]
async fn search_prints_hits_and_facets() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("q", "main"))
        .and(query_param("o", "acme"))
        .and(query_param("i", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time": 0.5,
            "size": 1,
            "limit": 20,
            "current": 0,
            "next": 0,
            "isLastPage": true,
            "hits": [{
                "organization": "acme",
                "project": "web",
                "repository": "site",
                "branches": ["main"],
                "path": "main.go",
                "ext": ".go",
                "preview": [{"offset": 0, "preview": "package main\n", "hits": [0]}]
            }],
            "facets": {"ext": {"field": "ext", "total": 1, "terms": [{"term": ".go", "count": 1}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    gitss(&server)?
        .args(["search", "main", "--org", "acme"])
        .assert()
        .success()
        .stdout(contains("1 hits in 0.500s (page 1 of 1)"))
        .stdout(contains("acme/web/site:main.go [main]"))
        .stdout(contains("     1: package main"))
        .stdout(contains("ext: .go (1)"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn search_json_is_the_raw_result() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time": 0.1,
            "size": 0,
            "limit": 20,
            "isLastPage": true,
            "hits": []
        })))
        .mount(&server)
        .await;

    let output = gitss(&server)?
        .args(["search", "nothing", "--json"])
        .output()?;
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["size"], json!(0));
    assert_eq!(value["isLastPage"], json!(true));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn search_failure_exits_non_zero() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    gitss(&server)?
        .args(["search", "main"])
        .assert()
        .failure()
        .stderr(contains("search failed"))
        .stderr(contains("502"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn filters_and_indexed_listings() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/filters/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": ["acme"],
            "projects": ["web", "api"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indexed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "lastUpdated": "2024-05-01 10:00:00",
                "organization": "acme",
                "project": "web",
                "repository": "site",
                "branches": {"main": "0a1b2c"},
                "tags": {}
            }]
        })))
        .mount(&server)
        .await;

    gitss(&server)?
        .args(["filters", "acme"])
        .assert()
        .success()
        .stdout("organizations: acme\nprojects: web, api\n");
    gitss(&server)?
        .arg("indexed")
        .assert()
        .success()
        .stdout(contains("acme/web/site (updated 2024-05-01 10:00:00)"))
        .stdout(contains("branch main @ 0a1b2c"));
    Ok(())
}
