use reqwest::Client;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use monitor_core::{ApiClient, ClientError, NewKeyword};

fn api_for(server: &MockServer) -> ApiClient {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    ApiClient::new(Client::new(), base)
}

#[tokio::test]
async fn list_keywords_decodes_server_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/keywords/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id":1,"keyword":"rust","is_active":true},
                {"id":2,"keyword":"tokio","is_active":false}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let keywords = api_for(&server).list_keywords().await.unwrap();
    assert_eq!(keywords.len(), 2);
    assert_eq!(keywords[0].keyword, "rust");
    assert!(!keywords[1].is_active);
}

#[tokio::test]
async fn non_2xx_surfaces_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/keywords/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_raw(r#"{"detail":"Keyword already exists"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_keyword(&NewKeyword {
            keyword: "rust".into(),
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Api(message) => assert_eq!(message, "Keyword already exists"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_without_body_falls_back_to_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/keywords/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server).delete_keyword(7).await.unwrap_err();
    match err {
        ClientError::Api(message) => assert_eq!(message, "500 Internal Server Error"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_accepts_204_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rss-feeds/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    api_for(&server).delete_feed(3).await.unwrap();
}

#[tokio::test]
async fn update_keyword_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/keywords/5"))
        .and(body_json(serde_json::json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"id":5,"keyword":"rust","is_active":false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let updated = api_for(&server)
        .update_keyword(
            5,
            &monitor_core::KeywordPatch {
                keyword: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(!updated.is_active);
}

#[tokio::test]
async fn fetch_results_builds_query_with_optional_keywords() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "12"))
        .and(query_param("keywords", "rust,tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"items":[],"current_page":2,"total_pages":0}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let page = api_for(&server)
        .fetch_results(2, 12, Some("rust,tokio"))
        .await
        .unwrap();
    assert_eq!(page.current_page, 2);

    // Without a filter the keywords parameter is omitted entirely.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.query().is_some()));
    Mock::given(method("GET"))
        .and(path("/results/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"items":[],"current_page":1,"total_pages":0}"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    api_for(&server).fetch_results(1, 12, None).await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert!(!last.url.query().unwrap().contains("keywords="));
}
