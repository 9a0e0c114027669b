//! Tests for the http module functionality.

use portal_fetch::http::{build_inner_client, with_middleware, HttpClientConfig};
use portal_fetch::PortalConfig;

use reqwest::header::{HeaderMap, HeaderValue};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

#[tokio::test]
async fn test_client_sends_user_agent_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("user-agent", "portal-test"))
        .and(header("x-portal", "yes"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-portal", HeaderValue::from_static("yes"));
    let config = HttpClientConfig {
        headers: Some(headers),
        user_agent: Some("portal-test".into()),
        ..HttpClientConfig::default()
    };
    let client = with_middleware(build_inner_client(&config).unwrap(), 0);

    let res = client
        .get(format!("{}/ping", server.uri()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 204);
}

#[tokio::test]
async fn test_portal_headers_reach_file_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .and(header("x-portal", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY_A))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-portal", HeaderValue::from_static("yes"));
    let portal = PortalConfig {
        headers: Some(headers),
        ..portal(&server)
    };
    let session = portal_fetch::SessionHandle::anonymous(&portal).unwrap();

    let res = session.get(session.resolve("/a").unwrap()).await.unwrap();
    assert_eq!(res.text().await.unwrap(), BODY_A);
}
