//! End-to-end HTTP tests: a real server on an ephemeral port, backed by a
//! mocked upstream feed.

use std::net::SocketAddr;
use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::Value;
use tokio::net::TcpListener;

use gallery_bridge::config::BridgeConfig;
use gallery_bridge::feed::client::GalleryFeedClient;
use gallery_bridge::server::{self, AppState};
use gallery_bridge::service::spawn::TokioSpawn;
use gallery_bridge::service::synthesizer::RegistrationService;
use gallery_bridge::store::memory::MemoryStore;

const FEED_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
    <feed xmlns="http://www.w3.org/2005/Atom"
          xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices"
          xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
        <entry>
            <title type="text">Pester</title>
            <content type="application/zip" src="https://example.org/api/v2/package/Pester/5.5.0"/>
            <m:properties>
                <d:Version>5.5.0</d:Version>
                <d:Tags>testing bdd</d:Tags>
                <d:IsLatestVersion m:type="Edm.Boolean">true</d:IsLatestVersion>
            </m:properties>
        </entry>
        <entry>
            <title type="text">Pester</title>
            <content type="application/zip" src="https://example.org/api/v2/package/Pester/5.4.1"/>
            <m:properties>
                <d:Version>5.4.1</d:Version>
            </m:properties>
        </entry>
        <entry>
            <title type="text">Pester</title>
            <content type="application/zip" src="https://example.org/api/v2/package/Pester/5.4.0"/>
            <m:properties>
                <d:Version>5.4.0</d:Version>
            </m:properties>
        </entry>
    </feed>"#;

const EMPTY_FEED_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
    <feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;

/// Serves the bridge over the given upstream on an ephemeral port and returns
/// its address.
async fn spawn_bridge(upstream: &ServerGuard) -> SocketAddr {
    let feed = Arc::new(GalleryFeedClient::new(&upstream.url()));
    let store = Arc::new(MemoryStore::new());
    let service =
        RegistrationService::new(feed, store, Arc::new(TokioSpawn), &BridgeConfig::default());
    let state = Arc::new(AppState::new(service, None));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> reqwest::Response {
    reqwest::get(format!("http://{addr}{path}")).await.unwrap()
}

#[tokio::test]
async fn service_index_advertises_registrations_resource() {
    let upstream = Server::new_async().await;
    let addr = spawn_bridge(&upstream).await;

    let response = get(addr, "/index.json").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["version"], "3.0.0");
    assert_eq!(body["resources"][0]["@type"], "RegistrationsBaseUrl/3.6.0");
    assert_eq!(body["resources"][0]["@id"], format!("http://{addr}"));
}

#[tokio::test]
async fn registration_index_is_served_with_request_derived_ids() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::UrlEncoded("id".into(), "'Pester'".into()))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(FEED_BODY)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    let response = get(addr, "/Pester/index.json").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["cache-control"].to_str().unwrap(),
        "max-age=86400"
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["@id"], format!("http://{addr}/Pester/index.json"));
    assert_eq!(body["count"], 2);
    // The singleton "latest" page is inlined, "recent" is a stub
    assert_eq!(
        body["items"][0]["@id"],
        format!("http://{addr}/Pester/index.json#page/latest")
    );
    assert_eq!(body["items"][0]["items"][0]["catalogEntry"]["version"], "5.5.0");
    assert_eq!(
        body["items"][1]["@id"],
        format!("http://{addr}/Pester/page/recent.json")
    );
    assert!(body["items"][1].get("items").is_none());
}

#[tokio::test]
async fn inlined_page_is_served_as_standalone_document() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(FEED_BODY)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    let response = get(addr, "/Pester/page/latest.json").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["catalogEntry"]["version"], "5.5.0");
}

#[tokio::test]
async fn stubbed_page_deep_link_hits_the_store() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(FEED_BODY)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    let response = get(addr, "/Pester/page/recent.json").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(
        body["parent"],
        format!("http://{addr}/Pester/index.json")
    );
}

#[tokio::test]
async fn unknown_page_name_is_a_404() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(FEED_BODY)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    assert_eq!(get(addr, "/Pester/page/guessed.json").await.status(), 404);
    // Pages without the .json suffix do not exist either
    assert_eq!(get(addr, "/Pester/page/latest").await.status(), 404);
}

#[tokio::test]
async fn missing_package_is_a_404() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(EMPTY_FEED_BODY)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    let response = get(addr, "/DoesNotExist/index.json").await;
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "synthesis_failed");
    assert!(body["error"].as_str().unwrap().contains("DoesNotExist"));
}

#[tokio::test]
async fn upstream_status_passes_through() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("GET", "/FindPackagesById()")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    let addr = spawn_bridge(&upstream).await;

    assert_eq!(get(addr, "/Pester/index.json").await.status(), 503);
}
