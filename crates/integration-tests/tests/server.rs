//! Real HTTP requests against a server bound to a local port.

#![allow(clippy::unwrap_used)]

use greeter_core::PageRequest;
use greeter_web::db::VisitorStore;
use reqwest::{Client, StatusCode};

use greeter_integration_tests::{memory_app, spawn_server};

#[tokio::test]
async fn test_greeting_counts_over_http() {
    let (app, _) = memory_app();
    let addr = spawn_server(app).await.unwrap();
    let client = Client::new();

    for _ in 0..2 {
        let resp = client
            .get(format!("http://{addr}/greet/Alice"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .get(format!("http://{addr}/greet?name=Alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("3 visits so far"));
}

#[tokio::test]
async fn test_concurrent_greetings_over_http() {
    let (app, store) = memory_app();
    let addr = spawn_server(app).await.unwrap();
    let client = Client::new();

    let requests: Vec<_> = (0..10)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .get(format!("http://{addr}/greet/Crowd"))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap(), StatusCode::OK);
    }

    let page = store.find_all(PageRequest::default()).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].visit_count, 10);
}

#[tokio::test]
async fn test_health_over_http() {
    let (app, _) = memory_app();
    let addr = spawn_server(app).await.unwrap();

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}
