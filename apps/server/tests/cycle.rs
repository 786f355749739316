use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use tempfile::tempdir;
use tower::ServiceExt;
use ysws_notifier_core::programs::{CatalogSource, ProgramRecord};
use ysws_notifier_core::push::{DeliveryResult, PushMessage, PushResponse, PushTransport};
use ysws_notifier_core::Result;
use ysws_notifier_server::{api::app_router, build_state_with, scheduler::run_scheduled_cycle};

mod common;

use common::{subscription_json, test_config};

/// Serves whatever catalog the test last set.
#[derive(Clone, Default)]
struct StaticCatalog {
    records: Arc<Mutex<Vec<ProgramRecord>>>,
}

impl StaticCatalog {
    fn set(&self, records: Vec<ProgramRecord>) {
        *self.records.lock().unwrap() = records;
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[derive(Clone, Default)]
struct CollectingTransport {
    sent: Arc<Mutex<Vec<PushMessage>>>,
}

#[async_trait]
impl PushTransport for CollectingTransport {
    async fn deliver(&self, message: &PushMessage) -> DeliveryResult<PushResponse> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(PushResponse::new(201))
    }
}

#[tokio::test]
async fn subscriber_is_notified_only_about_programs_added_after_first_cycle() {
    let data_dir = tempdir().unwrap();
    let config = test_config(data_dir.path());
    let catalog = StaticCatalog::default();
    let transport = CollectingTransport::default();
    let state = build_state_with(
        &config,
        Arc::new(catalog.clone()),
        Arc::new(transport.clone()),
    )
    .await
    .unwrap();
    let router = app_router(state.clone());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/subscribe")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    subscription_json("https://push.example/device-1").to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // First cycle only records the catalog.
    catalog.set(vec![ProgramRecord::new("rec1", "Arcade", 120)]);
    run_scheduled_cycle(&state).await;
    assert!(transport.sent.lock().unwrap().is_empty());

    catalog.set(vec![
        ProgramRecord::new("rec1", "Arcade", 130),
        ProgramRecord::new("rec2", "Highway", 0),
    ]);
    run_scheduled_cycle(&state).await;

    let sent = transport.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint, "https://push.example/device-1");
    let payload: serde_json::Value = serde_json::from_slice(&sent[0].body).unwrap();
    assert_eq!(payload["body"], "1 new program(s) added: Highway");
    assert_eq!(payload["url"], "https://ysws-tracker.pages.dev");

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/programs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let programs: Vec<ProgramRecord> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        programs.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["rec1", "rec2"]
    );
}
