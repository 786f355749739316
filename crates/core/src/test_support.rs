//! In-memory fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::programs::{parse_catalog, CatalogSource, ProgramRecord};
use crate::push::{
    DeliveryError, DeliveryResult, PushMessage, PushResponse, PushTransport, VapidKeys,
    VapidSigner,
};
use crate::subscriptions::PushSubscription;

pub const TEST_PUBLIC_KEY: &str =
    "BHovjLR8gdp0daLCT6Ab0NoN-119msmoDviGtRudvNly4KWQE0fm3O2fhc55ZrMwhrkZQEOC344344iAfDjQ37I";
pub const TEST_PRIVATE_KEY: &str = "Hy49TFtqeYgBI0VniavN7_7cuph2VDIQChssPU5fYHE";

pub fn signer() -> VapidSigner {
    let keys = VapidKeys::from_base64(TEST_PUBLIC_KEY, TEST_PRIVATE_KEY).unwrap();
    VapidSigner::new(keys, "mailto:notifications@example.com").unwrap()
}

pub fn subscription(endpoint: &str) -> PushSubscription {
    PushSubscription::new(endpoint, "BNcRdreALRFXTkOOUHK1", "tBHItJI5svbpez7KI4CCXg")
}

#[derive(Debug, Clone)]
pub enum EndpointBehavior {
    Status(u16),
    Fail(String),
    Hang,
}

/// Records every message and answers per endpoint; unknown endpoints get 201.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<PushMessage>>>,
    behaviors: Arc<Mutex<HashMap<String, EndpointBehavior>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_behavior(&self, endpoint: &str, behavior: EndpointBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), behavior);
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Endpoints that were answered with 2xx, sorted.
    pub fn delivered_endpoints(&self) -> Vec<String> {
        let behaviors = self.behaviors.lock().unwrap();
        let mut endpoints: Vec<String> = self
            .sent()
            .into_iter()
            .map(|m| m.endpoint)
            .filter(|e| match behaviors.get(e) {
                None => true,
                Some(EndpointBehavior::Status(status)) => (200..300).contains(status),
                Some(_) => false,
            })
            .collect();
        endpoints.sort();
        endpoints
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn deliver(&self, message: &PushMessage) -> DeliveryResult<PushResponse> {
        self.sent.lock().unwrap().push(message.clone());
        let behavior = self.behaviors.lock().unwrap().get(&message.endpoint).cloned();
        match behavior {
            None => Ok(PushResponse::new(201)),
            Some(EndpointBehavior::Status(status)) => Ok(PushResponse::new(status)),
            Some(EndpointBehavior::Fail(reason)) => Err(DeliveryError::Transport(reason)),
            Some(EndpointBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// Catalog that serves a scripted sequence of fetch results.
#[derive(Clone, Default)]
pub struct ScriptedCatalog {
    responses: Arc<Mutex<Vec<Result<Vec<ProgramRecord>>>>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful fetch.
    pub fn push(&self, records: Vec<ProgramRecord>) {
        self.responses.lock().unwrap().push(Ok(records));
    }

    /// Queues a fetch that returns `document` as the upstream body.
    pub fn push_document(&self, document: serde_json::Value) {
        self.responses.lock().unwrap().push(parse_catalog(document));
    }

    /// Queues a failed fetch.
    pub fn push_failure(&self) {
        self.responses
            .lock()
            .unwrap()
            .push(Err(Error::Catalog("upstream unavailable".into())));
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::Catalog("no scripted response left".into()));
        }
        responses.remove(0)
    }
}
