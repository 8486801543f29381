//! Test helper module for invoice-dashboard integration tests.
//!
//! Drives the router directly with `tower::ServiceExt::oneshot` over the
//! in-memory store and recording cache, so no external services are
//! needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, Utc};
use invoice_dashboard::config::DashboardConfig;
use invoice_dashboard::models::Invoice;
use invoice_dashboard::services::{init_metrics, InvoiceStore, MemoryStore, MockCache, ViewCache};
use invoice_dashboard::startup::{build_router, AppState};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const INVOICES_URI: &str = "/dashboard/invoices";

/// Today's calendar date, as the create handler computes it.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn post_form(router: &Router, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = serde_urlencoded::to_string(fields).expect("Failed to encode form body");
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_empty(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Build a router over an arbitrary store, keeping a handle on the cache.
pub fn router_with_store(store: Arc<dyn InvoiceStore>) -> (Router, Arc<MockCache>) {
    init_metrics();
    let cache = Arc::new(MockCache::new());
    let state = AppState {
        config: DashboardConfig::default(),
        store,
        cache: cache.clone() as Arc<dyn ViewCache>,
    };
    (build_router(state), cache)
}

/// Test application wrapper over the in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MockCache>,
    pub router: Router,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::spawn_with_config(DashboardConfig::default())
    }

    pub fn spawn_with_config(config: DashboardConfig) -> Self {
        init_metrics();
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MockCache::new());
        let state = AppState {
            config,
            store: store.clone() as Arc<dyn InvoiceStore>,
            cache: cache.clone() as Arc<dyn ViewCache>,
        };
        let router = build_router(state);
        Self {
            store,
            cache,
            router,
        }
    }

    pub async fn create(&self, fields: &[(&str, &str)]) -> Response {
        post_form(&self.router, INVOICES_URI, fields).await
    }

    pub async fn update(&self, id: Uuid, fields: &[(&str, &str)]) -> Response {
        post_form(&self.router, &format!("{}/{}", INVOICES_URI, id), fields).await
    }

    pub async fn delete(&self, id: Uuid) -> Response {
        post_empty(&self.router, &format!("{}/{}/delete", INVOICES_URI, id)).await
    }

    /// Snapshot of all persisted invoices.
    pub fn invoices(&self) -> Vec<Invoice> {
        self.store
            .invoices
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }

    pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
        self.store.invoices.lock().unwrap().get(&id).cloned()
    }

    /// Insert a row directly, bypassing the handlers.
    pub fn seed_invoice(
        &self,
        customer_id: &str,
        amount_cents: i64,
        status: &str,
        date: NaiveDate,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.store.invoices.lock().unwrap().insert(
            id,
            Invoice {
                id,
                customer_id: customer_id.to_string(),
                amount_cents,
                status: status.to_string(),
                date,
            },
        );
        id
    }

    /// Paths invalidated so far, in order.
    pub fn invalidations(&self) -> Vec<String> {
        self.cache.invalidated.lock().unwrap().clone()
    }
}
