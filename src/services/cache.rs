//! Cached-view invalidation for invoice-dashboard.
//!
//! Rendered listing views are cached under `view:<path>`. After a write,
//! the handler invalidates the listing path so the next read recomputes
//! it from current store state.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;

use crate::error::AppError;
use crate::services::metrics::CACHE_INVALIDATIONS_TOTAL;

#[async_trait]
pub trait ViewCache: Send + Sync {
    /// Drop the cached rendering of the view at `path`.
    async fn invalidate(&self, path: &str) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct RedisCache {
    _client: Client,
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn new(url: &str) -> Result<Self, AppError> {
        tracing::info!(url = %url, "Connecting to Redis");
        let client = Client::open(url)?;

        // ConnectionManager reconnects automatically
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            e
        })?;

        tracing::info!("Successfully connected to Redis");

        Ok(Self {
            _client: client,
            manager,
        })
    }
}

#[async_trait]
impl ViewCache for RedisCache {
    async fn health_check(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn invalidate(&self, path: &str) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let key = format!("view:{}", path);

        let removed: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .inspect_err(|_| {
                CACHE_INVALIDATIONS_TOTAL.with_label_values(&["error"]).inc();
            })?;

        CACHE_INVALIDATIONS_TOTAL.with_label_values(&["ok"]).inc();
        debug!(path = %path, removed = removed, "Cached view invalidated");

        Ok(())
    }
}

/// Recording cache for tests.
#[derive(Default)]
pub struct MockCache {
    pub invalidated: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewCache for MockCache {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn invalidate(&self, path: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "mock cache failure for {}",
                path
            )));
        }
        self.invalidated.lock().unwrap().push(path.to_string());
        Ok(())
    }
}
