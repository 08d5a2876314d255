//! Product store: the read/mutate surface consumed by the UI layer.
//!
//! # Design
//! Wires the gateway and the query cache together. Reads go through the
//! cache under `QueryKey::Products`; every successful mutation invalidates
//! that key so the next read refetches. Mutations also publish a
//! `MutationState` on a watch channel, giving view code the
//! pending/error/error-message triple without holding the returned future.

use std::sync::Arc;

use tokio::sync::watch;

use crate::cache::{QueryCache, QueryKey, ReadResult};
use crate::error::ApiError;
use crate::gateway::ProductGateway;
use crate::types::{NewProduct, Product};

/// Observable state of a mutation: pending, settled ok, or settled with an
/// error message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub is_pending: bool,
    pub is_error: bool,
    pub error: Option<String>,
}

impl MutationState {
    fn pending() -> Self {
        Self {
            is_pending: true,
            is_error: false,
            error: None,
        }
    }

    fn from_result<T>(result: &Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => Self::default(),
            Err(err) => Self {
                is_pending: false,
                is_error: true,
                error: Some(err.to_string()),
            },
        }
    }
}

pub struct ProductStore {
    gateway: Arc<ProductGateway>,
    cache: QueryCache<Vec<Product>>,
    create_state: watch::Sender<MutationState>,
    remove_state: watch::Sender<MutationState>,
}

impl ProductStore {
    pub fn new(gateway: Arc<ProductGateway>) -> Self {
        let (create_state, _) = watch::channel(MutationState::default());
        let (remove_state, _) = watch::channel(MutationState::default());
        Self {
            gateway,
            cache: QueryCache::new(),
            create_state,
            remove_state,
        }
    }

    /// Subscribe to the product collection, fetching through the cache when
    /// it is not fresh.
    pub fn products(&self) -> watch::Receiver<ReadResult<Vec<Product>>> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .read(QueryKey::Products, async move { gateway.list().await })
    }

    /// Create a product and, on success, mark the cached collection stale.
    pub async fn create(&self, input: NewProduct) -> Result<Product, ApiError> {
        // send_replace keeps the state observable even when nobody has
        // subscribed yet; a plain send would discard it with no receivers.
        self.create_state.send_replace(MutationState::pending());
        let result = self.gateway.create(&input).await;
        self.create_state.send_replace(MutationState::from_result(&result));
        if result.is_ok() {
            self.cache.invalidate(QueryKey::Products);
        }
        result
    }

    /// Delete a product by id and, on success, mark the cached collection
    /// stale. A failed delete leaves the cache untouched — there is no
    /// optimistic removal.
    pub async fn remove(&self, id: i64) -> Result<Product, ApiError> {
        self.remove_state.send_replace(MutationState::pending());
        let result = self.gateway.remove(id).await;
        self.remove_state.send_replace(MutationState::from_result(&result));
        if result.is_ok() {
            self.cache.invalidate(QueryKey::Products);
        }
        result
    }

    /// Fire-and-forget variant of [`create`](Self::create); the outcome is
    /// observable through [`create_state`](Self::create_state).
    pub fn spawn_create(self: Arc<Self>, input: NewProduct) {
        tokio::spawn(async move {
            let _ = self.create(input).await;
        });
    }

    /// Fire-and-forget variant of [`remove`](Self::remove).
    pub fn spawn_remove(self: Arc<Self>, id: i64) {
        tokio::spawn(async move {
            let _ = self.remove(id).await;
        });
    }

    pub fn create_state(&self) -> watch::Receiver<MutationState> {
        self.create_state.subscribe()
    }

    pub fn remove_state(&self) -> watch::Receiver<MutationState> {
        self.remove_state.subscribe()
    }
}
