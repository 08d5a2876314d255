//! Client-side data access for the product inventory service.
//!
//! # Overview
//! Typed CRUD over a replicated HTTP backend, a keyed query cache that keeps
//! local state consistent after mutations, and tracking of which replica
//! served the last request.
//!
//! # Design
//! - `Transport` issues single-attempt JSON requests and feeds the
//!   `ReplicaTracker` from response headers on every response, success or
//!   failure alike.
//! - `ProductGateway` defines the request/response shapes for the product
//!   entity and propagates transport errors unchanged.
//! - `QueryCache` tracks staleness per key, coalesces concurrent fetches,
//!   and keeps stale data visible next to an error flag on fetch failure.
//! - `ProductStore` is the surface the UI consumes: subscribable reads,
//!   mutations that invalidate the cache, and observable mutation state.
//! - `ReplicaPoller` samples the tracker on a timer and republishes the
//!   last known replica identity.
//!
//! All shared state is explicitly owned and `Arc`-injected; tests wire up
//! isolated instances against a mock server.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod replica;
pub mod store;
pub mod transport;
pub mod types;

pub use cache::{QueryCache, QueryKey, ReadResult};
pub use config::Config;
pub use error::ApiError;
pub use gateway::ProductGateway;
pub use poller::{ReplicaPoller, ReplicaStatus, DEFAULT_POLL_PERIOD};
pub use replica::{ReplicaMetadata, ReplicaTracker};
pub use store::{MutationState, ProductStore};
pub use transport::Transport;
pub use types::{NewProduct, Product};
