//! Tracking of which backend replica served the last request.
//!
//! # Design
//! The backend sits behind replicated infrastructure that stamps every
//! response with two optional headers. `ReplicaTracker` stores the last
//! observed value of each, following a last-known-good policy: a response
//! missing a header leaves the previously stored value in place rather than
//! clearing it, so a transient omission never blanks the UI.
//!
//! The tracker is an explicitly owned instance shared via `Arc` with the
//! transport and the poller, not an ambient singleton; tests construct
//! isolated instances.

use parking_lot::Mutex;
use reqwest::header::HeaderMap;

/// Header naming the replica that handled the request.
pub const REPLICA_ID_HEADER: &str = "X-Replica-ID";
/// Header naming the upstream target the request was routed to.
pub const UPSTREAM_SERVER_HEADER: &str = "X-Upstream-Server";

/// Last-observed replica metadata. Both fields start out unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicaMetadata {
    pub replica_id: Option<String>,
    pub upstream_server: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReplicaTracker {
    metadata: Mutex<ReplicaMetadata>,
}

impl ReplicaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record replica metadata from a response's headers. Both fields are
    /// updated under one lock acquisition so readers never observe a
    /// half-applied pair. Absent or non-UTF-8 headers leave the stored
    /// value untouched.
    pub fn record_from(&self, headers: &HeaderMap) {
        let replica_id = header_string(headers, REPLICA_ID_HEADER);
        let upstream_server = header_string(headers, UPSTREAM_SERVER_HEADER);

        let mut metadata = self.metadata.lock();
        if replica_id.is_some() {
            metadata.replica_id = replica_id;
        }
        if upstream_server.is_some() {
            metadata.upstream_server = upstream_server;
        }
    }

    /// Identifier of the replica that served the most recent request, if
    /// any response has carried the header yet.
    pub fn last_replica_id(&self) -> Option<String> {
        self.metadata.lock().replica_id.clone()
    }

    /// Upstream server the most recent request was routed to, if known.
    pub fn last_upstream_server(&self) -> Option<String> {
        self.metadata.lock().upstream_server.clone()
    }

    /// Both fields as one consistent pair.
    pub fn snapshot(&self) -> ReplicaMetadata {
        self.metadata.lock().clone()
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(replica: Option<&str>, upstream: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(replica) = replica {
            map.insert(REPLICA_ID_HEADER, HeaderValue::from_str(replica).unwrap());
        }
        if let Some(upstream) = upstream {
            map.insert(UPSTREAM_SERVER_HEADER, HeaderValue::from_str(upstream).unwrap());
        }
        map
    }

    #[test]
    fn starts_with_no_metadata() {
        let tracker = ReplicaTracker::new();
        assert_eq!(tracker.last_replica_id(), None);
        assert_eq!(tracker.last_upstream_server(), None);
    }

    #[test]
    fn records_both_headers() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), Some("10.0.0.1:8000")));
        assert_eq!(tracker.last_replica_id().as_deref(), Some("r1"));
        assert_eq!(tracker.last_upstream_server().as_deref(), Some("10.0.0.1:8000"));
    }

    #[test]
    fn later_response_overwrites_previous_values() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), Some("a")));
        tracker.record_from(&headers(Some("r2"), Some("b")));
        assert_eq!(tracker.last_replica_id().as_deref(), Some("r2"));
        assert_eq!(tracker.last_upstream_server().as_deref(), Some("b"));
    }

    #[test]
    fn absent_header_keeps_last_known_value() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), Some("a")));
        tracker.record_from(&headers(None, None));
        assert_eq!(tracker.last_replica_id().as_deref(), Some("r1"));
        assert_eq!(tracker.last_upstream_server().as_deref(), Some("a"));
    }

    #[test]
    fn fields_update_independently() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), None));
        tracker.record_from(&headers(None, Some("b")));
        assert_eq!(tracker.last_replica_id().as_deref(), Some("r1"));
        assert_eq!(tracker.last_upstream_server().as_deref(), Some("b"));
    }

    #[test]
    fn non_utf8_header_value_is_ignored() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), None));

        let mut map = HeaderMap::new();
        map.insert(REPLICA_ID_HEADER, HeaderValue::from_bytes(b"\xff\xfe").unwrap());
        tracker.record_from(&map);

        assert_eq!(tracker.last_replica_id().as_deref(), Some("r1"));
    }

    #[test]
    fn snapshot_returns_the_pair() {
        let tracker = ReplicaTracker::new();
        tracker.record_from(&headers(Some("r1"), Some("a")));
        assert_eq!(
            tracker.snapshot(),
            ReplicaMetadata {
                replica_id: Some("r1".to_string()),
                upstream_server: Some("a".to_string()),
            }
        );
    }
}
