//! Error types for the inventory API client.
//!
//! # Design
//! A non-2xx status is a `Request` error carrying the endpoint and status
//! text; it is never retried and never swallowed — callers see it through
//! the read/mutation result shapes. `Http` covers failures of the exchange
//! itself (connection refused, timeout) and `Decode` covers a 2xx body that
//! does not match the expected type.

use thiserror::Error;

/// Errors surfaced by the transport and everything layered on top of it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request to {endpoint} failed: {status} {status_text}")]
    Request {
        endpoint: String,
        status: u16,
        status_text: String,
    },

    /// The HTTP exchange itself failed before a status was received.
    #[error("could not reach {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// True when the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Request { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_endpoint_and_status() {
        let err = ApiError::Request {
            endpoint: "/products/7".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "request to /products/7 failed: 404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn non_404_request_error_is_not_not_found() {
        let err = ApiError::Request {
            endpoint: "/products/".to_string(),
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
