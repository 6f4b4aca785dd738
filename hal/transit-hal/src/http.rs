//! HTTP client abstractions
//!
//! Provides a blocking GET suitable for a single-threaded device loop.
//! The whole body is returned in an owned buffer; callers own it for
//! exactly one fetch attempt.

use alloc::vec::Vec;

/// HTTP 200 OK
pub const STATUS_OK: u16 = 200;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_MS: u32 = 5_000;

/// Extra request header (name, value)
pub type Header<'a> = (&'a str, &'a str);

/// GET request description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Absolute URL including scheme
    pub url: &'a str,
    /// Additional headers
    pub headers: &'a [Header<'a>],
    /// TCP connect timeout
    pub connect_timeout_ms: u32,
}

impl<'a> Request<'a> {
    /// Create a GET request with no extra headers
    pub const fn get(url: &'a str) -> Self {
        Self {
            url,
            headers: &[],
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }

    /// Attach extra headers
    pub const fn with_headers(mut self, headers: &'a [Header<'a>]) -> Self {
        self.headers = headers;
        self
    }

    /// Override the connect timeout
    pub const fn with_connect_timeout(mut self, timeout_ms: u32) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }
}

/// Completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl Response {
    /// Check for HTTP 200
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Blocking HTTP client
///
/// `Err` means the request could not be sent or the response could not be
/// received (transport failure). Any received status, successful or not,
/// is `Ok`.
pub trait HttpClient {
    /// Error type for transport failures
    type Error;

    /// Perform a GET request
    fn get(&mut self, request: &Request<'_>) -> Result<Response, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let headers = [("x-apikey", "secret")];
        let request = Request::get("http://example.test/")
            .with_headers(&headers)
            .with_connect_timeout(1_000);

        assert_eq!(request.url, "http://example.test/");
        assert_eq!(request.headers, &[("x-apikey", "secret")]);
        assert_eq!(request.connect_timeout_ms, 1_000);
    }

    #[test]
    fn test_request_defaults() {
        let request = Request::get("http://example.test/");
        assert!(request.headers.is_empty());
        assert_eq!(request.connect_timeout_ms, DEFAULT_CONNECT_TIMEOUT_MS);
    }

    #[test]
    fn test_response_status() {
        let ok = Response {
            status: 200,
            body: Vec::new(),
        };
        let missing = Response {
            status: 404,
            body: Vec::new(),
        };
        assert!(ok.is_ok());
        assert!(!missing.is_ok());
    }
}
