//! Host network stack
//!
//! The link is "up" when the feed host resolves; the client is a blocking
//! reqwest client rebuilt whenever the requested connect timeout changes.

use std::fmt;
use std::net::ToSocketAddrs;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use transit_hal::{HttpClient, LinkConfig, NetworkLink, Request, Response};

/// Whole-request timeout, on top of the connect timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Link errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// URL has no usable host
    InvalidUrl(String),
    /// Host did not resolve before the timeout
    Unreachable { host: String, waited_ms: u128 },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "no host in URL {url}"),
            Self::Unreachable { host, waited_ms } => {
                write!(f, "{host} unreachable after {waited_ms} ms")
            }
        }
    }
}

impl std::error::Error for LinkError {}

/// Host and port of an absolute or scheme-less URL
///
/// The port defaults to 443 for `https://` and 80 otherwise.
pub fn parse_authority(url: &str) -> Option<(String, u16)> {
    let (rest, default_port) = if let Some(rest) = url.strip_prefix("https://") {
        (rest, 443)
    } else if let Some(rest) = url.strip_prefix("http://") {
        (rest, 80)
    } else {
        (url, 80)
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();

    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        // IPv6 literal
        let (host, tail) = bracketed.split_once(']')?;
        let port = match tail.strip_prefix(':') {
            Some(port) => port.parse().ok()?,
            None => default_port,
        };
        (host, port)
    } else {
        match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()?),
            None => (authority, default_port),
        }
    };

    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}

/// Link that is up while the feed host resolves
pub struct HostLink {
    host: String,
    port: u16,
    config: LinkConfig,
}

impl HostLink {
    /// Link for the host named in `url`
    pub fn for_url(url: &str, config: LinkConfig) -> Result<Self, LinkError> {
        let (host, port) =
            parse_authority(url).ok_or_else(|| LinkError::InvalidUrl(url.to_string()))?;
        Ok(Self { host, port, config })
    }

    fn resolves(&self) -> bool {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map(|mut addrs| addrs.next().is_some())
            .unwrap_or(false)
    }
}

impl NetworkLink for HostLink {
    type Error = LinkError;

    fn is_connected(&self) -> bool {
        self.resolves()
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        let timeout = Duration::from_millis(u64::from(self.config.connect_timeout_ms));
        let poll = Duration::from_millis(u64::from(self.config.poll_interval_ms));
        let started = Instant::now();

        info!(host = %self.host, port = self.port, "waiting for network");
        loop {
            if self.resolves() {
                debug!(elapsed_ms = started.elapsed().as_millis(), "network up");
                return Ok(());
            }
            if started.elapsed() >= timeout {
                let err = LinkError::Unreachable {
                    host: self.host.clone(),
                    waited_ms: started.elapsed().as_millis(),
                };
                warn!(%err, "network connect timed out");
                return Err(err);
            }
            thread::sleep(poll);
        }
    }
}

/// Blocking HTTP client on reqwest
pub struct ReqwestClient {
    connect_timeout_ms: u32,
    client: Client,
}

impl ReqwestClient {
    /// Client with an initial connect timeout
    pub fn new(connect_timeout_ms: u32) -> Result<Self, reqwest::Error> {
        Ok(Self {
            connect_timeout_ms,
            client: build_client(connect_timeout_ms)?,
        })
    }

    fn client_for(&mut self, connect_timeout_ms: u32) -> Result<&Client, reqwest::Error> {
        if connect_timeout_ms != self.connect_timeout_ms {
            self.client = build_client(connect_timeout_ms)?;
            self.connect_timeout_ms = connect_timeout_ms;
        }
        Ok(&self.client)
    }
}

fn build_client(connect_timeout_ms: u32) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_millis(u64::from(connect_timeout_ms)))
        .timeout(REQUEST_TIMEOUT)
        .build()
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    fn get(&mut self, request: &Request<'_>) -> Result<Response, reqwest::Error> {
        let client = self.client_for(request.connect_timeout_ms)?;

        let mut builder = client.get(request.url);
        for (name, value) in request.headers {
            builder = builder.header(*name, *value);
        }

        let response = builder.send().map_err(|e| {
            warn!(url = request.url, error = %e, "request failed");
            e
        })?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!(url = request.url, status, bytes = body.len(), "response received");

        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_with_port() {
        assert_eq!(
            parse_authority("http://192.168.1.20:8000/"),
            Some(("192.168.1.20".to_string(), 8000))
        );
    }

    #[test]
    fn test_authority_default_ports() {
        assert_eq!(
            parse_authority("http://feed.local/board?x=1"),
            Some(("feed.local".to_string(), 80))
        );
        assert_eq!(
            parse_authority("https://api.example.org/v1"),
            Some(("api.example.org".to_string(), 443))
        );
        assert_eq!(
            parse_authority("feed.local"),
            Some(("feed.local".to_string(), 80))
        );
    }

    #[test]
    fn test_authority_ipv6() {
        assert_eq!(
            parse_authority("http://[::1]:8000/"),
            Some(("::1".to_string(), 8000))
        );
    }

    #[test]
    fn test_authority_rejects_garbage() {
        assert_eq!(parse_authority("http:///path"), None);
        assert_eq!(parse_authority("http://host:port/"), None);
    }

    #[test]
    fn test_link_for_bad_url() {
        assert!(matches!(
            HostLink::for_url("http://", LinkConfig::default()),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_localhost_link_is_up() {
        let link = HostLink::for_url("http://127.0.0.1:8000/", LinkConfig::default()).unwrap();
        assert!(link.is_connected());
    }
}
