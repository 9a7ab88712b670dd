//! Plain HTTP fetcher.
//!
//! Each attempt builds its own blocking client, so connections never outlive
//! the attempt that opened them. The served markup is static, so there is no
//! client-side rendering to wait for and `Readiness::settle` does not apply.
use log::debug;
use rates_common::{Document, RatesError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::fetcher::{DocumentFetcher, Readiness};

/// Browser-like User-Agent; some sources serve a stripped page to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Fetches the document with a single blocking GET.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher.
    pub fn new() -> Self {
        Self
    }
}

fn fetch_error(err: reqwest::Error, timeout: Duration) -> RatesError {
    if err.is_timeout() {
        RatesError::FetchTimeout(timeout)
    } else {
        RatesError::Fetch(err.to_string())
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str, readiness: &Readiness) -> Result<Document> {
        let client = Client::builder()
            .timeout(readiness.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RatesError::Resource(format!("cannot open HTTP session: {e}")))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e, readiness.timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::Fetch(format!("{url} answered {status}")));
        }
        let body = response
            .text()
            .map_err(|e| fetch_error(e, readiness.timeout))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(Document::new(url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread;

    fn readiness(timeout_ms: u64) -> Readiness {
        Readiness {
            settle: Duration::ZERO,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Serve exactly one connection with `response`, after `delay`.
    fn serve_once(response: String, delay: Duration) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                thread::sleep(delay);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        addr
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn returns_the_served_markup() {
        let body = "<div>GOLD SPOT <span>1</span></div>";
        let addr = serve_once(http_response("200 OK", body), Duration::ZERO);
        let url = format!("http://{addr}/");
        let document = HttpFetcher::new().fetch(&url, &readiness(5_000)).unwrap();
        assert_eq!(document.html(), body);
        assert_eq!(document.url(), url);
    }

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let addr = serve_once(http_response("503 Service Unavailable", "busy"), Duration::ZERO);
        let err = HttpFetcher::new()
            .fetch(&format!("http://{addr}/"), &readiness(5_000))
            .unwrap_err();
        assert!(matches!(err, RatesError::Fetch(ref msg) if msg.contains("503")));
    }

    #[test]
    fn slow_source_hits_the_hard_timeout() {
        let addr = serve_once(http_response("200 OK", "late"), Duration::from_secs(3));
        let err = HttpFetcher::new()
            .fetch(&format!("http://{addr}/"), &readiness(200))
            .unwrap_err();
        assert!(matches!(err, RatesError::FetchTimeout(t) if t == Duration::from_millis(200)));
    }

    #[test]
    fn unreachable_source_is_a_fetch_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let err = HttpFetcher::new()
            .fetch(&format!("http://{addr}/"), &readiness(2_000))
            .unwrap_err();
        assert_eq!(err.kind(), rates_common::error::ErrorKind::Fetch);
    }
}
