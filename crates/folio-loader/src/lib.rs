//! Best-effort document body loading.
//!
//! Inline bodies pass through untouched. External bodies are fetched with a
//! single HTTP attempt; on any failure (unreachable host, HTTP error status,
//! unresolvable path) the loader returns the fallback text instead of an
//! error. Callers never have to handle a load failure.

use std::time::Duration;

use ureq::Agent;

use folio_store::{Body, DocumentRecord};

/// Body text used when an external fetch fails.
pub const FALLBACK_TEXT: &str = "Content not available";

/// Loads document bodies, fetching external ones over HTTP.
pub struct ContentLoader {
    agent: Agent,
    base_url: Option<String>,
}

impl ContentLoader {
    /// Create a loader. `base_url` is prepended to relative external paths;
    /// absolute `http(s)://` paths are fetched as-is.
    #[must_use]
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, base_url }
    }

    /// The body text for a record. Never fails: external fetch problems
    /// degrade to [`FALLBACK_TEXT`].
    pub fn load(&self, record: &DocumentRecord) -> String {
        match &record.body {
            Body::Inline(text) => text.clone(),
            Body::External(path) => self
                .fetch(path)
                .unwrap_or_else(|| FALLBACK_TEXT.to_owned()),
        }
    }

    /// Single fetch attempt. No retries by design.
    fn fetch(&self, path: &str) -> Option<String> {
        let Some(url) = self.resolve_url(path) else {
            tracing::warn!(path, "no base URL configured for relative content path");
            return None;
        };

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(url, %error, "content fetch failed");
                return None;
            }
        };

        let status = response.status().as_u16();
        if status >= 400 {
            tracing::warn!(url, status, "content fetch returned error status");
            return None;
        }

        match response.into_body().read_to_string() {
            Ok(text) => Some(text),
            Err(error) => {
                tracing::warn!(url, %error, "content body read failed");
                None
            }
        }
    }

    fn resolve_url(&self, path: &str) -> Option<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_owned());
        }
        let base = self.base_url.as_deref()?;
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Serve one HTTP response on an ephemeral loopback port.
    fn one_shot_server(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}")
    }

    fn record(body: Body) -> DocumentRecord {
        DocumentRecord {
            id: "doc".to_owned(),
            title: "Doc".to_owned(),
            tags: Vec::new(),
            published_at: "2024-12-26".to_owned(),
            summary: String::new(),
            body,
            read_time_minutes: 3,
            featured: false,
            image: None,
        }
    }

    fn loader(base_url: Option<&str>) -> ContentLoader {
        ContentLoader::new(base_url.map(str::to_owned), Duration::from_millis(250))
    }

    #[test]
    fn test_inline_body_passes_through() {
        let text = loader(None).load(&record(Body::Inline("# Hello".to_owned())));
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_relative_path_without_base_url_falls_back() {
        let text = loader(None).load(&record(Body::External("posts/a.md".to_owned())));
        assert_eq!(text, FALLBACK_TEXT);
    }

    #[test]
    fn test_unreachable_host_falls_back() {
        // Port 1 on loopback refuses immediately; no external network needed.
        let text = loader(Some("http://127.0.0.1:1"))
            .load(&record(Body::External("posts/a.md".to_owned())));
        assert_eq!(text, FALLBACK_TEXT);
    }

    #[test]
    fn test_error_status_falls_back() {
        let base = one_shot_server("404 Not Found", "missing");
        let text = loader(Some(&base)).load(&record(Body::External("posts/a.md".to_owned())));
        assert_eq!(text, FALLBACK_TEXT);
    }

    #[test]
    fn test_success_status_returns_body() {
        let base = one_shot_server("200 OK", "# Fetched\n\nBody.");
        let text = loader(Some(&base)).load(&record(Body::External("posts/a.md".to_owned())));
        assert_eq!(text, "# Fetched\n\nBody.");
    }

    #[test]
    fn test_resolve_url_joins_slashes() {
        let loader = loader(Some("https://example.com/content/"));
        assert_eq!(
            loader.resolve_url("/posts/a.md").as_deref(),
            Some("https://example.com/content/posts/a.md")
        );
    }

    #[test]
    fn test_resolve_url_keeps_absolute() {
        let loader = loader(Some("https://example.com"));
        assert_eq!(
            loader.resolve_url("https://other.example/x.md").as_deref(),
            Some("https://other.example/x.md")
        );
    }
}
