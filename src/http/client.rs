use super::debug::{
    HttpDebugConfig, redact_header_value, redact_text_body, redact_url, truncate_for_log,
};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Debug log lines are tagged with the client's label and a running exchange number,
/// so a multi-turn session reads as `[http-debug gemini/<model> #3] > POST ...`.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    debug: HttpDebugConfig,
    sink: LogSink,
    label: Option<String>,
    exchanges: Arc<AtomicU64>,
}

#[derive(Clone)]
enum LogSink {
    Stderr,
    #[cfg(test)]
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("debug", &self.debug)
            .field("label", &self.label)
            .finish()
    }
}

impl HttpClient {
    pub fn new(inner: Client, debug: HttpDebugConfig) -> Self {
        Self {
            inner,
            debug,
            sink: LogSink::Stderr,
            label: None,
            exchanges: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn next_log_prefix(&self) -> String {
        let exchange = self.exchanges.fetch_add(1, Ordering::Relaxed) + 1;
        log_prefix(self.label.as_deref(), exchange)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        payload: &T,
    ) -> Result<HttpResponseData, reqwest::Error> {
        let request = self.inner.post(url).query(query).json(payload).build()?;
        let prefix = self.next_log_prefix();
        if self.debug.enabled {
            let body_json = serde_json::to_string(payload)
                .unwrap_or_else(|err| format!("{{\"_serialization_error\":\"{err}\"}}"));
            for line in request_log_lines(self.debug, &prefix, &request, &body_json) {
                self.log_line(line);
            }
        }

        let response = match self.inner.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                if self.debug.enabled {
                    self.log_line(format!("{prefix} ! {err}"));
                }
                return Err(err);
            }
        };
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.debug.enabled {
            for line in response_log_lines(self.debug, &prefix, status, &headers, &body) {
                self.log_line(line);
            }
        }

        Ok(HttpResponseData { status, body })
    }

    fn log_line(&self, line: String) {
        match &self.sink {
            LogSink::Stderr => {
                let mut stderr = io::stderr().lock();
                let _ = writeln!(stderr, "{line}");
            }
            #[cfg(test)]
            LogSink::Buffer(buffer) => {
                if let Ok(mut b) = buffer.lock() {
                    b.push(line);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn with_buffer_sink(
        inner: Client,
        debug: HttpDebugConfig,
    ) -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let client = Self {
            inner,
            debug,
            sink: LogSink::Buffer(Arc::clone(&buffer)),
            label: None,
            exchanges: Arc::new(AtomicU64::new(0)),
        };
        (client, buffer)
    }
}

fn log_prefix(label: Option<&str>, exchange: u64) -> String {
    match label {
        Some(label) => format!("[http-debug {label} #{exchange}]"),
        None => format!("[http-debug #{exchange}]"),
    }
}

fn request_log_lines(
    debug: HttpDebugConfig,
    prefix: &str,
    request: &reqwest::Request,
    body_json: &str,
) -> Vec<String> {
    let url = redact_url(request.url(), debug.redact_secrets);
    let body = redact_text_body(body_json, debug.redact_secrets);
    let body = truncate_for_log(&body, debug.max_body_chars);

    let mut lines = Vec::new();
    lines.push(format!("{prefix} > {} {}", request.method(), url));
    for (name, value) in request.headers() {
        lines.push(format!(
            "{prefix} > {}: {}",
            name.as_str(),
            redact_header_value(name.as_str(), value, debug.redact_secrets)
        ));
    }
    lines.push(format!("{prefix} >"));
    append_body_lines(&mut lines, prefix, '>', &body);
    lines
}

fn response_log_lines(
    debug: HttpDebugConfig,
    prefix: &str,
    status: u16,
    headers: &reqwest::header::HeaderMap,
    body: &str,
) -> Vec<String> {
    let body = redact_text_body(body, debug.redact_secrets);
    let body = truncate_for_log(&body, debug.max_body_chars);

    let mut lines = Vec::new();
    lines.push(format!("{prefix} < HTTP {status}"));
    for (name, value) in headers {
        lines.push(format!(
            "{prefix} < {}: {}",
            name.as_str(),
            redact_header_value(name.as_str(), value, debug.redact_secrets)
        ));
    }
    lines.push(format!("{prefix} <"));
    append_body_lines(&mut lines, prefix, '<', &body);
    lines
}

fn append_body_lines(lines: &mut Vec<String>, prefix: &str, direction: char, body: &str) {
    if body.is_empty() {
        lines.push(format!("{prefix} {direction} <empty body>"));
        return;
    }

    for line in body.lines() {
        lines.push(format!("{prefix} {direction} {line}"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: String,
}
