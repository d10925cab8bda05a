use reqwest::Url;
use reqwest::header::HeaderValue;
use serde_json::Value;

const REDACTION: &str = "***REDACTED***";
const DEFAULT_MAX_BODY_CHARS: usize = 4_000;
const SENSITIVE_KEYS: [&str; 8] = [
    "key",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "authorization",
    "x-api-key",
    "x-goog-api-key",
];

/// Controls the `--verbose` request/response dump written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    pub redact_secrets: bool,
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            enabled: verbose,
            redact_secrets: true,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
        }
    }

    pub fn disabled() -> Self {
        Self::from_verbose(false)
    }
}

pub fn redact_url(url: &Url, enable_redaction: bool) -> String {
    if !enable_redaction || url.query().is_none() {
        return url.as_str().to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let shown = if is_sensitive_key(&k) {
                REDACTION.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), shown)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.as_str().to_string()
}

pub fn redact_header_value(name: &str, value: &HeaderValue, enable_redaction: bool) -> String {
    if enable_redaction && is_sensitive_key(name) {
        return REDACTION.to_string();
    }

    value
        .to_str()
        .map(ToString::to_string)
        .unwrap_or_else(|_| "<non-utf8>".to_string())
}

/// Masks sensitive keys at any depth of a JSON body. Non-JSON text is returned as is.
pub fn redact_text_body(raw: &str, enable_redaction: bool) -> String {
    if !enable_redaction {
        return raw.to_string();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(mut json) => {
            redact_json_value(&mut json);
            serde_json::to_string(&json).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let count = input.chars().count();
    if count <= max_chars {
        return input.to_string();
    }

    let truncated = input.chars().take(max_chars).collect::<String>();
    format!("{truncated}... <truncated {} chars>", count - max_chars)
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                if is_sensitive_key(key) {
                    *item = Value::String(REDACTION.to_string());
                } else {
                    redact_json_value(item);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(key))
}
