use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const SEARCH_PATH: &str = "/api/search";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("Invalid response from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Search backend is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub keyword: &'a str,
}

/// Body returned by the search endpoint. Every field is optional on the wire;
/// error payloads usually carry only `status` and `message`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub trait SearchBackend: Send + Sync {
    fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError>;
}

pub struct HttpBackend {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(HttpBackend {
            client,
            url: search_url(endpoint),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SearchBackend for HttpBackend {
    fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError> {
        info!("POST {} keyword='{}'", self.url, keyword);

        let response = self
            .client
            .post(&self.url)
            .json(&SearchRequest { keyword })
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        debug!("Search endpoint answered {} ({} bytes)", status, body.len());

        decode_response(status, &body)
    }
}

pub fn search_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), SEARCH_PATH)
}

/// Non-2xx answers become `SearchError::Status`, preferring the server's
/// `message` and falling back to the bare status code.
pub fn decode_response(status: u16, body: &str) -> Result<SearchResponse, SearchError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error {}", status));
        return Err(SearchError::Status {
            code: status,
            message,
        });
    }

    Ok(serde_json::from_str(body)?)
}
