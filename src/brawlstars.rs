use std::fmt::Formatter;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::Settings;

pub mod battlelog;

pub type BrawlStarsResult<T> = Result<T, BrawlStarsError>;

/// Structured error body the API sends along with a failed request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientError {
    pub reason: String,
    pub message: String,
    pub error_type: String,
    pub detail: Map<String, Value>,
}

impl ClientError {
    /// Only JSON objects carrying a `message` key count as a client error.
    pub fn parse(body: &str) -> Option<ClientError> {
        let value: Value = serde_json::from_str(body).ok()?;
        let object = value.as_object()?;
        if !object.contains_key("message") {
            return None;
        }

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        Some(ClientError {
            reason: text("reason"),
            message: text("message"),
            error_type: text("type"),
            detail: object
                .get("detail")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

#[derive(Error, Debug)]
pub enum BrawlStarsError {
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        client_error: Option<ClientError>,
    },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON decode error")]
    JsonDecode(#[source] serde_json::Error),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl BrawlStarsError {
    pub fn from_http(status: u16, body: &str) -> BrawlStarsError {
        let client_error = if body.is_empty() {
            None
        } else {
            ClientError::parse(body)
        };

        let message = match &client_error {
            Some(e) if !e.message.is_empty() => e.message.clone(),
            _ => format!("HTTP {}", status),
        };

        BrawlStarsError::Http {
            status,
            message,
            client_error,
        }
    }

    /// HTTP status of the failed request, 0 if the error didn't come from an HTTP response
    pub fn status_code(&self) -> u16 {
        match self {
            BrawlStarsError::Http { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            BrawlStarsError::Http { client_error, .. } => client_error.as_ref(),
            _ => None,
        }
    }

    /// The single line shown to the user below the error banner
    pub fn display_line(&self) -> String {
        let status = self.status_code();
        if status == 0 {
            return self.message();
        }

        match self.client_error() {
            Some(client_error) if !client_error.message.is_empty() => {
                format!("{} {}", status, client_error.message)
            }
            _ => format!("{} {}", status, self.message()),
        }
    }
}

/// Player tag as typed by the user, without the leading `#`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTag(String);

impl PlayerTag {
    pub fn new(input: &str) -> PlayerTag {
        PlayerTag(input.trim().to_owned())
    }

    /// Tag as it appears in battle data, `#` included
    pub fn full(&self) -> String {
        format!("#{}", self.0)
    }

    /// Tag as it goes into a request path
    pub fn encoded(&self) -> String {
        format!("%23{}", self.0)
    }
}

impl std::fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full())
    }
}

/// Decodes a response body, first as JSON, then into the expected shape.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> BrawlStarsResult<T> {
    let value: Value = serde_json::from_str(body).map_err(BrawlStarsError::JsonDecode)?;
    serde_json::from_value::<T>(value).map_err(|e| BrawlStarsError::Unexpected(e.to_string()))
}

pub fn request<T: DeserializeOwned>(settings: &Settings, endpoint: &str) -> BrawlStarsResult<T> {
    info!("Requesting from endpoint {}", endpoint);

    let url = format!("{}/{}", settings.api_url, endpoint);
    let response = Client::new()
        .get(&url)
        .bearer_auth(&settings.api_key)
        .send()?;

    let status = response.status();
    let body = response.text()?;
    debug!("{} answered with {} ({} bytes)", endpoint, status, body.len());

    if !status.is_success() {
        return Err(BrawlStarsError::from_http(status.as_u16(), &body));
    }

    parse_body(&body)
}
