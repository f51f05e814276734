//! HTTP access for `get:` and `healthcheck:`.
//!
//! The evaluator only talks to the [`HttpClient`] trait; [`UreqClient`] is
//! the real implementation and tests substitute their own.

use std::io;
use thiserror::Error;

/// Status code and full body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    /// No response was received at all.
    #[error("GET {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Blocking HTTP GET.
///
/// Responses with any status code, including 4xx and 5xx, are returned as
/// `Ok`. Only failures to obtain a response are errors.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new(),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => {
                return Err(HttpError::Transport {
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            }
        };
        let status = response.status();
        let body = response.into_string().map_err(|source| HttpError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(HttpResponse { status, body })
    }
}
