//! The authenticated request/response engine.
//!
//! Every catalog operation funnels through [`RequestEngine::execute`]: one
//! HTTP exchange, fully buffered, classified into success or one of the
//! [`Error`] variants.

use serde::de::DeserializeOwned;

use crate::error::{Error, StatusError};
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::models::ErrorResponse;
use crate::transport::TransportConfig;
use crate::types::{ApiRequest, HttpRequest, HttpResponse};

/// Session header carrying the sign-in token.
pub const AUTH_HEADER: &str = "X-Tableau-Auth";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const CONTENT_LENGTH_HEADER: &str = "Content-Length";
pub const APPLICATION_XML: &str = "application/xml";

const NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Executes requests on behalf of one signed-in (or not yet signed-in) session.
///
/// The engine holds no locks. Setting the token needs `&mut self`, so within
/// one thread the borrow checker keeps sign-in apart from requests; sharing
/// an engine across threads needs external synchronization.
pub struct RequestEngine {
    executor: Box<dyn HttpExecutor>,
    auth_token: Option<String>,
    debug: bool,
}

impl RequestEngine {
    /// Build the transport once from `config` and keep it for every call.
    pub fn new(config: &TransportConfig, debug: bool) -> Result<Self, Error> {
        Ok(Self::with_executor(
            Box::new(ReqwestExecutor::new(config)?),
            debug,
        ))
    }

    pub fn with_executor(executor: Box<dyn HttpExecutor>, debug: bool) -> Self {
        Self {
            executor,
            auth_token: None,
            debug,
        }
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Replace the session token. Empty tokens clear the session.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.auth_token = if token.is_empty() { None } else { Some(token) };
    }

    /// Perform one exchange and return the raw success body.
    pub fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, Error> {
        let url = request.url.trim().to_string();
        let prepared = self.prepare(request);

        if self.debug {
            tracing::debug!(method = %prepared.method, url = %prepared.url, "sending request");
            if let Some(body) = &prepared.body {
                tracing::debug!(payload = %String::from_utf8_lossy(body), "request payload");
            }
        }

        let response = self.executor.execute(&prepared)?;

        if self.debug {
            tracing::debug!(
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "response"
            );
        }

        classify(&url, response)
    }

    /// Perform one exchange and decode the success body into `T`.
    pub fn execute_xml<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        let body = self.execute(request)?;
        decode(body)
    }

    fn prepare(&self, request: ApiRequest) -> HttpRequest {
        let mut headers = Vec::with_capacity(request.headers.len() + 2);

        let body = request.payload.filter(|payload| !payload.is_empty());
        if let Some(payload) = &body {
            headers.push((CONTENT_LENGTH_HEADER.to_string(), payload.len().to_string()));
        }

        headers.extend(request.headers);

        if let Some(token) = &self.auth_token {
            if self.debug {
                tracing::debug!("{}:{}", AUTH_HEADER, token);
            }
            headers.push((AUTH_HEADER.to_string(), token.clone()));
        }

        HttpRequest {
            method: request.method,
            url: request.url.trim().to_string(),
            headers,
            body,
        }
    }
}

/// Map a buffered response onto the success body or an error.
///
/// Order matters: 404 is checked before the general error range.
pub(crate) fn classify(url: &str, response: HttpResponse) -> Result<Vec<u8>, Error> {
    if response.status == 404 {
        return Err(Error::NotFound(StatusError {
            code: 404,
            message: NOT_FOUND_MESSAGE.to_string(),
            url: url.to_string(),
        }));
    }

    if response.status >= 300 {
        let body = response.body;
        let parsed = std::str::from_utf8(&body)
            .map_err(|e| quick_xml::DeError::Custom(e.to_string()))
            .and_then(quick_xml::de::from_str::<ErrorResponse>);
        return Err(match parsed {
            Ok(envelope) => Error::Server {
                status: response.status,
                error: envelope.error,
                body,
            },
            Err(source) => Error::MalformedErrorBody {
                status: response.status,
                body,
                source,
            },
        });
    }

    Ok(response.body)
}

fn decode<T: DeserializeOwned>(body: Vec<u8>) -> Result<T, Error> {
    let parsed = std::str::from_utf8(&body)
        .map_err(|e| quick_xml::DeError::Custom(e.to_string()))
        .and_then(quick_xml::de::from_str::<T>);
    match parsed {
        Ok(value) => Ok(value),
        Err(source) => Err(Error::Decode { body, source }),
    }
}
