//! The seam between the engine and the network.
//!
//! The engine prepares requests and classifies responses; an executor only
//! moves bytes. Tests swap in [`mock::MockExecutor`] to avoid the network.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::transport::{build_client, TransportConfig};
use crate::types::{HttpRequest, HttpResponse};

/// One buffered HTTP exchange.
///
/// Implementations must buffer the entire body before returning and must
/// not retry.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Executor backed by a blocking reqwest client built once.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let method: http::Method = request.method.into();

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())?;
            let header_value = HeaderValue::try_from(value.as_str())?;
            headers.append(header_name, header_value);
        }

        let mut req_builder = self.client.request(method, &request.url).headers(headers);

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let response = req_builder.send()?;

        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse::new(status, body))
    }
}
