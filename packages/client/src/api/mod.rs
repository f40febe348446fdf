//! Resource operations layered on the [`RequestEngine`].
//!
//! Each operation formats a URL, picks the response envelope it expects and
//! hands both to the engine. Operations are grouped by resource in the
//! submodules; they all extend [`TableauClient`].

mod auth;
mod datasources;
mod projects;
mod sites;
mod users;

pub use datasources::DatasourceFileType;
pub use projects::PAGE_SIZE;
pub use sites::convert_site_name_to_content_url;

use serde::Serialize;

use crate::config::ClientConfig;
use crate::engine::{RequestEngine, APPLICATION_XML, CONTENT_TYPE_HEADER};
use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::ApiRequest;

/// A session with one server.
///
/// `sign_in` is the only operation that needs `&mut self`; it stores the
/// returned token, which every later call sends.
pub struct TableauClient {
    config: ClientConfig,
    engine: RequestEngine,
}

impl TableauClient {
    /// Build the transport described by `config` and wrap it in a client.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let engine = RequestEngine::new(&config.transport, config.debug)?;
        Ok(Self { config, engine })
    }

    /// Use a caller-supplied executor instead of the reqwest transport.
    pub fn with_executor(config: ClientConfig, executor: Box<dyn HttpExecutor>) -> Self {
        let engine = RequestEngine::with_executor(executor, config.debug);
        Self { config, engine }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.engine.auth_token()
    }

    /// Resume a session from a token obtained elsewhere.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.engine.set_auth_token(token);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base(), path)
    }

    fn delete(&self, url: String) -> Result<(), Error> {
        self.engine.execute(ApiRequest::delete(url))?;
        Ok(())
    }
}

fn to_xml<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(quick_xml::se::to_string(value)?.into_bytes())
}

fn xml_post(url: String, payload: Vec<u8>) -> ApiRequest {
    ApiRequest::post(url)
        .with_header(CONTENT_TYPE_HEADER, APPLICATION_XML)
        .with_payload(payload)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::executor::mock::MockExecutor;

    pub const SERVER: &str = "https://tab.example.com";

    pub fn client(mock: &MockExecutor) -> TableauClient {
        TableauClient::with_executor(ClientConfig::new(SERVER), Box::new(mock.clone()))
    }

    pub fn client_with(config: ClientConfig, mock: &MockExecutor) -> TableauClient {
        TableauClient::with_executor(config, Box::new(mock.clone()))
    }

    pub fn api(path: &str) -> String {
        format!("{}/api/2.0/{}", SERVER, path)
    }
}
