use std::time::Duration;

use crate::transport::{ClientIdentity, TransportConfig};

pub const DEFAULT_API_VERSION: &str = "2.0";
pub const DEFAULT_SITE_NAME: &str = "Default";
pub const DEFAULT_BOUNDARY: &str = "813e3160-3c2b-4e9b-a6d5-4c5a9b8e7f01";

/// Settings for a [`TableauClient`](crate::TableauClient).
///
/// Everything here is fixed once the client is built; only the session
/// token changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://tableau.example.com`
    pub server: String,

    /// REST API version segment, e.g. `2.0`
    pub api_version: String,

    /// Trace every request and response at debug level
    pub debug: bool,

    pub default_site_name: String,

    /// Send an empty site name when signing in to the default site
    pub omit_default_site_name: bool,

    /// Multipart boundary used when publishing
    pub boundary: String,

    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            debug: false,
            default_site_name: DEFAULT_SITE_NAME.to_string(),
            omit_default_site_name: false,
            boundary: DEFAULT_BOUNDARY.to_string(),
            transport: TransportConfig::default(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_default_site_name(mut self, name: impl Into<String>) -> Self {
        self.default_site_name = name.into();
        self
    }

    pub fn with_omit_default_site_name(mut self, omit: bool) -> Self {
        self.omit_default_site_name = omit;
        self
    }

    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = boundary.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read_write: Duration) -> Self {
        self.transport.connect_timeout = connect;
        self.transport.read_write_timeout = read_write;
        self
    }

    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.transport.identity = Some(identity);
        self
    }

    /// `{server}/api/{version}`
    pub fn api_base(&self) -> String {
        format!("{}/api/{}", self.server, self.api_version)
    }
}
