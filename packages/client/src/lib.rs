//! # tabrest-client
//!
//! Blocking client for the Tableau Server REST API.
//!
//! The crate is built around one primitive, [`RequestEngine`], which performs
//! a single authenticated HTTP exchange and classifies the outcome. The
//! resource operations on [`TableauClient`] (sites, projects, users,
//! datasources) are thin wrappers that format a URL and pick the XML
//! envelope they expect back.
//!
//! ## Example
//!
//! ```no_run
//! use tabrest_client::{ClientConfig, TableauClient};
//!
//! # fn main() -> Result<(), tabrest_client::Error> {
//! let config = ClientConfig::new("https://tableau.example.com")
//!     .with_api_version("2.8")
//!     .with_omit_default_site_name(true);
//! let mut client = TableauClient::new(config)?;
//!
//! let credentials = client.sign_in("admin", "secret", "Default", None)?;
//! let site_id = credentials.site.map(|s| s.id).unwrap_or_default();
//!
//! for project in client.query_projects(&site_id)? {
//!     println!("{} {}", project.id, project.name);
//! }
//!
//! client.sign_out()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Error`]. A protocol 404 is [`Error::NotFound`];
//! a server-reported failure is [`Error::Server`] carrying the decoded
//! code and message; payload mismatches are [`Error::Decode`] or
//! [`Error::MalformedErrorBody`] and keep the raw body for inspection.
//!
//! ## TLS
//!
//! Server certificates are not verified. Client certificates are configured
//! with [`ClientIdentity`]; see [`transport`].
//!
//! ## Threads
//!
//! A client holds no locks. Share one across threads only behind your own
//! synchronization.

pub mod api;
pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod models;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::{convert_site_name_to_content_url, DatasourceFileType, TableauClient};
pub use archive::{extract_single_document, ArchiveError};
pub use config::ClientConfig;
pub use engine::RequestEngine;
pub use error::{Error, StatusError};
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use models::*;
pub use transport::{build_client, default_client, ClientIdentity, TransportConfig};
pub use types::{ApiRequest, HttpRequest, HttpResponse, Method};
