//! # tabrest-cli
//!
//! Command line front end for `tabrest-client`.
//!
//! ## Usage
//!
//! ```bash
//! export TABREST_USERNAME=admin TABREST_PASSWORD=secret
//!
//! tabrest --server https://tableau.example.com server-info
//! tabrest --server https://tableau.example.com --site Finance projects
//! tabrest --server https://tableau.example.com datasources --name Sales
//! tabrest --server https://tableau.example.com \
//!     datasource-xml --project-id 1f2e3d --name Sales
//! ```
//!
//! A client certificate is picked up from `atscale_http_sslcert` and
//! `atscale_http_sslkey`, with an optional CA bundle in `atscale_ca_file`.

pub mod commands;
pub mod env;
pub mod logging;

pub use commands::{run, Cli, Command};
