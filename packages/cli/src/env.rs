//! Client identity from the process environment.

use std::ffi::OsString;
use std::path::PathBuf;

use tabrest_client::ClientIdentity;

pub const SSL_CERT_VAR: &str = "atscale_http_sslcert";
pub const SSL_KEY_VAR: &str = "atscale_http_sslkey";
pub const CA_FILE_VAR: &str = "atscale_ca_file";

/// Read the client certificate settings once, at startup.
pub fn identity_from_env() -> Option<ClientIdentity> {
    identity_from_lookup(|name| std::env::var_os(name))
}

/// Identity from an arbitrary variable lookup.
///
/// Unset and empty variables are treated alike. Without both a certificate
/// and a key there is no identity, and the CA bundle alone is ignored.
pub fn identity_from_lookup<F>(lookup: F) -> Option<ClientIdentity>
where
    F: Fn(&str) -> Option<OsString>,
{
    let path = |name: &str| lookup(name).filter(|v| !v.is_empty()).map(PathBuf::from);

    let cert = path(SSL_CERT_VAR)?;
    let key = path(SSL_KEY_VAR)?;

    let identity = ClientIdentity::new(cert, key);
    Some(match path(CA_FILE_VAR) {
        Some(ca) => identity.with_ca(ca),
        None => identity,
    })
}
