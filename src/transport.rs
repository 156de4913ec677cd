//! TLS material loading for the relay endpoint.
//!
//! The relay listens with a server certificate and the parties verify it
//! against a CA certificate; everything past loading the pem files is
//! tonic's concern.

use std::path::Path;

use anyhow::Context;
use tonic::transport::{Certificate, ClientTlsConfig, Identity, ServerTlsConfig};

use crate::SumdResult;

const SERVER_CERT: &str = "server-cert.pem";
const SERVER_KEY: &str = "server-key.pem";
const CA_CERT: &str = "ca-cert.pem";

/// Domain name the server certificate is expected to be issued for.
pub const TLS_DOMAIN: &str = "localhost";

pub fn server_tls_config(certs_dir: &Path) -> SumdResult<ServerTlsConfig> {
    let cert = std::fs::read(certs_dir.join(SERVER_CERT))
        .with_context(|| format!("cannot load server certificate from {:?}", certs_dir))?;
    let key = std::fs::read(certs_dir.join(SERVER_KEY))
        .with_context(|| format!("cannot load server key from {:?}", certs_dir))?;
    Ok(ServerTlsConfig::new().identity(Identity::from_pem(cert, key)))
}

pub fn client_tls_config(certs_dir: &Path) -> SumdResult<ClientTlsConfig> {
    let ca = std::fs::read(certs_dir.join(CA_CERT))
        .with_context(|| format!("cannot load CA certificate from {:?}", certs_dir))?;
    Ok(ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(ca))
        .domain_name(TLS_DOMAIN))
}
