//! HTTP agent helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("protein-explorer/", env!("CARGO_PKG_VERSION"));

/// Create a new HTTP agent configured with native-tls and a global timeout.
///
/// Uses the system's TLS library and root certificates.
pub fn agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .build()
        .into()
}
