//! Typed server runtime configuration.

use std::net::SocketAddr;
use std::time::Duration;

use irr_project::Installation;

use crate::error::{ServerError, ServerResult};

/// Runtime settings derived from the installation file's `server` section.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub namespace_uri: String,
    pub update_interval: Duration,
}

impl ServerConfig {
    pub fn from_installation(installation: &Installation) -> ServerResult<Self> {
        let listen = installation
            .server
            .listen
            .parse()
            .map_err(|source| ServerError::ListenAddr {
                addr: installation.server.listen.clone(),
                source,
            })?;
        Ok(Self {
            listen,
            namespace_uri: installation.server.namespace_uri.clone(),
            update_interval: Duration::from_secs(installation.server.update_interval_s),
        })
    }
}
