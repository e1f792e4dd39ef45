//! Runtime configuration
//!
//! The listening address is the only setting taken from the environment:
//! `PRICE_AGGREGATOR_LISTEN_ADDR` (full socket address) wins over `PORT`,
//! which binds on all interfaces.

use crate::{constants::DEFAULT_PORT, error::ConfigError};
use std::net::{Ipv4Addr, SocketAddr};

const LISTEN_ADDR_VAR: &str = "PRICE_AGGREGATOR_LISTEN_ADDR";
const PORT_VAR: &str = "PORT";

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(LISTEN_ADDR_VAR).ok(),
            std::env::var(PORT_VAR).ok(),
        )
    }

    fn from_vars(listen_addr: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        if let Some(addr) = listen_addr.filter(|a| !a.trim().is_empty()) {
            let listen_addr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: LISTEN_ADDR_VAR,
                    value: addr.clone(),
                })?;
            return Ok(Self { listen_addr });
        }

        let port = match port.filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: PORT_VAR,
                    value: raw.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        }
    }
}
