//! Network configuration for the lanchat libp2p layer.
//!
//! Lives here rather than in `lanchat-types` so the shared types crate
//! does not pull in `libp2p::Multiaddr`.

use std::net::Ipv4Addr;

use libp2p::multiaddr::Protocol;
use libp2p::Multiaddr;

use lanchat_types::{LanchatError, Result};

/// Network-layer configuration.
#[derive(Clone, Debug)]
pub struct P2pConfig {
    /// Rendezvous tag peers must share to find each other. Enforced
    /// through the identify protocol version string.
    pub rendezvous: String,

    /// Multiaddrs this node listens on. Defaults to an OS-assigned
    /// TCP port and an OS-assigned QUIC port on all interfaces.
    pub listen_addrs: Vec<Multiaddr>,

    /// Seconds before an idle connection is closed by the swarm.
    pub idle_timeout_secs: u64,

    /// Seconds before an outstanding metadata request is aborted.
    pub metadata_timeout_secs: u64,

    /// Interval of the stale-peer sweep, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for P2pConfig {
    fn default() -> Self {
        let tcp = Multiaddr::empty()
            .with(Protocol::Ip4(Ipv4Addr::UNSPECIFIED))
            .with(Protocol::Tcp(0));
        let quic = Multiaddr::empty()
            .with(Protocol::Ip4(Ipv4Addr::UNSPECIFIED))
            .with(Protocol::Udp(0))
            .with(Protocol::QuicV1);

        Self {
            rendezvous: "lanchat".to_string(),
            listen_addrs: vec![tcp, quic],
            idle_timeout_secs: 60,
            metadata_timeout_secs: 5,
            sweep_interval_secs: 30,
        }
    }
}

impl P2pConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.rendezvous.is_empty() {
            return Err(LanchatError::ConfigError {
                reason: "rendezvous tag must not be empty".into(),
            });
        }
        if self.listen_addrs.is_empty() {
            return Err(LanchatError::ConfigError {
                reason: "at least one listen address is required".into(),
            });
        }
        if self.metadata_timeout_secs == 0 {
            return Err(LanchatError::ConfigError {
                reason: "metadata_timeout_secs must be greater than 0".into(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(LanchatError::ConfigError {
                reason: "sweep_interval_secs must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(P2pConfig::default().validate().is_ok());
    }

    #[test]
    fn default_listens_on_tcp_and_quic() {
        let config = P2pConfig::default();
        assert_eq!(config.listen_addrs.len(), 2);
        assert!(config.listen_addrs[0].to_string().contains("tcp"));
        assert!(config.listen_addrs[1].to_string().contains("quic"));
    }

    #[test]
    fn empty_rendezvous_rejected() {
        let config = P2pConfig {
            rendezvous: String::new(),
            ..P2pConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_listen_addrs_rejected() {
        let config = P2pConfig {
            listen_addrs: Vec::new(),
            ..P2pConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
