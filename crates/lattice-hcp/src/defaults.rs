//! Advertise endpoint defaults
//!
//! When a HostedControlPlane does not pin its API server advertise endpoint,
//! the address family follows the service network: any IPv6 service CIDR
//! selects the IPv6 default, otherwise the IPv4 default applies. The port
//! default does not depend on the address family.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::IpNetwork;
use serde::Deserialize;

/// Default API server port advertised when `spec.networking.apiServer.port` is unset
pub const DEFAULT_ADVERTISE_PORT: u16 = 6443;

/// Default IPv4 advertise address
pub const DEFAULT_ADVERTISE_ADDRESS_IPV4: Ipv4Addr = Ipv4Addr::new(172, 20, 0, 1);

/// Default IPv6 advertise address (`fd00::1`)
pub const DEFAULT_ADVERTISE_ADDRESS_IPV6: Ipv6Addr =
    Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1);

/// Advertise endpoint defaults applied during extraction
///
/// Deserializable so an embedding operator can carry overrides in its own
/// configuration. Omitted keys keep the well-known values.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvertiseDefaults {
    /// Address used when no service CIDR is IPv6
    pub ipv4_address: Ipv4Addr,
    /// Address used when at least one service CIDR is IPv6
    pub ipv6_address: Ipv6Addr,
    /// Port used when none is set
    pub port: u16,
}

impl Default for AdvertiseDefaults {
    fn default() -> Self {
        Self {
            ipv4_address: DEFAULT_ADVERTISE_ADDRESS_IPV4,
            ipv6_address: DEFAULT_ADVERTISE_ADDRESS_IPV6,
            port: DEFAULT_ADVERTISE_PORT,
        }
    }
}

impl AdvertiseDefaults {
    /// Pick the default advertise address for the given service network CIDRs
    pub fn select_address<'a>(
        &self,
        service_cidrs: impl IntoIterator<Item = &'a str>,
    ) -> IpAddr {
        if service_cidrs.into_iter().any(is_ipv6_cidr) {
            IpAddr::V6(self.ipv6_address)
        } else {
            IpAddr::V4(self.ipv4_address)
        }
    }
}

/// Pick the well-known default advertise address for the given service CIDRs
pub fn select_default_address<'a>(service_cidrs: impl IntoIterator<Item = &'a str>) -> IpAddr {
    AdvertiseDefaults::default().select_address(service_cidrs)
}

/// Returns true if `cidr` parses as an `address/prefix` IPv6 network
///
/// Bare addresses without a prefix length are not CIDRs and never match.
pub fn is_ipv6_cidr(cidr: &str) -> bool {
    if !cidr.contains('/') {
        return false;
    }
    matches!(cidr.trim().parse::<IpNetwork>(), Ok(IpNetwork::V6(_)))
}
