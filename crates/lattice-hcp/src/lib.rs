//! Typed HostedControlPlane snapshots for Lattice
//!
//! Extracts cluster identity, availability policy, placement constraints and
//! the API server advertise endpoint from an unstructured HyperShift
//! `HostedControlPlane`, defaulting whatever the resource leaves unset.
//! Pure extraction crate, no client or controller logic.
//!
//! # Usage
//!
//! ```rust,ignore
//! let api: Api<DynamicObject> =
//!     Api::namespaced_with(client, namespace, &hosted_control_plane_api_resource());
//! let hcp = parse_dynamic_object(&api.get(name).await?)?;
//! ```

pub mod defaults;
pub mod error;
mod hosted_control_plane;
mod toleration;
pub mod unstructured;
pub mod yaml;

pub use defaults::{
    select_default_address, AdvertiseDefaults, DEFAULT_ADVERTISE_ADDRESS_IPV4,
    DEFAULT_ADVERTISE_ADDRESS_IPV6, DEFAULT_ADVERTISE_PORT,
};
pub use error::HcpError;
pub use hosted_control_plane::{
    hosted_control_plane_api_resource, parse_dynamic_object, parse_hosted_control_plane,
    parse_hosted_control_plane_with, parse_hosted_control_plane_yaml, AvailabilityPolicy,
    HostedControlPlane, HOSTED_CONTROL_PLANE_GROUP, HOSTED_CONTROL_PLANE_KIND,
    HOSTED_CONTROL_PLANE_VERSION,
};
pub use toleration::Toleration;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, HcpError>;
