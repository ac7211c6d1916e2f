//! HostedControlPlane snapshot extraction
//!
//! Reads the handful of `spec` fields Lattice needs from a HyperShift
//! `HostedControlPlane` without binding to its full schema, and fills in the
//! advertise endpoint when the resource leaves it unset.

use std::collections::BTreeMap;
use std::net::IpAddr;

use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use serde_json::Value;
use tracing::{debug, trace};

use crate::defaults::AdvertiseDefaults;
use crate::error::HcpError;
use crate::toleration::{tolerations_from_slice, Toleration};
use crate::unstructured::{kind_of, nested_i64, nested_map, nested_slice, nested_str};
use crate::Result;

/// API group of the HostedControlPlane resource
pub const HOSTED_CONTROL_PLANE_GROUP: &str = "hypershift.openshift.io";

/// API version of the HostedControlPlane resource
pub const HOSTED_CONTROL_PLANE_VERSION: &str = "v1beta1";

/// Kind of the HostedControlPlane resource
pub const HOSTED_CONTROL_PLANE_KIND: &str = "HostedControlPlane";

const CLUSTER_ID: &[&str] = &["spec", "clusterID"];
const CONTROLLER_AVAILABILITY_POLICY: &[&str] = &["spec", "controllerAvailabilityPolicy"];
const NODE_SELECTOR: &[&str] = &["spec", "nodeSelector"];
const TOLERATIONS: &[&str] = &["spec", "tolerations"];
const PRIORITY_CLASS: &[&str] = &["spec", "priorityClass"];
const SERVICE_NETWORK: &[&str] = &["spec", "networking", "serviceNetwork"];
const ADVERTISE_ADDRESS: &[&str] = &["spec", "networking", "apiServer", "advertiseAddress"];
const ADVERTISE_PORT: &[&str] = &["spec", "networking", "apiServer", "port"];

/// Replication stance of the hosted control plane's controllers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AvailabilityPolicy {
    /// Not set on the resource
    #[default]
    Unspecified,
    /// One replica per component
    SingleReplica,
    /// Multiple replicas spread for availability
    HighlyAvailable,
    /// A value this crate does not know, kept verbatim
    Other(String),
}

impl AvailabilityPolicy {
    /// Textual form as written on the resource (empty when unspecified)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::SingleReplica => "SingleReplica",
            Self::HighlyAvailable => "HighlyAvailable",
            Self::Other(s) => s,
        }
    }

    /// Returns true if controllers run with more than one replica
    pub fn is_highly_available(&self) -> bool {
        matches!(self, Self::HighlyAvailable)
    }
}

impl From<&str> for AvailabilityPolicy {
    fn from(s: &str) -> Self {
        match s {
            "" => Self::Unspecified,
            "SingleReplica" => Self::SingleReplica,
            "HighlyAvailable" => Self::HighlyAvailable,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed snapshot of a HostedControlPlane
///
/// Owns all of its data; nothing borrows from the source document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostedControlPlane {
    /// `spec.clusterID`, empty when unset
    pub cluster_id: String,
    /// `spec.controllerAvailabilityPolicy`
    pub controller_availability_policy: AvailabilityPolicy,
    /// `spec.nodeSelector`; `None` when unset, `Some(empty)` for an explicit `{}`
    pub node_selector: Option<BTreeMap<String, String>>,
    /// `spec.tolerations` in source order; `None` when unset or empty
    pub tolerations: Option<Vec<Toleration>>,
    /// `spec.priorityClass`, empty when unset
    pub priority_class: String,
    /// API server advertise address in textual form
    pub advertise_address: String,
    /// API server advertise port
    pub advertise_port: u16,
}

impl HostedControlPlane {
    /// Parse the advertise address, if it is a literal IP
    pub fn advertise_ip(&self) -> Option<IpAddr> {
        self.advertise_address.parse().ok()
    }
}

/// `ApiResource` for HostedControlPlane, for building `Api<DynamicObject>` handles
pub fn hosted_control_plane_api_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(
        HOSTED_CONTROL_PLANE_GROUP,
        HOSTED_CONTROL_PLANE_VERSION,
        HOSTED_CONTROL_PLANE_KIND,
    ))
}

/// Extract a HostedControlPlane from a decoded resource using the well-known defaults
pub fn parse_hosted_control_plane(document: &Value) -> Result<HostedControlPlane> {
    parse_hosted_control_plane_with(document, &AdvertiseDefaults::default())
}

/// Extract a HostedControlPlane from a decoded resource
///
/// Absent fields are defaulted. A present field with the wrong shape fails
/// the whole extraction with `HcpError::MalformedField`; identity strings
/// (`clusterID`, `controllerAvailabilityPolicy`, `priorityClass`) are the
/// exception and read as empty.
pub fn parse_hosted_control_plane_with(
    document: &Value,
    defaults: &AdvertiseDefaults,
) -> Result<HostedControlPlane> {
    if !document.is_object() {
        return Err(HcpError::NotAnObject {
            found: kind_of(document),
        });
    }

    let tolerations = match nested_slice(document, TOLERATIONS).required("spec.tolerations")? {
        Some(items) => tolerations_from_slice(items, "spec.tolerations")?,
        None => None,
    };

    let hcp = HostedControlPlane {
        cluster_id: lenient_string(document, CLUSTER_ID),
        controller_availability_policy: AvailabilityPolicy::from(
            lenient_string(document, CONTROLLER_AVAILABILITY_POLICY).as_str(),
        ),
        node_selector: node_selector(document)?,
        tolerations,
        priority_class: lenient_string(document, PRIORITY_CLASS),
        advertise_address: advertise_address(document, defaults)?,
        advertise_port: advertise_port(document, defaults)?,
    };

    debug!(
        cluster_id = %hcp.cluster_id,
        policy = %hcp.controller_availability_policy,
        advertise_address = %hcp.advertise_address,
        advertise_port = hcp.advertise_port,
        "Parsed HostedControlPlane"
    );
    Ok(hcp)
}

/// Extract a HostedControlPlane from a kube dynamic object
///
/// Objects carrying type metadata for another kind are rejected.
pub fn parse_dynamic_object(obj: &DynamicObject) -> Result<HostedControlPlane> {
    if let Some(types) = &obj.types {
        if types.kind != HOSTED_CONTROL_PLANE_KIND {
            return Err(HcpError::UnexpectedKind {
                kind: types.kind.clone(),
            });
        }
    }
    parse_hosted_control_plane(&obj.data)
}

/// Decode YAML or JSON text and extract a HostedControlPlane from it
pub fn parse_hosted_control_plane_yaml(input: &str) -> Result<HostedControlPlane> {
    let document = crate::yaml::parse_yaml(input)?;
    parse_hosted_control_plane(&document)
}

fn lenient_string(document: &Value, path: &[&str]) -> String {
    let lookup = nested_str(document, path);
    if lookup.is_wrong_type() {
        trace!(field = %path.join("."), "ignoring non-string value");
    }
    lookup.lenient().unwrap_or_default().to_string()
}

fn node_selector(document: &Value) -> Result<Option<BTreeMap<String, String>>> {
    let Some(map) = nested_map(document, NODE_SELECTOR).required("spec.nodeSelector")? else {
        return Ok(None);
    };

    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(HcpError::malformed(
                        format!("spec.nodeSelector.{key}"),
                        "string",
                        kind_of(other),
                    ))
                }
            };
            Ok((key.clone(), value))
        })
        .collect::<Result<BTreeMap<_, _>>>()
        .map(Some)
}

fn service_network_cidrs(document: &Value) -> Result<Vec<&str>> {
    let entries = nested_slice(document, SERVICE_NETWORK)
        .required("spec.networking.serviceNetwork")?
        .unwrap_or_default();
    Ok(entries
        .iter()
        .filter_map(|entry| nested_str(entry, &["cidr"]).lenient())
        .collect())
}

fn advertise_address(document: &Value, defaults: &AdvertiseDefaults) -> Result<String> {
    // Validated even when the address is explicit so a malformed service
    // network always fails extraction.
    let cidrs = service_network_cidrs(document)?;

    if let Some(address) = nested_str(document, ADVERTISE_ADDRESS)
        .required("spec.networking.apiServer.advertiseAddress")?
    {
        return Ok(address.to_string());
    }

    let address = defaults.select_address(cidrs.iter().copied());
    debug!(%address, service_cidrs = ?cidrs, "Defaulting advertise address");
    Ok(address.to_string())
}

fn advertise_port(document: &Value, defaults: &AdvertiseDefaults) -> Result<u16> {
    const FIELD: &str = "spec.networking.apiServer.port";

    match nested_i64(document, ADVERTISE_PORT).required(FIELD)? {
        Some(port) => u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| HcpError::malformed(FIELD, "port in 1..=65535", port.to_string())),
        None => {
            debug!(port = defaults.port, "Defaulting advertise port");
            Ok(defaults.port)
        }
    }
}
