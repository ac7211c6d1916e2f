//! Toleration records read from `spec.tolerations`

use serde_json::Value;

use crate::error::HcpError;
use crate::unstructured::{kind_of, nested_i64, nested_str};
use crate::Result;

/// Kubernetes toleration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Toleration {
    pub key: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
    pub effect: Option<String>,
    /// Seconds a `NoExecute` taint is tolerated; `None` means forever
    pub toleration_seconds: Option<i64>,
}

impl Toleration {
    /// Read one toleration from the element at `field`
    ///
    /// String fields and `tolerationSeconds` may be absent. Anything present
    /// with the wrong shape fails the whole element.
    pub(crate) fn from_value(value: &Value, field: &str) -> Result<Self> {
        if !value.is_object() {
            return Err(HcpError::malformed(field, "object", kind_of(value)));
        }

        let string = |name: &str| -> Result<Option<String>> {
            Ok(nested_str(value, &[name])
                .required(&format!("{field}.{name}"))?
                .map(str::to_string))
        };

        Ok(Self {
            key: string("key")?,
            operator: string("operator")?,
            value: string("value")?,
            effect: string("effect")?,
            toleration_seconds: nested_i64(value, &["tolerationSeconds"])
                .required(&format!("{field}.tolerationSeconds"))?,
        })
    }
}

/// Read a toleration sequence, preserving source order
///
/// An empty sequence reads as `None`, the same as an absent one.
pub(crate) fn tolerations_from_slice(
    items: &[Value],
    field: &str,
) -> Result<Option<Vec<Toleration>>> {
    if items.is_empty() {
        return Ok(None);
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Toleration::from_value(item, &format!("{field}[{i}]")))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
