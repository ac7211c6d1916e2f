//! Decoding of serialized resources into unstructured documents
//!
//! Uses yaml-rust2 for parsing and converts into `serde_json::Value`, the
//! form the extractor walks. JSON input parses as YAML.

use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

use crate::error::HcpError;
use crate::Result;

/// Parse a YAML or JSON string into a `serde_json::Value`.
///
/// For multi-document YAML, returns only the first document.
/// Returns `Value::Null` for empty input.
pub fn parse_yaml(input: &str) -> Result<Value> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| HcpError::decode(e.to_string()))?;
    match docs.into_iter().next() {
        Some(doc) => yaml_to_json(doc),
        None => Ok(Value::Null),
    }
}

fn yaml_to_json(yaml: Yaml) -> Result<Value> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e: std::num::ParseFloatError| HcpError::decode(e.to_string()))?;
            // Overflowing literals such as 1e400 parse to infinity, which has
            // no JSON form. Mapping them to null would read as absent.
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| HcpError::decode(format!("non-finite float {s}")))
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(arr) => arr
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Real(r) => r,
                    Yaml::Boolean(b) => b.to_string(),
                    Yaml::Null => "null".to_string(),
                    _ => return Err(HcpError::decode("unsupported YAML key type")),
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>>>()
            .map(Value::Object),
        Yaml::Alias(_) => Err(HcpError::decode("YAML aliases not supported")),
        Yaml::BadValue => Err(HcpError::decode("bad YAML value")),
    }
}
