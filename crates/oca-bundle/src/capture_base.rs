//! Capture base model.
//!
//! The capture base is the display-independent schema a bundle's overlays
//! decorate: an ordered attribute dictionary plus the names the schema flags
//! as sensitive. Attribute order in the source document is load-bearing
//! downstream (resolved attributes keep it), so `serde_json` is compiled
//! with `preserve_order`.

use serde_json::Value;

use crate::error::{BundleError, BundleResult};

/// The attribute schema underlying an overlay bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureBase {
    /// Classification string (e.g., a schema taxonomy code).
    pub classification: String,

    /// Attribute name → declared type, in document order. Names are unique.
    pub attributes: Vec<(String, String)>,

    /// Names of flagged (sensitive) attributes. May reference names absent
    /// from `attributes`; no integrity is enforced.
    pub flagged_attributes: Vec<String>,

    /// Content digest of the capture base record.
    pub digest: Option<String>,
}

impl CaptureBase {
    /// Build a capture base from a raw record.
    ///
    /// This is the engine's only fatal parse: a record that is not a JSON
    /// object (or whose `attributes` field is not an object) cannot anchor a
    /// bundle. Everything else is permissive — absent fields default to
    /// empty, and non-string attribute types are kept in their JSON text
    /// form.
    pub fn from_value(value: &Value) -> BundleResult<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| BundleError::MalformedCaptureBase {
                reason: "capture base is not an object".to_string(),
            })?;

        let attributes = match record.get("attributes") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, declared)| (name.clone(), type_string(declared)))
                .collect(),
            Some(_) => {
                return Err(BundleError::MalformedCaptureBase {
                    reason: "attributes is not an object".to_string(),
                })
            }
        };

        let flagged_attributes = record
            .get("flagged_attributes")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            classification: record
                .get("classification")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            attributes,
            flagged_attributes,
            digest: record
                .get("digest")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }

    /// The declared type of an attribute, if it exists.
    pub fn attribute_type(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, declared)| declared.as_str())
    }

    /// Whether an attribute name is in the flagged list.
    pub fn is_flagged(&self, name: &str) -> bool {
        self.flagged_attributes.iter().any(|flagged| flagged == name)
    }
}

fn type_string(declared: &Value) -> String {
    match declared {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
