//! Overlay aggregation.
//!
//! Derives the four resolved views — languages, bundle metadata, per-attribute
//! records, and the flagged subset — from a capture base and its ordered
//! overlay list. Each derivation is an independent pure pass over the list.
//!
//! Merge rules: per-language maps (labels, information, metadata fields) are
//! last-write-wins per (language, field); scalar attribute fields (format,
//! standard, character encoding) are first-match-wins. Empty or absent fields
//! never contribute.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::capture_base::CaptureBase;
use crate::overlay::Overlay;

/// Localized bundle-level metadata, one language → value map per field.
///
/// Every map exists even when the bundle has no meta overlays; it is just
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleMetadata {
    /// Credential display name.
    pub name: BTreeMap<String, String>,

    /// Credential description.
    pub description: BTreeMap<String, String>,

    /// Help text shown alongside the credential.
    pub credential_help_text: BTreeMap<String, String>,

    /// Support URL for the credential.
    pub credential_support_url: BTreeMap<String, String>,

    /// Issuer display name.
    pub issuer: BTreeMap<String, String>,

    /// Issuer description.
    pub issuer_description: BTreeMap<String, String>,

    /// Issuer URL.
    pub issuer_url: BTreeMap<String, String>,

    /// Watermark text rendered over the credential.
    pub watermark: BTreeMap<String, String>,
}

/// One capture-base attribute with every display concern merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAttribute {
    /// Attribute name, as declared by the capture base.
    pub name: String,

    /// Declared attribute type.
    #[serde(rename = "type")]
    pub attr_type: String,

    /// Language → descriptive text, from information overlays.
    #[serde(default)]
    pub information: BTreeMap<String, String>,

    /// Language → display label, from label overlays.
    #[serde(default)]
    pub label: BTreeMap<String, String>,

    /// Display/input format, from the first format overlay naming this
    /// attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Character encoding, from the first character encoding overlay naming
    /// this attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_encoding: Option<String>,

    /// Standard identifier, from the first standard overlay naming this
    /// attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
}

/// Collect the languages declared by meta overlays, sorted and deduplicated.
///
/// Other overlay variants never contribute a language, even when they carry
/// one.
pub(crate) fn resolve_languages(overlays: &[Overlay]) -> Vec<String> {
    let mut languages: Vec<String> = overlays
        .iter()
        .filter_map(|overlay| match overlay {
            Overlay::Meta(meta) if !meta.language.is_empty() => Some(meta.language.clone()),
            _ => None,
        })
        .collect();
    languages.sort();
    languages.dedup();
    languages
}

/// Merge meta overlays into per-language metadata maps.
pub(crate) fn resolve_metadata(overlays: &[Overlay]) -> BundleMetadata {
    let mut metadata = BundleMetadata::default();

    for overlay in overlays {
        let Overlay::Meta(meta) = overlay else {
            continue;
        };
        let language = meta.effective_language();

        assign(&mut metadata.name, language, &meta.name);
        assign(&mut metadata.description, language, &meta.description);
        assign(
            &mut metadata.credential_help_text,
            language,
            &meta.credential_help_text,
        );
        assign(
            &mut metadata.credential_support_url,
            language,
            &meta.credential_support_url,
        );
        assign(&mut metadata.issuer, language, &meta.issuer);
        assign(
            &mut metadata.issuer_description,
            language,
            &meta.issuer_description,
        );
        assign(&mut metadata.issuer_url, language, &meta.issuer_url);
        if let Some(watermark) = meta.watermark.as_deref() {
            assign(&mut metadata.watermark, language, watermark);
        }
    }

    metadata
}

// Last-write-wins per (language, field); empty values leave earlier ones
// intact.
fn assign(field: &mut BTreeMap<String, String>, language: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    field.insert(language.to_string(), value.to_string());
}

/// Build one resolved record per capture-base attribute, in declaration
/// order.
pub(crate) fn resolve_attributes(
    capture_base: &CaptureBase,
    overlays: &[Overlay],
) -> Vec<ResolvedAttribute> {
    capture_base
        .attributes
        .iter()
        .map(|(name, attr_type)| resolve_attribute(name, attr_type, overlays))
        .collect()
}

fn resolve_attribute(name: &str, attr_type: &str, overlays: &[Overlay]) -> ResolvedAttribute {
    let mut resolved = ResolvedAttribute {
        name: name.to_string(),
        attr_type: attr_type.to_string(),
        ..ResolvedAttribute::default()
    };

    for overlay in overlays {
        match overlay {
            Overlay::Information(information) => {
                if let Some(text) = information.attribute_information.get(name) {
                    resolved
                        .information
                        .insert(information.effective_language().to_string(), text.clone());
                }
            }
            Overlay::Label(label) => {
                if let Some(text) = label.attribute_labels.get(name) {
                    resolved
                        .label
                        .insert(label.effective_language().to_string(), text.clone());
                }
            }
            Overlay::Format(format) => {
                if resolved.format.is_none() {
                    resolved.format = format.attribute_formats.get(name).cloned();
                }
            }
            Overlay::CharacterEncoding(encoding) => {
                if resolved.character_encoding.is_none() {
                    resolved.character_encoding =
                        encoding.attribute_character_encoding.get(name).cloned();
                }
            }
            Overlay::Standard(standard) => {
                if resolved.standard.is_none() {
                    resolved.standard = standard.attribute_standards.get(name).cloned();
                }
            }
            _ => {}
        }
    }

    resolved
}

/// Filter the resolved attributes down to the capture base's flagged names,
/// preserving attribute order. Flagged names with no matching attribute are
/// ignored.
pub(crate) fn resolve_flagged(
    capture_base: &CaptureBase,
    attributes: &[ResolvedAttribute],
) -> Vec<ResolvedAttribute> {
    attributes
        .iter()
        .filter(|attribute| capture_base.is_flagged(&attribute.name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::overlay::{
        FORMAT_TYPE, INFORMATION_TYPE, LABEL_TYPE, META_TYPE, STANDARD_TYPE,
    };

    fn overlay(value: serde_json::Value) -> Overlay {
        Overlay::from_raw(&value)
    }

    fn capture_base(value: serde_json::Value) -> CaptureBase {
        CaptureBase::from_value(&value).unwrap()
    }

    #[test]
    fn test_languages_sorted_and_deduplicated() {
        let overlays = vec![
            overlay(json!({"type": META_TYPE, "language": "fr"})),
            overlay(json!({"type": META_TYPE, "language": "en"})),
            overlay(json!({"type": META_TYPE, "language": "fr"})),
            // Label languages never contribute.
            overlay(json!({"type": LABEL_TYPE, "language": "de"})),
        ];

        assert_eq!(resolve_languages(&overlays), vec!["en", "fr"]);
    }

    #[test]
    fn test_languages_skip_empty() {
        let overlays = vec![overlay(json!({"type": META_TYPE, "name": "Card"}))];
        assert!(resolve_languages(&overlays).is_empty());
    }

    #[test]
    fn test_metadata_last_write_wins() {
        let overlays = vec![
            overlay(json!({"type": META_TYPE, "name": "A", "issuer": "DMV"})),
            overlay(json!({"type": META_TYPE, "name": "B"})),
        ];

        let metadata = resolve_metadata(&overlays);
        assert_eq!(metadata.name.get("en").map(String::as_str), Some("B"));
        // The second overlay's empty issuer leaves the first value intact.
        assert_eq!(metadata.issuer.get("en").map(String::as_str), Some("DMV"));
    }

    #[test]
    fn test_metadata_per_language() {
        let overlays = vec![
            overlay(json!({"type": META_TYPE, "language": "en", "name": "Licence"})),
            overlay(json!({"type": META_TYPE, "language": "fr", "name": "Permis"})),
        ];

        let metadata = resolve_metadata(&overlays);
        assert_eq!(metadata.name.get("en").map(String::as_str), Some("Licence"));
        assert_eq!(metadata.name.get("fr").map(String::as_str), Some("Permis"));
        assert!(metadata.description.is_empty());
    }

    #[test]
    fn test_metadata_watermark() {
        let overlays = vec![overlay(
            json!({"type": META_TYPE, "language": "en", "watermark": "SPECIMEN"}),
        )];

        let metadata = resolve_metadata(&overlays);
        assert_eq!(
            metadata.watermark.get("en").map(String::as_str),
            Some("SPECIMEN")
        );
    }

    #[test]
    fn test_attributes_follow_capture_base_order() {
        let capture_base = capture_base(json!({
            "attributes": {"surname": "Text", "given_names": "Text", "age": "Numeric"}
        }));

        let attributes = resolve_attributes(&capture_base, &[]);
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["surname", "given_names", "age"]);
        assert_eq!(attributes[2].attr_type, "Numeric");
    }

    #[test]
    fn test_attribute_labels_last_write_wins_per_language() {
        let capture_base = capture_base(json!({"attributes": {"name": "Text"}}));
        let overlays = vec![
            overlay(json!({
                "type": LABEL_TYPE,
                "language": "en",
                "attribute_labels": {"name": "Name"}
            })),
            overlay(json!({
                "type": LABEL_TYPE,
                "language": "en",
                "attribute_labels": {"name": "Full name"}
            })),
            overlay(json!({
                "type": LABEL_TYPE,
                "language": "fr",
                "attribute_labels": {"name": "Nom"}
            })),
        ];

        let attributes = resolve_attributes(&capture_base, &overlays);
        assert_eq!(
            attributes[0].label.get("en").map(String::as_str),
            Some("Full name")
        );
        assert_eq!(attributes[0].label.get("fr").map(String::as_str), Some("Nom"));
    }

    #[test]
    fn test_scalar_fields_first_match_wins() {
        let capture_base = capture_base(json!({"attributes": {"age": "Numeric"}}));
        let overlays = vec![
            overlay(json!({"type": FORMAT_TYPE, "attribute_formats": {"age": "number"}})),
            overlay(json!({"type": FORMAT_TYPE, "attribute_formats": {"age": "integer"}})),
            overlay(json!({"type": STANDARD_TYPE, "attribute_standards": {"age": "urn:iso:1"}})),
        ];

        let attributes = resolve_attributes(&capture_base, &overlays);
        assert_eq!(attributes[0].format.as_deref(), Some("number"));
        assert_eq!(attributes[0].standard.as_deref(), Some("urn:iso:1"));
        assert_eq!(attributes[0].character_encoding, None);
    }

    #[test]
    fn test_scalar_skips_overlays_without_entry() {
        let capture_base = capture_base(json!({"attributes": {"age": "Numeric"}}));
        // The first format overlay names a different attribute; the second
        // must still fill `age`.
        let overlays = vec![
            overlay(json!({"type": FORMAT_TYPE, "attribute_formats": {"name": "utf-8"}})),
            overlay(json!({"type": FORMAT_TYPE, "attribute_formats": {"age": "integer"}})),
        ];

        let attributes = resolve_attributes(&capture_base, &overlays);
        assert_eq!(attributes[0].format.as_deref(), Some("integer"));
    }

    #[test]
    fn test_information_default_language() {
        let capture_base = capture_base(json!({"attributes": {"name": "Text"}}));
        let overlays = vec![overlay(json!({
            "type": INFORMATION_TYPE,
            "attribute_information": {"name": "Legal name"}
        }))];

        let attributes = resolve_attributes(&capture_base, &overlays);
        assert_eq!(
            attributes[0].information.get("en").map(String::as_str),
            Some("Legal name")
        );
    }

    #[test]
    fn test_flagged_filter_preserves_attribute_order() {
        let capture_base = capture_base(json!({
            "attributes": {"name": "Text", "age": "Numeric", "photo": "Binary"},
            // Flag order differs from attribute order on purpose.
            "flagged_attributes": ["photo", "age", "ghost"]
        }));

        let attributes = resolve_attributes(&capture_base, &[]);
        let flagged = resolve_flagged(&capture_base, &attributes);
        let names: Vec<&str> = flagged.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["age", "photo"]);
    }

    #[test]
    fn test_flagged_empty_when_no_flags() {
        let capture_base = capture_base(json!({"attributes": {"name": "Text"}}));
        let attributes = resolve_attributes(&capture_base, &[]);
        assert!(resolve_flagged(&capture_base, &attributes).is_empty());
    }
}
