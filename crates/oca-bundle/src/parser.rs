//! Bundle document parsing.
//!
//! Splits a raw bundle document into its capture base and an ordered, typed
//! overlay list. Branding overlays are moved to the tail of the list —
//! legacy records first, then modern ones — so that a "first branding
//! overlay" lookup always finds a modern record when one exists, regardless
//! of the document's original overlay order. All other overlays keep their
//! relative input order.

use serde_json::Value;
use tracing::debug;

use crate::capture_base::CaptureBase;
use crate::error::{BundleError, BundleResult};
use crate::overlay::{Overlay, OverlayKind, BRANDING_TYPE, CAPTURE_BASE_TYPE, LEGACY_BRANDING_TYPE};

/// Parse a raw bundle document into its capture base and ordered overlays.
///
/// The capture base may appear either as a top-level `capture_base` object
/// or inline in the `overlays` array under `spec/capture_base/1.0` (the
/// shape registry responses use); the top-level record wins when both are
/// present. Overlay records never fail to parse — only a missing or
/// malformed capture base aborts.
pub(crate) fn parse_document(document: &Value) -> BundleResult<(CaptureBase, Vec<Overlay>)> {
    let capture_base = extract_capture_base(document)?;

    let raw_overlays = document
        .get("overlays")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut overlays = Vec::with_capacity(raw_overlays.len());
    let mut legacy_branding = Vec::new();
    let mut branding = Vec::new();

    for raw in raw_overlays {
        let raw_type = raw.get("type").and_then(Value::as_str).unwrap_or("");

        // An inline capture base record is not an overlay.
        if raw_type == CAPTURE_BASE_TYPE {
            continue;
        }

        match raw_type {
            LEGACY_BRANDING_TYPE => legacy_branding.push(Overlay::from_raw(raw)),
            BRANDING_TYPE => branding.push(Overlay::from_raw(raw)),
            _ => overlays.push(Overlay::from_raw(raw)),
        }
    }

    overlays.extend(legacy_branding);
    overlays.extend(branding);

    let unknown = overlays
        .iter()
        .filter(|overlay| overlay.kind() == OverlayKind::Unknown)
        .count();
    debug!(
        attributes = capture_base.attributes.len(),
        overlays = overlays.len(),
        unknown, "parsed overlay bundle document"
    );

    Ok((capture_base, overlays))
}

fn extract_capture_base(document: &Value) -> BundleResult<CaptureBase> {
    if let Some(record) = document.get("capture_base") {
        return CaptureBase::from_value(record);
    }

    if let Some(record) = document
        .get("overlays")
        .and_then(Value::as_array)
        .and_then(|raws| {
            raws.iter()
                .find(|raw| raw.get("type").and_then(Value::as_str) == Some(CAPTURE_BASE_TYPE))
        })
    {
        return CaptureBase::from_value(record);
    }

    Err(BundleError::MalformedCaptureBase {
        reason: "document has no capture base record".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::overlay::{FORMAT_TYPE, META_TYPE};

    #[test]
    fn test_branding_overlays_move_to_tail() {
        let document = json!({
            "capture_base": {"attributes": {"name": "Text"}},
            "overlays": [
                {"type": BRANDING_TYPE, "logo": "https://issuer.example/logo.png"},
                {"type": META_TYPE, "name": "Card"},
                {"type": LEGACY_BRANDING_TYPE, "background_color": "#000000"}
            ]
        });

        let (_, overlays) = parse_document(&document).unwrap();
        let kinds: Vec<OverlayKind> = overlays.iter().map(Overlay::kind).collect();
        assert_eq!(
            kinds,
            vec![
                OverlayKind::Meta,
                OverlayKind::LegacyBranding,
                OverlayKind::Branding
            ]
        );
    }

    #[test]
    fn test_semantic_overlays_keep_input_order() {
        let document = json!({
            "capture_base": {},
            "overlays": [
                {"type": META_TYPE, "name": "First"},
                {"type": FORMAT_TYPE},
                {"type": META_TYPE, "name": "Second"}
            ]
        });

        let (_, overlays) = parse_document(&document).unwrap();
        let names: Vec<&str> = overlays
            .iter()
            .filter_map(|overlay| match overlay {
                Overlay::Meta(meta) => Some(meta.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(overlays[1].kind(), OverlayKind::Format);
    }

    #[test]
    fn test_inline_capture_base() {
        let document = json!({
            "overlays": [
                {"type": CAPTURE_BASE_TYPE, "attributes": {"age": "Numeric"}, "digest": "sha256:cb"},
                {"type": META_TYPE, "name": "Card"}
            ]
        });

        let (capture_base, overlays) = parse_document(&document).unwrap();
        assert_eq!(capture_base.attribute_type("age"), Some("Numeric"));
        assert_eq!(capture_base.digest.as_deref(), Some("sha256:cb"));
        // The inline record is consumed, not kept as an overlay.
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].kind(), OverlayKind::Meta);
    }

    #[test]
    fn test_top_level_capture_base_wins() {
        let document = json!({
            "capture_base": {"classification": "top"},
            "overlays": [
                {"type": CAPTURE_BASE_TYPE, "classification": "inline"}
            ]
        });

        let (capture_base, overlays) = parse_document(&document).unwrap();
        assert_eq!(capture_base.classification, "top");
        assert!(overlays.is_empty());
    }

    #[test]
    fn test_missing_capture_base_is_fatal() {
        let err = parse_document(&json!({"overlays": []})).unwrap_err();
        assert!(matches!(err, BundleError::MalformedCaptureBase { .. }));
    }

    #[test]
    fn test_missing_overlays_array_is_empty_bundle() {
        let (capture_base, overlays) = parse_document(&json!({"capture_base": {}})).unwrap();
        assert!(capture_base.attributes.is_empty());
        assert!(overlays.is_empty());
    }

    #[test]
    fn test_unrecognized_overlay_kept_opaque() {
        let document = json!({
            "capture_base": {},
            "overlays": [{"type": "unknown/overlay/9.9"}]
        });

        let (_, overlays) = parse_document(&document).unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].kind(), OverlayKind::Unknown);
    }
}
