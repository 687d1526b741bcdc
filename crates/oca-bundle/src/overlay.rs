//! Overlay variant model and type-discriminator registry.
//!
//! An overlay bundle carries a heterogeneous list of overlay records, each
//! tagged with a `type` URI. The eight known overlay shapes are modeled as a
//! closed sum type; anything else is preserved as [`Overlay::Unknown`] so
//! that bundles using overlay types introduced after this crate still parse.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Language used when an overlay does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Type URI of the capture base record itself (not an overlay).
pub const CAPTURE_BASE_TYPE: &str = "spec/capture_base/1.0";

/// Type URI for character encoding overlays.
pub const CHARACTER_ENCODING_TYPE: &str = "spec/overlays/character_encoding/1.0";

/// Type URI for label overlays.
pub const LABEL_TYPE: &str = "spec/overlays/label/1.0";

/// Type URI for information overlays.
pub const INFORMATION_TYPE: &str = "spec/overlays/information/1.0";

/// Type URI for format overlays.
pub const FORMAT_TYPE: &str = "spec/overlays/format/1.0";

/// Type URI for standard overlays.
pub const STANDARD_TYPE: &str = "spec/overlays/standard/1.0";

/// Type URI for meta overlays.
pub const META_TYPE: &str = "spec/overlays/meta/1.0";

/// Type URI for modern branding overlays.
pub const BRANDING_TYPE: &str = "aries/overlays/branding/1.0";

/// Type URI for legacy branding overlays.
pub const LEGACY_BRANDING_TYPE: &str = "aries/overlays/branding/0.1";

/// Overlay variant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    CharacterEncoding,
    Label,
    Information,
    Format,
    Standard,
    Meta,
    Branding,
    LegacyBranding,
    /// Any type URI not in the known set.
    Unknown,
}

impl OverlayKind {
    /// Classify a raw `type` discriminator.
    ///
    /// Total over all strings: matching is exact and case-sensitive, and any
    /// unrecognized URI maps to [`OverlayKind::Unknown`] rather than failing.
    pub fn classify(raw_type: &str) -> Self {
        match raw_type {
            CHARACTER_ENCODING_TYPE => Self::CharacterEncoding,
            LABEL_TYPE => Self::Label,
            INFORMATION_TYPE => Self::Information,
            FORMAT_TYPE => Self::Format,
            STANDARD_TYPE => Self::Standard,
            META_TYPE => Self::Meta,
            BRANDING_TYPE => Self::Branding,
            LEGACY_BRANDING_TYPE => Self::LegacyBranding,
            _ => Self::Unknown,
        }
    }

    /// The discriminator URI for this kind, if it has one.
    pub fn uri(&self) -> Option<&'static str> {
        match self {
            Self::CharacterEncoding => Some(CHARACTER_ENCODING_TYPE),
            Self::Label => Some(LABEL_TYPE),
            Self::Information => Some(INFORMATION_TYPE),
            Self::Format => Some(FORMAT_TYPE),
            Self::Standard => Some(STANDARD_TYPE),
            Self::Meta => Some(META_TYPE),
            Self::Branding => Some(BRANDING_TYPE),
            Self::LegacyBranding => Some(LEGACY_BRANDING_TYPE),
            Self::Unknown => None,
        }
    }
}

/// Character encoding overlay: per-attribute encodings plus a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterEncodingOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Encoding applied when an attribute has no specific entry.
    pub default_character_encoding: String,

    /// Attribute name → encoding.
    pub attribute_character_encoding: HashMap<String, String>,
}

/// Label overlay: localized attribute labels and categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Language of all labels in this overlay.
    pub language: String,

    /// Attribute name → display label.
    pub attribute_labels: HashMap<String, String>,

    /// Category identifiers, in display order.
    pub attribute_categories: Vec<String>,

    /// Category identifier → display label.
    pub category_labels: HashMap<String, String>,
}

impl LabelOverlay {
    /// The overlay's language, defaulting to [`DEFAULT_LANGUAGE`] when unset.
    pub fn effective_language(&self) -> &str {
        effective_language(&self.language)
    }
}

/// Information overlay: localized per-attribute help text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InformationOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Language of all entries in this overlay.
    pub language: String,

    /// Attribute name → descriptive text.
    pub attribute_information: HashMap<String, String>,
}

impl InformationOverlay {
    /// The overlay's language, defaulting to [`DEFAULT_LANGUAGE`] when unset.
    pub fn effective_language(&self) -> &str {
        effective_language(&self.language)
    }
}

/// Format overlay: per-attribute display/input formats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Attribute name → format string.
    pub attribute_formats: HashMap<String, String>,
}

/// Standard overlay: per-attribute standard identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Attribute name → standard identifier.
    pub attribute_standards: HashMap<String, String>,
}

/// Meta overlay: localized bundle-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Language of all fields in this overlay.
    pub language: String,

    /// Credential display name.
    pub name: String,

    /// Credential description.
    pub description: String,

    /// Help text shown alongside the credential.
    pub credential_help_text: String,

    /// Support URL for the credential.
    pub credential_support_url: String,

    /// Issuer display name.
    pub issuer: String,

    /// Issuer description.
    pub issuer_description: String,

    /// Issuer URL.
    pub issuer_url: String,

    /// Watermark text rendered over the credential.
    pub watermark: Option<String>,
}

impl MetaOverlay {
    /// The overlay's language, defaulting to [`DEFAULT_LANGUAGE`] when unset.
    pub fn effective_language(&self) -> &str {
        effective_language(&self.language)
    }
}

/// Modern branding overlay: the credential's visual skin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Logo image URL or data URI.
    pub logo: Option<String>,

    /// Background image URL or data URI.
    pub background_image: Option<String>,

    /// Background image slice URL or data URI.
    pub background_image_slice: Option<String>,

    /// Primary background color (CSS color).
    pub primary_background_color: Option<String>,

    /// Secondary background color (CSS color).
    pub secondary_background_color: Option<String>,

    /// Attribute shown as the card's primary field.
    pub primary_attribute: Option<String>,

    /// Attribute shown as the card's secondary field.
    pub secondary_attribute: Option<String>,

    /// Attribute holding the issuance date.
    pub issued_date_attribute: Option<String>,

    /// Attribute holding the expiry date.
    pub expiry_date_attribute: Option<String>,
}

/// Header section of a legacy branding overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBrandingHeader {
    /// Text color (CSS color).
    pub color: Option<String>,

    /// Background color (CSS color).
    pub background_color: Option<String>,

    /// Header image URL or data URI.
    pub image_source: Option<String>,

    /// Whether the issuer line is hidden.
    pub hide_issuer: Option<bool>,
}

/// Footer section of a legacy branding overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBrandingFooter {
    /// Text color (CSS color).
    pub color: Option<String>,

    /// Background color (CSS color).
    pub background_color: Option<String>,
}

/// Legacy branding overlay (first-generation card layout schema).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBrandingOverlay {
    /// Capture base digest this overlay refers to.
    pub capture_base: Option<String>,

    /// Content digest of the overlay record.
    pub digest: Option<String>,

    /// Card background color (CSS color).
    pub background_color: Option<String>,

    /// Card image URL or data URI.
    pub image_source: Option<String>,

    /// Header section.
    pub header: Option<LegacyBrandingHeader>,

    /// Footer section.
    pub footer: Option<LegacyBrandingFooter>,
}

/// An overlay with a type URI this crate does not recognize.
///
/// Only the original type tag and digest are retained; the record body is
/// dropped. Unknown overlays never contribute to resolution but stay in the
/// bundle's overlay list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownOverlay {
    /// The raw `type` discriminator as it appeared in the document.
    #[serde(rename = "type")]
    pub overlay_type: String,

    /// Content digest of the overlay record.
    #[serde(default)]
    pub digest: Option<String>,
}

impl UnknownOverlay {
    fn from_value(raw_type: &str, value: &Value) -> Self {
        Self {
            overlay_type: raw_type.to_string(),
            digest: value
                .get("digest")
                .and_then(Value::as_str)
                .map(String::from),
        }
    }
}

/// A parsed overlay record.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    CharacterEncoding(CharacterEncodingOverlay),
    Label(LabelOverlay),
    Information(InformationOverlay),
    Format(FormatOverlay),
    Standard(StandardOverlay),
    Meta(MetaOverlay),
    Branding(BrandingOverlay),
    LegacyBranding(LegacyBrandingOverlay),
    Unknown(UnknownOverlay),
}

impl Overlay {
    /// Parse a raw overlay record.
    ///
    /// Never fails: a missing `type` field or a record body that does not
    /// match its variant's shape degrades to [`Overlay::Unknown`], keeping
    /// the original type tag.
    pub fn from_raw(value: &Value) -> Self {
        let raw_type = value.get("type").and_then(Value::as_str).unwrap_or("");

        match OverlayKind::classify(raw_type) {
            OverlayKind::CharacterEncoding => decode(value, raw_type, Self::CharacterEncoding),
            OverlayKind::Label => decode(value, raw_type, Self::Label),
            OverlayKind::Information => decode(value, raw_type, Self::Information),
            OverlayKind::Format => decode(value, raw_type, Self::Format),
            OverlayKind::Standard => decode(value, raw_type, Self::Standard),
            OverlayKind::Meta => decode(value, raw_type, Self::Meta),
            OverlayKind::Branding => decode(value, raw_type, Self::Branding),
            OverlayKind::LegacyBranding => decode(value, raw_type, Self::LegacyBranding),
            OverlayKind::Unknown => Self::Unknown(UnknownOverlay::from_value(raw_type, value)),
        }
    }

    /// The variant kind of this overlay.
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::CharacterEncoding(_) => OverlayKind::CharacterEncoding,
            Self::Label(_) => OverlayKind::Label,
            Self::Information(_) => OverlayKind::Information,
            Self::Format(_) => OverlayKind::Format,
            Self::Standard(_) => OverlayKind::Standard,
            Self::Meta(_) => OverlayKind::Meta,
            Self::Branding(_) => OverlayKind::Branding,
            Self::LegacyBranding(_) => OverlayKind::LegacyBranding,
            Self::Unknown(_) => OverlayKind::Unknown,
        }
    }

    /// The `type` discriminator URI of this overlay.
    pub fn overlay_type(&self) -> &str {
        match self {
            Self::Unknown(unknown) => &unknown.overlay_type,
            other => other
                .kind()
                .uri()
                .unwrap_or_default(),
        }
    }

    /// The overlay's content digest, if it carries one.
    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::CharacterEncoding(o) => o.digest.as_deref(),
            Self::Label(o) => o.digest.as_deref(),
            Self::Information(o) => o.digest.as_deref(),
            Self::Format(o) => o.digest.as_deref(),
            Self::Standard(o) => o.digest.as_deref(),
            Self::Meta(o) => o.digest.as_deref(),
            Self::Branding(o) => o.digest.as_deref(),
            Self::LegacyBranding(o) => o.digest.as_deref(),
            Self::Unknown(o) => o.digest.as_deref(),
        }
    }

    /// The declared language, for the language-bearing variants.
    ///
    /// `None` for variants that carry no language, `Some("")` when the field
    /// is present but empty (resolution then falls back to
    /// [`DEFAULT_LANGUAGE`]).
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Label(o) => Some(&o.language),
            Self::Information(o) => Some(&o.language),
            Self::Meta(o) => Some(&o.language),
            _ => None,
        }
    }
}

fn decode<T, F>(value: &Value, raw_type: &str, wrap: F) -> Overlay
where
    T: DeserializeOwned,
    F: FnOnce(T) -> Overlay,
{
    match serde_json::from_value::<T>(value.clone()) {
        Ok(variant) => wrap(variant),
        Err(err) => {
            debug!(
                overlay_type = raw_type,
                error = %err,
                "overlay record does not match its variant shape, keeping as unknown"
            );
            Overlay::Unknown(UnknownOverlay::from_value(raw_type, value))
        }
    }
}

pub(crate) fn effective_language(language: &str) -> &str {
    if language.is_empty() {
        DEFAULT_LANGUAGE
    } else {
        language
    }
}
