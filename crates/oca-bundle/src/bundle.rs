//! The resolved overlay bundle and its query surface.

use serde_json::Value;
use tracing::debug;

use crate::capture_base::CaptureBase;
use crate::error::BundleResult;
use crate::overlay::{BrandingOverlay, LegacyBrandingOverlay, Overlay};
use crate::resolve::{BundleMetadata, ResolvedAttribute};
use crate::{parser, resolve};

/// A fully resolved overlay bundle.
///
/// Built once from a raw bundle document and immutable afterward; safe to
/// share across concurrent readers. All localization is baked into the
/// resolved maps — there is nothing left to compute at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBundle {
    /// The credential definition this bundle decorates. Supplied by the
    /// caller, not derived from the document.
    pub credential_definition_id: String,

    /// The underlying attribute schema.
    pub capture_base: CaptureBase,

    /// All overlays, typed and deterministically ordered (semantic overlays
    /// in input order, then legacy branding, then modern branding).
    pub overlays: Vec<Overlay>,

    /// Languages declared by meta overlays, sorted and deduplicated.
    pub languages: Vec<String>,

    /// Localized bundle-level metadata.
    pub metadata: BundleMetadata,

    /// One resolved record per capture-base attribute, in declaration order.
    pub attributes: Vec<ResolvedAttribute>,

    /// The flagged subset of `attributes`, in the same order.
    pub flagged_attributes: Vec<ResolvedAttribute>,
}

impl OverlayBundle {
    /// Resolve a raw bundle document.
    ///
    /// The only failure is a missing or malformed capture base; overlay
    /// records are tolerated in any state (unknown types are preserved
    /// opaquely, partial records contribute what they have).
    pub fn from_value(
        credential_definition_id: impl Into<String>,
        document: &Value,
    ) -> BundleResult<Self> {
        let credential_definition_id = credential_definition_id.into();
        let (capture_base, overlays) = parser::parse_document(document)?;

        let languages = resolve::resolve_languages(&overlays);
        let metadata = resolve::resolve_metadata(&overlays);
        let attributes = resolve::resolve_attributes(&capture_base, &overlays);
        let flagged_attributes = resolve::resolve_flagged(&capture_base, &attributes);

        debug!(
            credential_definition_id = %credential_definition_id,
            attributes = attributes.len(),
            flagged = flagged_attributes.len(),
            languages = languages.len(),
            "resolved overlay bundle"
        );

        Ok(Self {
            credential_definition_id,
            capture_base,
            overlays,
            languages,
            metadata,
            attributes,
            flagged_attributes,
        })
    }

    /// Resolve a raw bundle document from JSON text.
    pub fn from_json_str(
        credential_definition_id: impl Into<String>,
        document: &str,
    ) -> BundleResult<Self> {
        let document: Value = serde_json::from_str(document)?;
        Self::from_value(credential_definition_id, &document)
    }

    /// Look up a resolved attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Look up a resolved attribute by name, restricted to the flagged
    /// subset.
    pub fn flagged_attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.flagged_attributes.iter().find(|attr| attr.name == name)
    }

    /// The first modern branding overlay, if any.
    ///
    /// Because branding overlays sort to the tail with legacy records first,
    /// this is always a modern record when the document contains one, no
    /// matter where it appeared in the input.
    pub fn branding(&self) -> Option<&BrandingOverlay> {
        self.overlays.iter().find_map(|overlay| match overlay {
            Overlay::Branding(branding) => Some(branding),
            _ => None,
        })
    }

    /// The first legacy branding overlay, if any. Callers typically fall
    /// back to this when [`branding`](Self::branding) is absent.
    pub fn legacy_branding(&self) -> Option<&LegacyBrandingOverlay> {
        self.overlays.iter().find_map(|overlay| match overlay {
            Overlay::LegacyBranding(branding) => Some(branding),
            _ => None,
        })
    }
}
