//! Overlay Capture Architecture (OCA) bundle resolution.
//!
//! An OCA bundle pairs a *capture base* (an ordered attribute schema) with a
//! list of *overlays*, each layering one display concern on top of it:
//! labels, per-attribute help text, formats, encodings, standards, localized
//! credential metadata, and card branding. This crate parses a raw bundle
//! document into typed overlays and merges them into an immutable
//! [`OverlayBundle`] that issuers query to build credential display
//! metadata.
//!
//! The engine performs no I/O: fetching the document from a registry and
//! rendering the resolved values are both out of scope. Parsing is
//! deliberately permissive — overlay types this crate does not know are
//! preserved opaquely as [`Overlay::Unknown`], and partial records
//! contribute whatever fields they carry. The only fatal input is a document
//! without a usable capture base.
//!
//! # Quick start
//!
//! ```
//! use oca_bundle::OverlayBundle;
//! use serde_json::json;
//!
//! # fn main() -> oca_bundle::BundleResult<()> {
//! let document = json!({
//!     "capture_base": {
//!         "attributes": {"name": "Text", "age": "Numeric"},
//!         "flagged_attributes": ["age"]
//!     },
//!     "overlays": [
//!         {
//!             "type": "spec/overlays/label/1.0",
//!             "language": "en",
//!             "attribute_labels": {"name": "Name", "age": "Age"}
//!         },
//!         {
//!             "type": "spec/overlays/meta/1.0",
//!             "language": "en",
//!             "name": "Driver License",
//!             "issuer": "DMV"
//!         }
//!     ]
//! });
//!
//! let bundle = OverlayBundle::from_value("cred-def-1", &document)?;
//!
//! assert_eq!(bundle.languages, vec!["en"]);
//! assert_eq!(bundle.metadata.name["en"], "Driver License");
//!
//! let age = bundle.attribute("age").expect("declared by the capture base");
//! assert_eq!(age.label["en"], "Age");
//! assert!(bundle.flagged_attribute("age").is_some());
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod capture_base;
pub mod error;
pub mod overlay;
pub mod resolve;

mod parser;

pub use bundle::OverlayBundle;
pub use capture_base::CaptureBase;
pub use error::{BundleError, BundleResult};
pub use overlay::{
    BrandingOverlay, CharacterEncodingOverlay, FormatOverlay, InformationOverlay, LabelOverlay,
    LegacyBrandingFooter, LegacyBrandingHeader, LegacyBrandingOverlay, MetaOverlay, Overlay,
    OverlayKind, StandardOverlay, UnknownOverlay, DEFAULT_LANGUAGE,
};
pub use resolve::{BundleMetadata, ResolvedAttribute};
