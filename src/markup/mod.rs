//! Template field engine over serialized `document.xml`
//!
//! The engine never builds a document model. It works on the markup text
//! with targeted patterns that know where run and paragraph boundaries sit,
//! and it refuses to guess: every field must be found exactly once.

mod layout;
mod locator;
mod patterns;
mod relocate;
mod substitute;

pub use layout::{normalize_alignment, tighten_header_spacing};
pub use locator::{locate, splice, FieldSpec, Matcher, Occurrence, Span};
pub use relocate::{body_bounds, move_paragraph_to_anchor};
pub use substitute::{
    replace_case_number_once, replace_date_near_label_once, replace_date_once,
    replace_literal_once, replace_numeric_prefix_once, AnchorDate, CaseNumberForm,
};

use crate::error::Result;

/// The decoded main document part, owned by one conversion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupDocument {
    xml: String,
}

impl MarkupDocument {
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Decode part bytes as UTF-8
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self::new(String::from_utf8(data)?))
    }

    /// Run one transform; on error the document is dropped, never half-edited
    pub fn apply<F>(self, transform: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        Ok(Self::new(transform(&self.xml)?))
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.xml.into_bytes()
    }
}
