//! Error types for muzekkere

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Profile error: {0}")]
    Config(#[from] toml::de::Error),

    /// A field matched a number of times other than expected
    #[error("Template field '{label}' must occur {expected} time(s), found {found}")]
    FieldCount {
        label: String,
        expected: usize,
        found: usize,
    },

    /// A field form matched more than once; later forms are not tried
    #[error("Template field '{label}' is ambiguous: form {form} matched {found} times")]
    AmbiguousField {
        label: String,
        form: String,
        found: usize,
    },

    /// No field form matched exactly once
    #[error("Template field '{label}' not found in any known form")]
    MissingField { label: String },

    /// A structural marker (body, run, tab stop, header) is missing
    #[error("Template marker missing: {0}")]
    MissingMarker(String),

    #[error("External tool failed: {command}\n{diagnostics}")]
    ExternalTool {
        command: String,
        diagnostics: String,
    },

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// Whether this error means the template drifted from what the profile expects
    pub fn is_template_integrity(&self) -> bool {
        matches!(
            self,
            Error::FieldCount { .. }
                | Error::AmbiguousField { .. }
                | Error::MissingField { .. }
                | Error::MissingMarker(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
