//! Template profiles
//!
//! A profile says which fields a template carries and how to find them.
//! Profiles are TOML files; [`Profile::default`] describes the court letter
//! template the tool was built for.

use crate::error::Result;
use crate::opc::MAIN_DOCUMENT;
use crate::values::keys;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Header text whose leading spacer run gets tightened
pub const ANKARA_HEADER: &str = r#"<w:t xml:space="preserve">ANKARA, </w:t>"#;

/// One field of the template and the value it receives
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
    /// Exact text replaced once
    Literal {
        label: String,
        find: String,
        value: String,
    },
    /// Date written either `dd.mm.yyyy` or `dd/mm/yyyy`
    DualDate {
        label: String,
        anchor: String,
        value: String,
    },
    /// `<year>/<number>` following `label`, possibly split across runs
    CaseNumber { label: String, value: String },
    /// Date between `label` and `trailing` in one paragraph
    DateNearLabel {
        label: String,
        trailing: String,
        value: String,
    },
    /// Short number with a period right before `trailing`
    NumericPrefix { trailing: String, value: String },
}

impl FieldRule {
    /// Key of the case value this field receives
    pub fn value_key(&self) -> &str {
        match self {
            FieldRule::Literal { value, .. }
            | FieldRule::DualDate { value, .. }
            | FieldRule::CaseNumber { value, .. }
            | FieldRule::DateNearLabel { value, .. }
            | FieldRule::NumericPrefix { value, .. } => value,
        }
    }

    fn literal(label: &str, find: &str, value: &str) -> Self {
        FieldRule::Literal {
            label: label.into(),
            find: find.into(),
            value: value.into(),
        }
    }
}

/// Paragraph move applied after substitution
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Relocation {
    /// Text identifying the paragraph to move
    pub moved: String,
    /// Text identifying the paragraph it must precede
    pub anchor: String,
}

/// Template profile
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Legacy template document
    pub template: Option<PathBuf>,
    /// Document converter program
    pub converter: PathBuf,
    /// Name of the markup entry inside the package
    pub markup_entry: String,
    /// Fields, applied in order
    pub fields: Vec<FieldRule>,
    pub tighten_header: bool,
    pub header_marker: String,
    pub normalize_alignment: bool,
    pub relocate: Option<Relocation>,
}

impl Profile {
    /// Load a profile from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a profile from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            template: None,
            converter: PathBuf::from("textutil"),
            markup_entry: MAIN_DOCUMENT.to_string(),
            fields: vec![
                FieldRule::literal("Ad Soyad", "Doğukan yurt", keys::FULL_NAME),
                FieldRule::literal("TC", "16291090514", keys::NATIONAL_ID),
                FieldRule::literal("Mahkeme Esas Numarası", "2025/357", keys::CASE_NUMBER),
                FieldRule::literal("İlgi Esas Numarası", "2025/258", keys::CASE_NUMBER),
                FieldRule::literal("Mahkeme Gönderim Tarihi", "12/09/2025", keys::COURT_DATE),
                FieldRule::DualDate {
                    label: "Evrak Hazırlama Tarihi".into(),
                    anchor: "20.10.2025".into(),
                    value: keys::PREPARED_DATE.into(),
                },
            ],
            tighten_header: true,
            header_marker: ANKARA_HEADER.to_string(),
            normalize_alignment: true,
            relocate: None,
        }
    }
}
