//! Document assembly: fill the markup entry and rebuild the package

use crate::config::{FieldRule, Profile};
use crate::convert::{TargetFormat, Transcoder};
use crate::error::{Error, Result};
use crate::markup::{self, AnchorDate, MarkupDocument};
use crate::opc::Package;
use crate::values::CaseValues;
use chrono::NaiveDateTime;
use log::{debug, info};
use quick_xml::escape::partial_escape;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Apply every field, then the layout tweaks, then the paragraph move
pub fn fill_markup(xml: &str, profile: &Profile, values: &CaseValues) -> Result<String> {
    // Resolve first so a missing value never aborts halfway through.
    let resolved = profile
        .fields
        .iter()
        .map(|rule| {
            let value = values.resolve(rule.value_key())?;
            Ok((rule, partial_escape(value.as_str()).into_owned()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut doc = MarkupDocument::new(xml);
    for (rule, value) in &resolved {
        doc = doc.apply(|xml| apply_rule(xml, rule, value))?;
    }
    info!("substituted {} field(s)", resolved.len());

    if profile.tighten_header {
        doc = doc.apply(|xml| markup::tighten_header_spacing(xml, &profile.header_marker))?;
    }
    if profile.normalize_alignment {
        doc = doc.apply(markup::normalize_alignment)?;
    }
    if let Some(relocation) = &profile.relocate {
        doc = doc.apply(|xml| {
            markup::move_paragraph_to_anchor(xml, &relocation.moved, &relocation.anchor)
        })?;
    }

    Ok(doc.as_str().to_string())
}

fn apply_rule(xml: &str, rule: &FieldRule, value: &str) -> Result<String> {
    match rule {
        FieldRule::Literal { label, find, .. } => {
            markup::replace_literal_once(xml, find, value, label)
        }
        FieldRule::DualDate { label, anchor, .. } => {
            markup::replace_date_once(xml, &AnchorDate::new(anchor)?, value, label)
        }
        FieldRule::CaseNumber { label, .. } => markup::replace_case_number_once(xml, label, value),
        FieldRule::DateNearLabel {
            label, trailing, ..
        } => markup::replace_date_near_label_once(xml, label, trailing, value),
        FieldRule::NumericPrefix { trailing, .. } => {
            markup::replace_numeric_prefix_once(xml, value, trailing)
        }
    }
}

/// Fill the markup entry of the DOCX `input` and write the result to `output`.
///
/// `output` is written through a temporary file next to it and only appears
/// once the whole package has been written.
pub fn assemble_package(
    input: &Path,
    output: &Path,
    profile: &Profile,
    values: &CaseValues,
) -> Result<()> {
    let mut package = Package::open(input)?;
    let part = package.part(&profile.markup_entry)?;
    debug!(
        "{}: {} bytes, {:?}",
        part.name(),
        part.data().len(),
        part.compression()
    );

    let filled = MarkupDocument::from_bytes(part.into_data())?
        .apply(|xml| fill_markup(xml, profile, values))?
        .into_bytes();

    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    package
        .rewrite_to(staged.as_file_mut(), &profile.markup_entry, &filled)?
        .flush()?;
    staged.persist(output).map_err(|e| Error::Io(e.error))?;

    info!("wrote {}", output.display());
    Ok(())
}

/// Convert the legacy template, fill it, and convert it back to `output`
pub fn produce(
    template: &Path,
    output: &Path,
    profile: &Profile,
    values: &CaseValues,
    transcoder: &dyn Transcoder,
) -> Result<PathBuf> {
    if !template.exists() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("template not found: {}", template.display()),
        )));
    }

    let scratch = tempfile::Builder::new().prefix("muzekkere_").tempdir()?;
    let converted = scratch.path().join("template.docx");
    let updated = scratch.path().join("updated.docx");

    info!("converting {} to docx", template.display());
    transcoder.convert(template, TargetFormat::Docx, &converted)?;
    assemble_package(&converted, &updated, profile, values)?;
    info!("converting filled package to doc");
    transcoder.convert(&updated, TargetFormat::Doc, output)
}

/// `<stem>_filled_<YYYYmmdd_HHMMSS>.DOC` next to the template
pub fn default_output_path(template: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "muzekkere".to_string());
    let name = format!("{}_filled_{}.DOC", stem, now.format("%Y%m%d_%H%M%S"));
    template.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Relocation;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn values() -> CaseValues {
        CaseValues {
            full_name: "Ahmet Yılmaz".into(),
            national_id: "12345678901".into(),
            case_number: "77".into(),
            court_date: "01/11/2026".into(),
            prepared_date: "03/11/2026".into(),
            year: 2026,
            extra: BTreeMap::new(),
        }
    }

    fn bare_profile(fields: Vec<FieldRule>) -> Profile {
        Profile {
            fields,
            tighten_header: false,
            normalize_alignment: false,
            ..Profile::default()
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let profile = bare_profile(vec![FieldRule::Literal {
            label: "Ad Soyad".into(),
            find: "Doğukan yurt".into(),
            value: "full_name".into(),
        }]);
        let mut values = values();
        values.full_name = "Ali & <Veli>".into();
        let out = fill_markup("<w:t>Doğukan yurt</w:t>", &profile, &values).unwrap();
        assert_eq!(out, "<w:t>Ali &amp; &lt;Veli&gt;</w:t>");
    }

    #[test]
    fn test_unknown_value_fails_before_any_edit() {
        let profile = bare_profile(vec![FieldRule::NumericPrefix {
            trailing: "Asliye Hukuk".into(),
            value: "chamber".into(),
        }]);
        let err = fill_markup("<w:t>3. Asliye Hukuk</w:t>", &profile, &values()).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_dual_date_anchor_must_be_a_date() {
        let profile = bare_profile(vec![FieldRule::DualDate {
            label: "Tarih".into(),
            anchor: "20-10-2025".into(),
            value: "prepared_date".into(),
        }]);
        let err = fill_markup("<w:t>20-10-2025</w:t>", &profile, &values()).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
        assert!(!err.is_template_integrity());
    }

    #[test]
    fn test_pipeline_order() {
        let mut profile = bare_profile(vec![FieldRule::CaseNumber {
            label: "Esas No:".into(),
            value: "case_number".into(),
        }]);
        profile.normalize_alignment = true;
        profile.relocate = Some(Relocation {
            moved: "EK".into(),
            anchor: "Esas No:".into(),
        });

        let xml = concat!(
            "<w:body>",
            "<w:p><w:pPr><w:jc w:val=\"both\"/></w:pPr><w:r><w:t>Esas No: 2025/</w:t></w:r><w:r><w:t>357</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>EK</w:t></w:r></w:p>",
            "</w:body>"
        );
        let out = fill_markup(xml, &profile, &values()).unwrap();
        assert_eq!(
            out,
            concat!(
                "<w:body>",
                "<w:p><w:r><w:t>EK</w:t></w:r></w:p>",
                "<w:p><w:pPr><w:jc w:val=\"left\"/></w:pPr><w:r><w:t>Esas No: 2026/</w:t></w:r><w:r><w:t>77</w:t></w:r></w:p>",
                "</w:body>"
            )
        );
    }

    #[test]
    fn test_default_output_path() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(9, 5, 7))
            .unwrap();
        let path = default_output_path(Path::new("/srv/sablon/üstyazı.DOC"), now);
        assert_eq!(path, PathBuf::from("/srv/sablon/üstyazı_filled_20261019_090507.DOC"));
    }
}
