//! Exactly-once field substitution
//!
//! Every function takes the markup text and returns a new string, or an
//! error if the template does not contain the field exactly once. Nothing is
//! modified on failure.

use crate::error::{Error, Result};
use crate::markup::locator::{splice, FieldSpec, Matcher, Occurrence, Span};
use crate::markup::patterns;
use log::debug;
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// Replace the single occurrence of `old` with `new`
pub fn replace_literal_once(text: &str, old: &str, new: &str, label: &str) -> Result<String> {
    let field = FieldSpec::once(label, Matcher::Literal(old.to_string()));
    let span = field.expect_once(text)?;
    debug!("{}: replacing literal at {:?}", label, span.range);
    Ok(splice(text, &[(span.range, new)]))
}

/// A template date that may be written as `20.10.2025` or `20/10/2025`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorDate {
    dotted: String,
    slashed: String,
}

impl AnchorDate {
    /// Build both spellings from either one.
    ///
    /// The anchor must look like `DD.MM.YYYY` or `DD/MM/YYYY`, so the two
    /// spellings never coincide.
    pub fn new(date: &str) -> Result<Self> {
        let shape_ok = date.len() == 10
            && date.bytes().enumerate().all(|(i, b)| match i {
                2 | 5 => b == b'.' || b == b'/',
                _ => b.is_ascii_digit(),
            });
        if !shape_ok {
            return Err(Error::InvalidValue(format!(
                "anchor date must be DD.MM.YYYY or DD/MM/YYYY, got '{date}'"
            )));
        }
        Ok(Self {
            dotted: date.replace('/', "."),
            slashed: date.replace('.', "/"),
        })
    }

    pub fn dotted(&self) -> &str {
        &self.dotted
    }

    pub fn slashed(&self) -> &str {
        &self.slashed
    }
}

/// Replace an anchor date written in either spelling.
///
/// The two spellings together must occur exactly once.
pub fn replace_date_once(
    text: &str,
    anchor: &AnchorDate,
    new_date: &str,
    label: &str,
) -> Result<String> {
    let dotted = FieldSpec::once(label, Matcher::Literal(anchor.dotted.clone()));
    let slashed = FieldSpec::once(label, Matcher::Literal(anchor.slashed.clone()));

    let (dotted, slashed) = (dotted.occurrence(text), slashed.occurrence(text));
    let span = match (dotted, slashed) {
        (Occurrence::Once(span), Occurrence::NotFound)
        | (Occurrence::NotFound, Occurrence::Once(span)) => span,
        (a, b) => {
            return Err(Error::FieldCount {
                label: label.to_string(),
                expected: 1,
                found: count(&a) + count(&b),
            })
        }
    };

    debug!("{}: replacing date at {:?}", label, span.range);
    Ok(splice(text, &[(span.range, new_date)]))
}

fn count(occurrence: &Occurrence) -> usize {
    match occurrence {
        Occurrence::NotFound => 0,
        Occurrence::Once(_) => 1,
        Occurrence::Multiple(n) => *n,
    }
}

/// Ways a case number can be laid out across runs, in the order they are tried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseNumberForm {
    /// Label and number in one run
    SingleRun,
    /// Label in one run, number in the next
    LabelRunSplit,
    /// `<year>/` in one run, the remaining digits in the next
    YearSplit,
}

impl CaseNumberForm {
    pub const PRIORITY: [CaseNumberForm; 3] = [
        CaseNumberForm::SingleRun,
        CaseNumberForm::LabelRunSplit,
        CaseNumberForm::YearSplit,
    ];

    fn pattern(self, label: &str) -> Result<Regex> {
        match self {
            CaseNumberForm::SingleRun => patterns::case_number_single_run(label),
            CaseNumberForm::LabelRunSplit => patterns::case_number_after_label_run(label),
            CaseNumberForm::YearSplit => patterns::case_number_split_year(label),
        }
    }

    fn edits<'v>(
        self,
        matcher: &Matcher,
        span: &Span,
        year: &'v str,
        value: &'v str,
    ) -> Option<Vec<(Range<usize>, &'v str)>> {
        match self {
            CaseNumberForm::SingleRun | CaseNumberForm::LabelRunSplit => {
                Some(vec![(span.group(matcher, "num")?, value)])
            }
            CaseNumberForm::YearSplit => {
                let digits = value.get(year.len()..)?;
                Some(vec![
                    (span.group(matcher, "year")?, year),
                    (span.group(matcher, "digits")?, digits),
                ])
            }
        }
    }
}

impl fmt::Display for CaseNumberForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseNumberForm::SingleRun => "single-run",
            CaseNumberForm::LabelRunSplit => "label-run-split",
            CaseNumberForm::YearSplit => "year-split",
        };
        f.write_str(name)
    }
}

/// Replace the case number that follows `label`.
///
/// Forms are tried in [`CaseNumberForm::PRIORITY`] order. A form with no
/// match falls through to the next one; a form with several matches fails
/// at once without trying the rest.
pub fn replace_case_number_once(text: &str, label: &str, new_value: &str) -> Result<String> {
    let separator = new_value
        .find('/')
        .ok_or_else(|| Error::InvalidValue(format!("case number '{new_value}' has no '/'")))?;
    let year = &new_value[..=separator];

    for form in CaseNumberForm::PRIORITY {
        let field = FieldSpec::once(label, Matcher::Pattern(form.pattern(label)?));
        match field.occurrence(text) {
            Occurrence::NotFound => continue,
            Occurrence::Multiple(found) => {
                return Err(Error::AmbiguousField {
                    label: label.to_string(),
                    form: form.to_string(),
                    found,
                })
            }
            Occurrence::Once(span) => {
                let edits = form
                    .edits(&field.matcher, &span, year, new_value)
                    .ok_or_else(|| {
                        Error::MissingMarker(format!("{label}: incomplete {form} match"))
                    })?;
                debug!("{}: replacing case number ({}) at {:?}", label, form, span.range);
                return Ok(splice(text, &edits));
            }
        }
    }

    Err(Error::MissingField {
        label: label.to_string(),
    })
}

/// Replace the date between `label` and `trailing` within one paragraph
pub fn replace_date_near_label_once(
    text: &str,
    label: &str,
    trailing: &str,
    new_date: &str,
) -> Result<String> {
    let field = FieldSpec::once(
        label,
        Matcher::Pattern(patterns::date_near_label(label, trailing)?),
    );
    let span = field.expect_once(text)?;
    let date = span
        .group(&field.matcher, "date")
        .ok_or_else(|| Error::MissingMarker(format!("{label}: date token")))?;
    debug!("{}: replacing date at {:?}", label, date);
    Ok(splice(text, &[(date, new_date)]))
}

/// Replace the short number (`3.`) that precedes `trailing_label`
pub fn replace_numeric_prefix_once(
    text: &str,
    new_number: &str,
    trailing_label: &str,
) -> Result<String> {
    let field = FieldSpec::once(
        trailing_label,
        Matcher::Pattern(patterns::numeric_prefix(trailing_label)?),
    );
    let span = field.expect_once(text)?;
    let number = span
        .group(&field.matcher, "num")
        .ok_or_else(|| Error::MissingMarker(format!("{trailing_label}: number token")))?;
    debug!("{}: replacing number at {:?}", trailing_label, number);
    Ok(splice(text, &[(number, new_number)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn visible_text(xml: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in xml.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_literal_once() {
        let xml = "<w:body><w:p><w:r><w:t>Doğukan yurt</w:t></w:r></w:p></w:body>";
        let out = replace_literal_once(xml, "Doğukan yurt", "Ahmet Yılmaz", "Ad Soyad").unwrap();
        assert_eq!(
            out,
            "<w:body><w:p><w:r><w:t>Ahmet Yılmaz</w:t></w:r></w:p></w:body>"
        );
        assert_eq!(
            out.len() as isize - xml.len() as isize,
            "Ahmet Yılmaz".len() as isize - "Doğukan yurt".len() as isize
        );
    }

    #[test]
    fn test_literal_missing_or_repeated() {
        let err = replace_literal_once("<w:t>x</w:t>", "y", "z", "Y").unwrap_err();
        assert!(err.is_template_integrity());

        let xml = "<w:t>Doğukan yurt</w:t><w:t>Doğukan yurt</w:t>";
        let err = replace_literal_once(xml, "Doğukan yurt", "Ahmet", "Ad Soyad").unwrap_err();
        assert!(matches!(err, Error::FieldCount { found: 2, .. }));
    }

    #[test]
    fn test_dual_date_dotted() {
        let anchor = AnchorDate::new("20.10.2025").unwrap();
        let out = replace_date_once("<w:t>20.10.2025</w:t>", &anchor, "01/12/2025", "Tarih").unwrap();
        assert!(out.contains("01/12/2025"));
        assert!(!out.contains("20.10.2025"));
    }

    #[test]
    fn test_dual_date_slashed() {
        let anchor = AnchorDate::new("20.10.2025").unwrap();
        assert_eq!(anchor.slashed(), "20/10/2025");
        let out = replace_date_once("<w:t>20/10/2025</w:t>", &anchor, "01/12/2025", "Tarih").unwrap();
        assert_eq!(out, "<w:t>01/12/2025</w:t>");
    }

    #[test]
    fn test_dual_date_both_forms_fail() {
        let anchor = AnchorDate::new("20/10/2025").unwrap();
        assert_eq!(anchor.dotted(), "20.10.2025");
        let xml = "<w:t>20.10.2025</w:t><w:t>20/10/2025</w:t>";
        let err = replace_date_once(xml, &anchor, "01/12/2025", "Tarih").unwrap_err();
        assert!(matches!(err, Error::FieldCount { found: 2, .. }));
        assert!(replace_date_once("", &anchor, "01/12/2025", "Tarih").is_err());
    }

    #[test]
    fn test_anchor_date_needs_day_month_year() {
        for bad in ["2025", "20-10-2025", "20.10.25", "2O.10.2025", ""] {
            let err = AnchorDate::new(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidValue(_)), "{bad}");
        }
        let mixed = AnchorDate::new("20.10/2025").unwrap();
        assert_eq!(mixed.dotted(), "20.10.2025");
        assert_eq!(mixed.slashed(), "20/10/2025");
    }

    #[test]
    fn test_case_number_single_run() {
        let xml = "<w:p><w:r><w:t>Esas No: 2025/357</w:t></w:r></w:p>";
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert_eq!(visible_text(&out), "Esas No: 2026/77");
    }

    #[test]
    fn test_case_number_label_run_split() {
        let xml = concat!(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">Esas No: </w:t></w:r>\n",
            "<w:r><w:t>2025/357</w:t></w:r></w:p>"
        );
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert_eq!(visible_text(&out), "Esas No: \n2026/77");
        assert!(out.contains("<w:b/>"));
    }

    #[test]
    fn test_case_number_year_split() {
        let xml = concat!(
            "<w:p><w:r><w:t xml:space=\"preserve\">Esas No: 2025/</w:t></w:r>",
            "<w:r w:rsidR=\"00A1\">\n<w:rPr><w:i/></w:rPr><w:t>357</w:t></w:r></w:p>"
        );
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert!(out.contains(">Esas No: 2026/</w:t>"));
        assert!(out.contains("<w:t>77</w:t>"));
        assert_eq!(visible_text(&out).replace('\n', ""), "Esas No: 2026/77");
    }

    #[test]
    fn test_case_number_ambiguous_form_fails_early() {
        // Two single-run matches; a valid year-split match is never reached.
        let xml = concat!(
            "<w:t>Esas No: 2025/1</w:t><w:t>Esas No: 2025/2</w:t>",
            "<w:t>Esas No: 2025/</w:t></w:r><w:r><w:t>3</w:t>"
        );
        let err = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap_err();
        match err {
            Error::AmbiguousField { form, found, .. } => {
                assert_eq!(form, "single-run");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_number_split_around_proofing_mark() {
        let xml = concat!(
            "<w:p><w:r><w:t xml:space=\"preserve\">Esas No: </w:t></w:r>",
            "<w:proofErr w:type=\"spellStart\"/><w:r><w:t>2025/357</w:t></w:r></w:p>"
        );
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert_eq!(visible_text(&out), "Esas No: 2026/77");
        assert!(out.contains("<w:proofErr w:type=\"spellStart\"/>"));

        let xml = concat!(
            "<w:p><w:r><w:t>Esas No: 2025/</w:t></w:r>",
            "<w:proofErr w:type=\"spellEnd\"/><w:r><w:t>357</w:t></w:r></w:p>"
        );
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert_eq!(visible_text(&out), "Esas No: 2026/77");
    }

    #[test]
    fn test_case_number_label_run_split_ambiguous() {
        let xml = concat!(
            "<w:r><w:t>Esas No:</w:t></w:r><w:r><w:t>2025/1</w:t></w:r>",
            "<w:r><w:t>Esas No:</w:t></w:r><w:r><w:t>2025/2</w:t></w:r>"
        );
        let err = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap_err();
        match err {
            Error::AmbiguousField { form, found, .. } => {
                assert_eq!(form, "label-run-split");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_number_year_split_ambiguous() {
        let xml = concat!(
            "<w:r><w:t>Esas No: 2025/</w:t></w:r><w:r><w:t>1</w:t></w:r>",
            "<w:r><w:t>Esas No: 2025/</w:t></w:r><w:r><w:t>2</w:t></w:r>"
        );
        let err = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap_err();
        match err {
            Error::AmbiguousField { form, found, .. } => {
                assert_eq!(form, "year-split");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_number_label_run_split_wins_over_year_split() {
        // One label-run-split match; a year-split shape elsewhere is left alone.
        let xml = concat!(
            "<w:p><w:r><w:t>Esas No:</w:t></w:r><w:r><w:t>2025/357</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>Esas No: 2024/</w:t></w:r><w:r><w:t>9</w:t></w:r></w:p>"
        );
        let out = replace_case_number_once(xml, "Esas No:", "2026/77").unwrap();
        assert_eq!(
            out,
            concat!(
                "<w:p><w:r><w:t>Esas No:</w:t></w:r><w:r><w:t>2026/77</w:t></w:r></w:p>",
                "<w:p><w:r><w:t>Esas No: 2024/</w:t></w:r><w:r><w:t>9</w:t></w:r></w:p>"
            )
        );
    }

    #[test]
    fn test_case_number_missing() {
        let err = replace_case_number_once("<w:t>Dosya</w:t>", "Esas No:", "2026/77").unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
        assert!(err.is_template_integrity());
    }

    #[test]
    fn test_case_number_value_needs_separator() {
        let err = replace_case_number_once("<w:t>Esas No: 2025/1</w:t>", "Esas No:", "77").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_date_near_label() {
        let xml = concat!(
            "<w:p><w:r><w:t xml:space=\"preserve\">Mahkemenizin </w:t></w:r>",
            "<w:r><w:rPr><w:b/></w:rPr><w:t>12/09/2025</w:t></w:r>",
            "<w:r><w:t xml:space=\"preserve\"> tarihli yazısı</w:t></w:r></w:p>"
        );
        let out = replace_date_near_label_once(xml, "Mahkemenizin", "tarihli", "03/11/2025").unwrap();
        assert_eq!(visible_text(&out), "Mahkemenizin 03/11/2025 tarihli yazısı");
    }

    #[test]
    fn test_date_near_label_across_paragraphs_fails() {
        let xml = concat!(
            "<w:p><w:r><w:t>Mahkemenizin</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>12/09/2025 tarihli</w:t></w:r></w:p>"
        );
        let err = replace_date_near_label_once(xml, "Mahkemenizin", "tarihli", "03/11/2025").unwrap_err();
        assert!(matches!(err, Error::FieldCount { found: 0, .. }));
    }

    #[test]
    fn test_numeric_prefix() {
        let xml = "<w:p><w:r><w:t>3.</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Asliye Hukuk</w:t></w:r></w:p>";
        let out = replace_numeric_prefix_once(xml, "12", "Asliye Hukuk").unwrap();
        assert_eq!(visible_text(&out), "12. Asliye Hukuk");
    }

    #[test]
    fn test_numeric_prefix_repeated_fails() {
        let xml = "<w:t>3. Asliye Hukuk</w:t><w:t>4. Asliye Hukuk</w:t>";
        assert!(replace_numeric_prefix_once(xml, "12", "Asliye Hukuk").is_err());
    }
}
