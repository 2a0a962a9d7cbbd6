//! Case values entered for one letter

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Value keys referenced by profile fields
pub mod keys {
    pub const FULL_NAME: &str = "full_name";
    pub const NATIONAL_ID: &str = "national_id";
    /// `<year>/<number>`, built from [`super::CaseValues::case_number`]
    pub const CASE_NUMBER: &str = "case_number";
    pub const COURT_DATE: &str = "court_date";
    pub const PREPARED_DATE: &str = "prepared_date";
}

/// Values for one filled letter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseValues {
    pub full_name: String,
    /// Turkish national identity number (TC Kimlik No)
    pub national_id: String,
    /// Case number without the year
    pub case_number: String,
    /// Date the court sent its letter, `DD/MM/YYYY`
    pub court_date: String,
    /// Date this letter is prepared, `DD/MM/YYYY`
    pub prepared_date: String,
    /// Year prefixed to the case number
    pub year: i32,
    /// Additional values for profile-specific fields
    pub extra: BTreeMap<String, String>,
}

impl CaseValues {
    /// Full case reference, e.g. `2026/77`
    pub fn case_reference(&self) -> String {
        format!("{}/{}", self.year, self.case_number)
    }

    /// Look up the value for a profile key
    pub fn resolve(&self, key: &str) -> Result<String> {
        let value = match key {
            keys::FULL_NAME => self.full_name.clone(),
            keys::NATIONAL_ID => self.national_id.clone(),
            keys::CASE_NUMBER => self.case_reference(),
            keys::COURT_DATE => self.court_date.clone(),
            keys::PREPARED_DATE => self.prepared_date.clone(),
            other => self
                .extra
                .get(other)
                .cloned()
                .ok_or_else(|| Error::InvalidValue(format!("no value for '{other}'")))?,
        };
        Ok(value)
    }

    /// Check every value before anything is converted
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::InvalidValue("name must not be empty".into()));
        }
        check_digits("national id", &self.national_id)?;
        check_digits("case number", &self.case_number)?;
        check_date("court date", &self.court_date)?;
        check_date("preparation date", &self.prepared_date)?;
        Ok(())
    }
}

fn check_digits(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidValue(format!("{field} must not be empty")));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidValue(format!("{field} must contain digits only")));
    }
    Ok(())
}

fn check_date(field: &str, value: &str) -> Result<()> {
    let shape_ok = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(Error::InvalidValue(format!("{field} must be DD/MM/YYYY, got '{value}'")));
    }
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .map_err(|_| Error::InvalidValue(format!("{field} '{value}' is not a calendar date")))?;
    Ok(())
}
