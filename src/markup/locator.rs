//! Field locator: finds a logical value in serialized markup

use crate::error::{Error, Result};
use regex::Regex;
use std::ops::Range;

/// How a field is recognised in the markup
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Exact text, matched non-overlapping from the left
    Literal(String),
    /// Structural pattern, possibly spanning run boundaries
    Pattern(Regex),
}

/// One match of a [`Matcher`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Byte range of the whole match
    pub range: Range<usize>,
    /// Byte ranges of the pattern's capture groups (index 0 is the whole match)
    pub groups: Vec<Option<Range<usize>>>,
}

impl Span {
    /// Range of a named capture group
    pub fn group(&self, matcher: &Matcher, name: &str) -> Option<Range<usize>> {
        let Matcher::Pattern(re) = matcher else {
            return None;
        };
        let index = re.capture_names().position(|n| n == Some(name))?;
        self.groups.get(index).cloned().flatten()
    }
}

/// Match count classification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Occurrence {
    NotFound,
    Once(Span),
    Multiple(usize),
}

/// Find every match of `matcher` in `text`
pub fn locate(text: &str, matcher: &Matcher) -> Vec<Span> {
    match matcher {
        Matcher::Literal(needle) if needle.is_empty() => Vec::new(),
        Matcher::Literal(needle) => text
            .match_indices(needle.as_str())
            .map(|(start, m)| {
                let range = start..start + m.len();
                Span {
                    range: range.clone(),
                    groups: vec![Some(range)],
                }
            })
            .collect(),
        Matcher::Pattern(re) => re
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let groups = caps.iter().map(|g| g.map(|g| g.range())).collect();
                Some(Span {
                    range: whole.range(),
                    groups,
                })
            })
            .collect(),
    }
}

/// A field to find, expected exactly once
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub label: String,
    pub matcher: Matcher,
}

impl FieldSpec {
    /// Field expected exactly once
    pub fn once(label: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            label: label.into(),
            matcher,
        }
    }

    /// Classify how often the field occurs in `text`
    pub fn occurrence(&self, text: &str) -> Occurrence {
        let mut spans = locate(text, &self.matcher);
        match spans.len() {
            0 => Occurrence::NotFound,
            1 => Occurrence::Once(spans.remove(0)),
            n => Occurrence::Multiple(n),
        }
    }

    /// Locate the single occurrence of the field
    pub fn expect_once(&self, text: &str) -> Result<Span> {
        let found = locate(text, &self.matcher);
        match <[Span; 1]>::try_from(found) {
            Ok([span]) => Ok(span),
            Err(found) => Err(Error::FieldCount {
                label: self.label.clone(),
                expected: 1,
                found: found.len(),
            }),
        }
    }
}

/// Replace non-overlapping byte ranges of `text`, given in ascending order
pub fn splice(text: &str, edits: &[(Range<usize>, &str)]) -> String {
    let extra: usize = edits.iter().map(|(_, s)| s.len()).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&text[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
