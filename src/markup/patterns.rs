//! Pattern library for WordprocessingML fragments
//!
//! Patterns work on serialized `document.xml` text. Tags may contain
//! newlines, so every pattern is compiled with `(?s)` and uses `[^>]*`
//! inside tags.

use crate::error::Result;
use regex::Regex;

/// Opening tag of a run (`<w:r>` or `<w:r w:rsidR="..">`, never `<w:rPr>`)
pub const RUN_OPEN: &str = r"<w:r(?:\s[^>]*)?>";

/// Tab stop inside a run
pub const TAB: &str = r"<w:tab\s*/>";

/// Justified paragraph alignment
pub const JUSTIFIED: &str = r#"<w:jc\s+w:val="both"\s*/>"#;

/// Replacement for [`JUSTIFIED`]
pub const LEFT_ALIGNED: &str = r#"<w:jc w:val="left"/>"#;

/// Run properties made of empty child elements only
const RUN_PROPERTIES: &str = r"(?:<w:rPr\s*/>|<w:rPr>(?:\s|<w:[^>]*/>)*</w:rPr>)";

/// Empty markers Word leaves between adjacent runs
const RUN_SIBLINGS: &str =
    r"(?:\s|<w:(?:proofErr|bookmarkStart|bookmarkEnd|lastRenderedPageBreak)\b[^>]*/>)*";

/// Day, month and year separated by dots or slashes
const DATE: &str = r"\d{2}[./]\d{2}[./]\d{4}";

/// End of one run's text, start of the next run's text.
///
/// Matches `</w:t></w:r><w:r ..><w:rPr>..</w:rPr><w:t ..>` with optional
/// whitespace between tags. Proofing marks and bookmarks may sit between
/// the two runs.
pub fn run_break() -> String {
    format!(r"</w:t>\s*</w:r>{RUN_SIBLINGS}{RUN_OPEN}\s*{RUN_PROPERTIES}?\s*<w:t(?:\s[^>]*)?>")
}

/// Markup allowed between two tokens of the same paragraph.
///
/// Any `w:` tag except a paragraph open or close, plus whitespace.
pub fn block_gap() -> &'static str {
    r"(?:\s|<w:[^p/>][^>]*>|<w:p[A-Za-z][^>]*>|</w:[^p>][^>]*>|</w:p[A-Za-z][^>]*>)*"
}

pub fn compile(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("(?s){pattern}"))?)
}

/// Case number written entirely in the label's run: `Esas No: 2025/357`
pub fn case_number_single_run(label: &str) -> Result<Regex> {
    let label = regex::escape(label);
    compile(&format!(r"{label}\s*(?P<num>\d{{4}}/\d+)"))
}

/// Label in one run, the whole number in the next
pub fn case_number_after_label_run(label: &str) -> Result<Regex> {
    let label = regex::escape(label);
    let brk = run_break();
    compile(&format!(r"{label}\s*{brk}\s*(?P<num>\d{{4}}/\d+)"))
}

/// Number split after the separator: `2025/` in one run, `357` in the next
pub fn case_number_split_year(label: &str) -> Result<Regex> {
    let label = regex::escape(label);
    let brk = run_break();
    compile(&format!(
        r"{label}\s*(?:{brk}\s*)?(?P<year>\d{{4}}/){brk}\s*(?P<digits>\d+)"
    ))
}

/// Date between a label and a trailing phrase in one paragraph
pub fn date_near_label(label: &str, trailing: &str) -> Result<Regex> {
    let label = regex::escape(label);
    let trailing = regex::escape(trailing);
    let gap = block_gap();
    compile(&format!(r"{label}{gap}(?P<date>{DATE}){gap}{trailing}"))
}

/// Short number with a trailing period right before a label: `3.</w:t>..Kat`
pub fn numeric_prefix(trailing: &str) -> Result<Regex> {
    let trailing = regex::escape(trailing);
    let gap = block_gap();
    compile(&format!(r"\b(?P<num>\d{{1,3}})\.{gap}{trailing}"))
}
