//! Unconditional layout tweaks applied after substitution

use crate::error::{Error, Result};
use crate::markup::patterns::{self, JUSTIFIED, LEFT_ALIGNED, RUN_OPEN, TAB};
use log::{debug, warn};

/// Remove one tab stop from the spacer run in front of the header marker.
///
/// The spacer is the second-to-last run opened before `marker`; the last one
/// is the run holding the marker itself.
pub fn tighten_header_spacing(xml: &str, marker: &str) -> Result<String> {
    let marker_idx = xml
        .find(marker)
        .ok_or_else(|| Error::MissingMarker(format!("header marker {marker:?}")))?;

    let run_open = patterns::compile(RUN_OPEN)?;
    let starts: Vec<usize> = run_open
        .find_iter(&xml[..marker_idx])
        .map(|m| m.start())
        .collect();
    let &[.., spacer_start, header_start] = starts.as_slice() else {
        return Err(Error::MissingMarker(format!(
            "two runs before header marker (found {})",
            starts.len()
        )));
    };

    let spacer = &xml[spacer_start..header_start];
    let tab = patterns::compile(TAB)?;
    let found = tab
        .find(spacer)
        .ok_or_else(|| Error::MissingMarker("tab stop in header spacer run".into()))?;

    debug!("removing header tab at {}", spacer_start + found.start());
    let mut out = String::with_capacity(xml.len());
    out.push_str(&xml[..spacer_start + found.start()]);
    out.push_str(&xml[spacer_start + found.end()..]);
    Ok(out)
}

/// Turn every justified paragraph into a left-aligned one
pub fn normalize_alignment(xml: &str) -> Result<String> {
    let justified = patterns::compile(JUSTIFIED)?;
    let count = justified.find_iter(xml).count();
    if count == 0 {
        warn!("no justified paragraphs to normalize");
        return Ok(xml.to_string());
    }
    debug!("left-aligning {} justified paragraph(s)", count);
    Ok(justified.replace_all(xml, LEFT_ALIGNED).into_owned())
}
