//! Paragraph relocation inside `w:body`

use crate::error::{Error, Result};
use crate::markup::patterns;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::ops::Range;

/// A top-level child of `w:body`
#[derive(Clone, Debug, PartialEq, Eq)]
struct Block {
    range: Range<usize>,
    paragraph: bool,
}

/// Byte range of the content between `<w:body ..>` and `</w:body>`
pub fn body_bounds(xml: &str) -> Result<Range<usize>> {
    let open = patterns::compile(r"<w:body(?:\s[^>]*)?>")?
        .find(xml)
        .ok_or_else(|| Error::MissingMarker("<w:body> opening tag".into()))?;
    let close = xml
        .rfind("</w:body>")
        .filter(|&close| close >= open.end())
        .ok_or_else(|| Error::MissingMarker("</w:body> closing tag".into()))?;
    Ok(open.end()..close)
}

/// Split the body into its top-level elements
fn body_blocks(xml: &str, body: Range<usize>) -> Result<Vec<Block>> {
    let content = &xml[body.clone()];
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<(usize, bool)> = None;

    loop {
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;
        // '<' cannot appear inside attribute values, so the last one before
        // the event end opens the tag.
        let tag_start = || content[..end].rfind('<').unwrap_or(0);

        match event {
            Event::Start(e) => {
                if depth == 0 {
                    open = Some((tag_start(), e.name().local_name().as_ref() == b"p"));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::MissingMarker("balanced body markup".into()))?;
                if depth == 0 {
                    if let Some((start, paragraph)) = open.take() {
                        blocks.push(Block {
                            range: body.start + start..body.start + end,
                            paragraph,
                        });
                    }
                }
            }
            Event::Empty(e) if depth == 0 => {
                blocks.push(Block {
                    range: body.start + tag_start()..body.start + end,
                    paragraph: e.name().local_name().as_ref() == b"p",
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::MissingMarker("balanced body markup".into()));
    }
    Ok(blocks)
}

/// Move the paragraph containing `moved_marker` so it sits right before the
/// first paragraph containing `anchor_marker`.
///
/// Returns the input unchanged when the paragraph is already in place.
pub fn move_paragraph_to_anchor(
    xml: &str,
    moved_marker: &str,
    anchor_marker: &str,
) -> Result<String> {
    let blocks = body_blocks(xml, body_bounds(xml)?)?;
    let holds = |block: &Block, marker: &str| block.paragraph && xml[block.range.clone()].contains(marker);

    let moved: Vec<usize> = (0..blocks.len())
        .filter(|&i| holds(&blocks[i], moved_marker))
        .collect();
    let &[moved] = moved.as_slice() else {
        return Err(Error::FieldCount {
            label: format!("paragraph containing {moved_marker:?}"),
            expected: 1,
            found: moved.len(),
        });
    };

    let anchor = (0..blocks.len())
        .find(|&i| i != moved && holds(&blocks[i], anchor_marker))
        .ok_or_else(|| Error::MissingMarker(format!("anchor paragraph {anchor_marker:?}")))?;

    if moved + 1 == anchor {
        debug!("paragraph {} already precedes anchor", moved);
        return Ok(xml.to_string());
    }

    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.remove(moved);
    let insert_at = if moved < anchor { anchor - 1 } else { anchor };
    order.insert(insert_at, moved);
    debug!("moving paragraph {} before block {}", moved, anchor);

    // Whitespace between blocks stays where it was; only the blocks move.
    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (slot, &source) in blocks.iter().zip(&order) {
        out.push_str(&xml[cursor..slot.range.start]);
        out.push_str(&xml[blocks[source].range.clone()]);
        cursor = slot.range.end;
    }
    out.push_str(&xml[cursor..]);
    Ok(out)
}
