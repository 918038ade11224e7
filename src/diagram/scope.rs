//! Per-diagram id scoping for engine SVG output.
//!
//! The engine names its markers with fixed ids (`arrow`, `arrow-start`), so
//! two diagrams inlined into one page would share them. Every id and
//! `#fragment` reference inside the document is prefixed with the diagram
//! id, and the root element takes the diagram id itself.

use crate::diagram::ids::DiagramId;

/// Rewrites `svg` so its ids are unique to `id`.
///
/// Only markup inside tags is touched; text content is left as is.
#[must_use]
pub fn scope_svg(svg: &str, id: &DiagramId) -> String {
    let prefix = id.as_str();
    let mut out = String::with_capacity(svg.len() + 64);
    let mut root_tagged = false;

    let mut pieces = svg.split('<');
    if let Some(leading) = pieces.next() {
        out.push_str(leading);
    }
    for piece in pieces {
        out.push('<');
        let (tag, text) = piece.split_once('>').map_or((piece, None), |(t, rest)| (t, Some(rest)));

        let mut tag = tag
            .replace(" id=\"", &format!(" id=\"{prefix}-"))
            .replace("url(#", &format!("url(#{prefix}-"))
            .replace("href=\"#", &format!("href=\"#{prefix}-"));
        if !root_tagged && let Some(rest) = tag.strip_prefix("svg") {
            tag = format!("svg id=\"{prefix}\" class=\"flowchart\"{rest}");
            root_tagged = true;
        }

        out.push_str(&tag);
        if let Some(text) = text {
            out.push('>');
            out.push_str(text);
        }
    }
    out
}
