//! Largest-font title mining over extracted text spans.
//!
//! The first page of a typical paper puts its title in the biggest font, so
//! the mined candidate is the concatenation of the largest-size spans in
//! document order. The document metadata title is the second candidate.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::Result;

use crate::filename::{EMPTY_TITLE, MAX_TITLE_LEN, sanitize_title};

/// Horizontal left-to-right writing direction.
pub const HORIZONTAL_LTR: (f32, f32) = (1.0, 0.0);

/// Spans this short are decorative glyphs (drop caps), never title text.
const MIN_SPAN_CHARS: usize = 2;

/// Hard cap on accepted spans, bounds dense same-size layouts.
const MAX_TITLE_SPANS: i32 = 5;

/// Metadata titles this short (trimmed) are discarded as noise.
const MIN_META_CHARS: usize = 5;

/// One run of same-style text on a page line.
#[derive(Clone, Debug)]
pub struct TextSpan {
    pub size: f32,
    pub text: String,
    pub origin: (f32, f32),
    pub dir: (f32, f32),
    pub wmode: i32,
}

/// The two title candidates for a document, already sanitized.
/// An empty string means the candidate is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleCandidates {
    pub meta: String,
    pub mined: String,
}

impl TitleCandidates {
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty() && self.mined.is_empty()
    }
}

/// Produces title candidates for a PDF file on disk.
pub trait TitleSource {
    fn candidates(&self, path: &Path) -> Result<TitleCandidates>;
}

/// Concatenate the spans sharing the largest font size on the page.
///
/// Returns the raw title buffer, still unsanitized. Vertical and rotated
/// text is ignored; ties on font size keep document traversal order.
pub fn mine_title(spans: &[TextSpan]) -> String {
    let mut ranked: Vec<&TextSpan> = spans
        .iter()
        .filter(|s| s.dir == HORIZONTAL_LTR && s.wmode == 0)
        .collect();
    // stable sort: equal sizes stay in block -> line -> span order
    ranked.sort_by(|a, b| b.size.partial_cmp(&a.size).unwrap_or(Ordering::Equal));

    let mut largest = 0.0f32;
    let mut buffer = String::new();
    let mut remaining = MAX_TITLE_SPANS;

    for span in ranked {
        if span.text.chars().count() <= MIN_SPAN_CHARS {
            continue;
        }
        if span.size > largest {
            largest = span.size;
            buffer.clear();
            buffer.push_str(span.text.trim());
            buffer.push(' ');
            remaining -= 1;
        } else if span.size == largest {
            buffer.push_str(span.text.trim());
            buffer.push(' ');
            remaining -= 1;
        }
        if remaining < 1 {
            break;
        }
    }
    buffer
}

/// Combine the metadata title and the first-page spans into sanitized
/// candidates. Either side may come out empty.
pub fn build_candidates(meta_title: &str, spans: &[TextSpan]) -> TitleCandidates {
    let trimmed = meta_title.trim();
    let meta = if trimmed.chars().count() > MIN_META_CHARS {
        usable(sanitize_title(trimmed, MAX_TITLE_LEN))
    } else {
        String::new()
    };
    let mined = usable(sanitize_title(&mine_title(spans), MAX_TITLE_LEN));
    TitleCandidates { meta, mined }
}

fn usable(sanitized: String) -> String {
    if sanitized == EMPTY_TITLE { String::new() } else { sanitized }
}
