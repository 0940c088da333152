use std::path::Path;

use anyhow::Result;
use log::debug;
use mupdf::text_page::TextBlockType;
use mupdf::{Document, TextPageFlags};

use crate::title::{HORIZONTAL_LTR, TextSpan, TitleCandidates, TitleSource, build_candidates};

/// Errors from the PDF engine
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF engine: {0}")]
    Engine(#[from] mupdf::error::Error),
}

/// One open PDF document. The underlying handle is released on drop.
pub struct PdfFile {
    doc: Document,
}

impl PdfFile {
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let doc = Document::open(path.to_string_lossy().as_ref())?;
        Ok(Self { doc })
    }

    /// Document metadata title, empty when absent.
    pub fn metadata_title(&self) -> String {
        self.doc
            .metadata(mupdf::MetadataName::Title)
            .unwrap_or_default()
    }

    /// Text spans of the first page, in block -> line -> span order.
    ///
    /// Consecutive characters of a line sharing a font size are grouped into
    /// one span. The bindings do not expose the line writing direction, so it
    /// is derived from the character origins.
    pub fn first_page_spans(&self) -> Result<Vec<TextSpan>, PdfError> {
        if self.doc.page_count()? == 0 {
            return Ok(Vec::new());
        }
        let page = self.doc.load_page(0)?;
        let text_page = page.to_text_page(TextPageFlags::COLLECT_STYLES)?;

        let mut spans = Vec::new();
        for block in text_page.blocks() {
            if block.r#type() != TextBlockType::Text {
                continue;
            }
            for line in block.lines() {
                let chars: Vec<_> = line.chars().collect();
                if chars.is_empty() {
                    continue;
                }

                let first = chars[0].origin();
                let last = chars[chars.len() - 1].origin();
                let dir = dominant_direction(last.x - first.x, last.y - first.y);
                let wmode = i32::from(dir != HORIZONTAL_LTR);

                let mut text = String::new();
                let mut size = 0.0f32;
                let mut origin = (first.x, first.y);
                for ch in &chars {
                    let Some(c) = ch.char() else { continue };
                    let ch_size = ch.size();
                    if text.is_empty() {
                        size = ch_size;
                        origin = (ch.origin().x, ch.origin().y);
                    } else if ch_size != size {
                        spans.push(TextSpan {
                            size,
                            text: std::mem::take(&mut text),
                            origin,
                            dir,
                            wmode,
                        });
                        size = ch_size;
                        origin = (ch.origin().x, ch.origin().y);
                    }
                    text.push(c);
                }
                if !text.is_empty() {
                    spans.push(TextSpan { size, text, origin, dir, wmode });
                }
            }
        }
        Ok(spans)
    }
}

/// Snap a char-origin delta to the closest axis direction.
/// Single-char lines have no delta and count as horizontal.
fn dominant_direction(dx: f32, dy: f32) -> (f32, f32) {
    if dx == 0.0 && dy == 0.0 {
        return HORIZONTAL_LTR;
    }
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 { (1.0, 0.0) } else { (-1.0, 0.0) }
    } else if dy >= 0.0 {
        (0.0, 1.0)
    } else {
        (0.0, -1.0)
    }
}

/// Production title source: opens the file, reads the metadata title and
/// mines the first page. The document is closed before returning.
pub struct PdfTitleSource;

impl TitleSource for PdfTitleSource {
    fn candidates(&self, path: &Path) -> Result<TitleCandidates> {
        let doc = PdfFile::open(path)?;
        let meta = doc.metadata_title();
        let spans = doc.first_page_spans()?;
        debug!(
            "{}: meta title {:?}, {} first-page spans",
            path.display(),
            meta,
            spans.len()
        );
        Ok(build_candidates(&meta, &spans))
    }
}
