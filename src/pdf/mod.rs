//! MuPDF-backed document access

mod document;

pub use document::{PdfError, PdfFile, PdfTitleSource};
