//! Invoice line-item extraction.
//!
//! The real engine is the document's own table structure; this module
//! only recovers it best-effort from extracted text. The API consumes
//! the capability through one narrow trait so the PDF backend is wired
//! in explicitly at composition time, not discovered at startup.

pub mod pdf;
pub mod table;

pub use pdf::PdfInvoiceExtractor;
pub use table::InvoiceRow;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),
}

/// Turn an uploaded document into line-item rows.
pub trait TableExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<Vec<InvoiceRow>, InvoiceError>;
}
