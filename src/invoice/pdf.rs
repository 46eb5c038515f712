//! PDF-backed invoice extraction using the document's text layer.
//!
//! Scanned invoices without a text layer come back empty rather than
//! erroring; only a structurally broken document is a failure.

use super::table::{self, InvoiceRow};
use super::{InvoiceError, TableExtractor};

/// Extracts line items from digital PDFs via the pdf-extract crate.
pub struct PdfInvoiceExtractor;

impl TableExtractor for PdfInvoiceExtractor {
    fn extract(&self, document: &[u8]) -> Result<Vec<InvoiceRow>, InvoiceError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(document)
            .map_err(|e| InvoiceError::PdfParsing(e.to_string()))?;

        let rows: Vec<InvoiceRow> = pages
            .iter()
            .flat_map(|text| table::extract_rows_from_text(text))
            .collect();
        tracing::debug!(pages = pages.len(), rows = rows.len(), "invoice extraction");
        Ok(rows)
    }
}
