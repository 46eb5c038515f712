//! Shared types for the API layer.

use std::sync::Arc;

use crate::invoice::{PdfInvoiceExtractor, TableExtractor};
use crate::state::AppState;

/// Shared context for all routes: the application state plus the
/// invoice extraction capability. The extractor is wired here — the
/// composition root — so the capability is declared statically rather
/// than discovered at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub extractor: Arc<dyn TableExtractor>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            extractor: Arc::new(PdfInvoiceExtractor),
        }
    }

    /// Swap the extraction backend. Used by tests that stub the PDF
    /// engine.
    #[cfg(test)]
    pub(crate) fn with_extractor(
        state: Arc<AppState>,
        extractor: Arc<dyn TableExtractor>,
    ) -> Self {
        Self { state, extractor }
    }
}
