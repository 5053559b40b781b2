//! HTTP handler modules, one per API surface.

pub mod analytics;
pub mod public_quotes;
pub mod quotes;

use ridgeline_core::quote_status::QuoteStatus;
use ridgeline_db::models::quote::Quote;

use crate::error::AppError;

/// Parse the stored status column of a quote row.
///
/// The database CHECK constraint guarantees this never fails; if it does,
/// the row is corrupt and the client sees a sanitized 500.
pub(crate) fn stored_status(quote: &Quote) -> Result<QuoteStatus, AppError> {
    QuoteStatus::parse(&quote.status).map_err(|_| {
        AppError::InternalError(format!(
            "quote {} has invalid stored status '{}'",
            quote.id, quote.status
        ))
    })
}
