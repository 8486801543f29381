//! Invoice write handlers.
//!
//! Each handler follows the same shape: validate the form, persist,
//! invalidate the cached listing view, then (create and update only)
//! redirect the client to it. Invalidation always happens before the
//! redirect so the destination never renders stale data.

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::Redirect,
};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateInvoice, InvoiceForm, UpdateInvoice};
use crate::services::metrics::INVOICE_WRITES_TOTAL;
use crate::startup::AppState;

/// The invoice listing view: the invalidation target and the redirect
/// destination after create and update.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

async fn invalidate_listing(state: &AppState) {
    // A stale cached view is recoverable; the committed write is not
    // rolled back over it.
    if let Err(e) = state.cache.invalidate(INVOICES_PATH).await {
        warn!(error = %e, path = INVOICES_PATH, "Failed to invalidate listing view");
    }
}

/// `POST /dashboard/invoices`
#[instrument(skip(state, form))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> Result<Redirect, AppError> {
    let input = form.into_validated(&state.config.validation)?;

    let invoice = state
        .store
        .create_invoice(&CreateInvoice {
            customer_id: input.customer_id,
            amount_cents: input.amount_cents,
            status: input.status,
            date: Utc::now().date_naive(),
        })
        .await?;

    INVOICE_WRITES_TOTAL.with_label_values(&["create"]).inc();
    info!(invoice_id = %invoice.id, "Invoice create handled");

    invalidate_listing(&state).await;
    Ok(Redirect::to(INVOICES_PATH))
}

/// `POST /dashboard/invoices/:id`
#[instrument(skip(state, form), fields(invoice_id = %invoice_id))]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Form(form): Form<InvoiceForm>,
) -> Result<Redirect, AppError> {
    let input = form.into_validated(&state.config.validation)?;

    state
        .store
        .update_invoice(
            invoice_id,
            &UpdateInvoice {
                customer_id: input.customer_id,
                amount_cents: input.amount_cents,
                status: input.status,
            },
        )
        .await?;

    INVOICE_WRITES_TOTAL.with_label_values(&["update"]).inc();
    info!(invoice_id = %invoice_id, "Invoice update handled");

    invalidate_listing(&state).await;
    Ok(Redirect::to(INVOICES_PATH))
}

/// `POST /dashboard/invoices/:id/delete`
///
/// Deletes never navigate; the caller stays on the listing view.
#[instrument(skip(state), fields(invoice_id = %invoice_id))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_invoice(invoice_id).await?;

    INVOICE_WRITES_TOTAL.with_label_values(&["delete"]).inc();
    info!(invoice_id = %invoice_id, "Invoice delete handled");

    invalidate_listing(&state).await;
    Ok(StatusCode::NO_CONTENT)
}
