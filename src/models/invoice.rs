//! Invoice model for invoice-dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Parse a status from form input. Anything outside the two defined
    /// values is rejected, not defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// A persisted invoice row. The `amount` column stores minor currency
/// units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    #[sqlx(rename = "amount")]
    pub amount_cents: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Input for inserting a new invoice. `date` is the creation date,
/// computed by the caller at write time and never updated afterwards.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Input for updating the mutable columns of an invoice. `id` and `date`
/// are not updatable.
#[derive(Debug, Clone)]
pub struct UpdateInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_defined_values_only() {
        assert_eq!(InvoiceStatus::parse("pending"), Some(InvoiceStatus::Pending));
        assert_eq!(InvoiceStatus::parse("paid"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::parse("overdue"), None);
        assert_eq!(InvoiceStatus::parse("Pending"), None);
        assert_eq!(InvoiceStatus::parse(""), None);
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [InvoiceStatus::Pending, InvoiceStatus::Paid] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
    }
}
