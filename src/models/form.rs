//! Form input validation for invoice writes.
//!
//! The submitting form posts `customerId`, `amount` and `status` as
//! strings. Validation runs in a fixed order: missing-field checks first,
//! then coercion of `amount`, then the status enum, then schema and
//! policy checks. The validated amount is converted to minor currency
//! units before it reaches the store.

use serde::Deserialize;
use validator::Validate;

use crate::config::ValidationConfig;
use crate::error::AppError;
use crate::models::invoice::InvoiceStatus;

/// Raw form bag as submitted. All fields optional so that absence is
/// reported as a missing-field failure instead of a deserialization
/// rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Coerced record checked against the schema.
#[derive(Debug, Validate)]
struct ValidatedInvoice {
    #[validate(length(min = 1, message = "customer id must not be empty"))]
    customer_id: String,
    amount: f64,
    status: InvoiceStatus,
}

/// Validated write input with the amount in cents.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

fn require_field(value: Option<String>, name: &'static str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField(name)),
    }
}

impl InvoiceForm {
    /// Run the full validation pipeline against the given amount policy.
    pub fn into_validated(self, policy: &ValidationConfig) -> Result<InvoiceInput, AppError> {
        let customer_id = require_field(self.customer_id, "customerId")?;
        let amount_raw = require_field(self.amount, "amount")?;
        let status_raw = require_field(self.status, "status")?;

        let amount: f64 = amount_raw.trim().parse().map_err(|_| AppError::InvalidField {
            field: "amount",
            reason: format!("`{}` is not a number", amount_raw),
        })?;
        if !amount.is_finite() {
            return Err(AppError::InvalidField {
                field: "amount",
                reason: "amount must be a finite number".to_string(),
            });
        }

        let status = InvoiceStatus::parse(status_raw.trim()).ok_or_else(|| {
            AppError::InvalidField {
                field: "status",
                reason: format!("`{}` is not one of pending, paid", status_raw),
            }
        })?;

        let candidate = ValidatedInvoice {
            customer_id,
            amount,
            status,
        };
        candidate.validate()?;

        if policy.reject_non_positive && candidate.amount <= 0.0 {
            return Err(AppError::InvalidField {
                field: "amount",
                reason: "amount must be positive".to_string(),
            });
        }
        if let Some(max) = policy.max_amount {
            if candidate.amount > max {
                return Err(AppError::InvalidField {
                    field: "amount",
                    reason: format!("amount exceeds the configured maximum of {}", max),
                });
            }
        }

        Ok(InvoiceInput {
            customer_id: candidate.customer_id,
            amount_cents: (candidate.amount * 100.0).round() as i64,
            status: candidate.status,
        })
    }
}
