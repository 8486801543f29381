//! Invoice persistence for invoice-dashboard.
//!
//! Every write is a single statement keyed by id. Update and delete make
//! no prior existence check; a write that matches no row is a no-op.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateInvoice, Invoice, UpdateInvoice};
use crate::services::metrics::DB_QUERY_DURATION;

/// The invoice store, passed into handlers as an explicit dependency so
/// it can be substituted in tests.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError>;
    async fn update_invoice(&self, invoice_id: Uuid, input: &UpdateInvoice)
        -> Result<(), AppError>;
    async fn delete_invoice(&self, invoice_id: Uuid) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-dashboard"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for Database {
    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Insert a new invoice with a freshly generated id.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id))]
    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let invoice_id = Uuid::new_v4();
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, amount, status, date
            "#,
        )
        .bind(invoice_id)
        .bind(&input.customer_id)
        .bind(input.amount_cents)
        .bind(input.status.as_str())
        .bind(input.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        timer.observe_duration();

        info!(invoice_id = %invoice.id, amount_cents = invoice.amount_cents, "Invoice created");

        Ok(invoice)
    }

    /// Overwrite the mutable columns of an invoice. `date` is write-once
    /// and never touched here.
    #[instrument(skip(self, input), fields(invoice_id = %invoice_id))]
    async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: &UpdateInvoice,
    ) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $2, amount = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .bind(&input.customer_id)
        .bind(input.amount_cents)
        .bind(input.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            debug!(invoice_id = %invoice_id, "Update matched no invoice");
        } else {
            info!(invoice_id = %invoice_id, "Invoice updated");
        }

        Ok(())
    }

    /// Delete an invoice by id. Deleting an absent row is a no-op.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    async fn delete_invoice(&self, invoice_id: Uuid) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to delete invoice: {}", e)))?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            debug!(invoice_id = %invoice_id, "Delete matched no invoice");
        } else {
            info!(invoice_id = %invoice_id, "Invoice deleted");
        }

        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    pub invoices: Mutex<HashMap<Uuid, Invoice>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let invoice = Invoice {
            id: Uuid::new_v4(),
            customer_id: input.customer_id.clone(),
            amount_cents: input.amount_cents,
            status: input.status.as_str().to_string(),
            date: input.date,
        };
        self.invoices
            .lock()
            .unwrap()
            .insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: &UpdateInvoice,
    ) -> Result<(), AppError> {
        if let Some(invoice) = self.invoices.lock().unwrap().get_mut(&invoice_id) {
            invoice.customer_id = input.customer_id.clone();
            invoice.amount_cents = input.amount_cents;
            invoice.status = input.status.as_str().to_string();
        }
        Ok(())
    }

    async fn delete_invoice(&self, invoice_id: Uuid) -> Result<(), AppError> {
        self.invoices.lock().unwrap().remove(&invoice_id);
        Ok(())
    }
}
