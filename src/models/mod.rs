pub mod form;
pub mod invoice;

pub use form::{InvoiceForm, InvoiceInput};
pub use invoice::{CreateInvoice, Invoice, InvoiceStatus, UpdateInvoice};
