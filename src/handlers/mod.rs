pub mod invoices;

pub use invoices::{create_invoice, delete_invoice, update_invoice, INVOICES_PATH};
