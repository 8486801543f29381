pub mod cache;
pub mod database;
pub mod metrics;

pub use cache::{MockCache, RedisCache, ViewCache};
pub use database::{Database, InvoiceStore, MemoryStore};
pub use metrics::{get_metrics, init_metrics};
