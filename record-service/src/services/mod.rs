pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoRecordStore;
pub use memory::InMemoryRecordStore;
pub use metrics::{get_metrics, init_metrics, record_write};
pub use store::RecordStore;
