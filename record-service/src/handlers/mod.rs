pub mod health;
pub mod records;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use records::{create_record, delete_record, list_records, update_record};
