pub mod records;

pub use records::{MessageResponse, RecordInput, RecordResponse};
