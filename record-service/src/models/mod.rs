pub mod record;

pub use record::{Image, Record, RecordChanges};
