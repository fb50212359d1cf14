pub mod field_map;

pub use field_map::FieldMap;
