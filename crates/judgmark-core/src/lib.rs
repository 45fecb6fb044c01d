pub mod record;
pub mod schema;

pub use record::ExtractionResult;
pub use schema::{EMPTY_VALUE, FIELD_SCHEMA, is_schema_field, schema_position};
