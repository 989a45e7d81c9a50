// ABOUTME: Migration stages module
// ABOUTME: Schema cloning, object streaming, and the count sanity check

pub mod sanity;
pub mod schema;
pub mod stream;

pub use sanity::{count_comparison, CountReport};
pub use schema::{clone_schema, SchemaCloneReport};
pub use stream::{stream_collection, ObjectBatcher, StreamStats};
