// ABOUTME: Weaviate REST client module
// ABOUTME: Exports the client plus the schema and object wire types

pub mod client;
pub mod objects;
pub mod schema;

pub use client::WeaviateClient;
pub use objects::{BatchResultItem, ObjectRecord, ObjectsPage};
pub use schema::{CollectionDef, Schema};
