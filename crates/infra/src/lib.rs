//! Infrastructure layer: document storage and the repositories built on it.

pub mod employees;
pub mod store;

pub use employees::{DirectoryError, EmployeeDirectory};
pub use store::{
    collections, Document, DocumentStore, Filter, InMemoryDocumentStore, InsertResult,
    PostgresDocumentStore, StoreError, UpdateResult,
};
