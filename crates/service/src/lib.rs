//! Service layer for the agency content backend.
//! - `store`: the row store contract and its backends (memory, hosted REST, Postgres).
//! - `cache`: per-table query cache invalidated on every write.
//! - `catalog`: read-side assembly of the service tree and flat lists.
//! - `admin`: validated create/update/delete for every content table.

pub mod errors;
pub mod store;
pub mod cache;
pub mod catalog;
pub mod admin;
pub mod observability;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use store::{RowStore, StoreError};
