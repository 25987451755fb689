//! Data models representing database entities and API payloads.

/// Balance entity, requests and view
pub mod balance;
/// Pagination and search parameters
pub mod list;
/// Payment entity (read-only here)
pub mod payment;
