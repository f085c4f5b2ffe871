//! Domain types and pure business rules for the stockroom inventory service.
//!
//! Nothing in this crate touches the database or the network; the `db`,
//! `cloud` and `api` crates build on the types and validation defined here.

pub mod activity;
pub mod auth;
pub mod category;
pub mod error;
pub mod expiration;
pub mod images;
pub mod inventory;
pub mod similarity;
pub mod tenant;
pub mod types;
