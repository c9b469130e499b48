//! Domain types and validation shared by the tollgate crates.

pub mod credentials;
pub mod error;
pub mod types;
