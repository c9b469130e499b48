//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Runs the access guard on the `Authorization` header.

pub mod auth;
