//! Authentication core.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Signed, time-bound identity tokens.
//! - [`revocation`] -- Time-expiring record of tokens invalidated early.
//! - [`service`] -- Sign-up and sign-in orchestration over a [`UserRepository`].
//! - [`guard`] -- Request-time gate: bearer extraction, revocation, verification.
//!
//! [`UserRepository`]: tollgate_db::repositories::UserRepository

pub mod guard;
pub mod jwt;
pub mod password;
pub mod revocation;
pub mod service;
