//! Repository layer.
//!
//! [`UserRepository`] is the capability the authentication service needs from
//! storage. [`PgUserRepo`] backs it with PostgreSQL; [`MemoryUserRepo`] keeps
//! everything in process for tests and local runs.

pub mod memory_user_repo;
pub mod user_repo;

pub use memory_user_repo::MemoryUserRepo;
pub use user_repo::{PgUserRepo, RepoError, UserRepository};
