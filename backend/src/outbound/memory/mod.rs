//! In-memory adapters used when the server runs without a database and by
//! the integration tests.

mod token_revocation_store;
mod user_repository;

pub use token_revocation_store::InMemoryTokenRevocationStore;
pub use user_repository::InMemoryUserRepository;
