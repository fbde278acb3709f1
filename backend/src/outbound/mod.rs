//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local stores used without a database
//! - **security**: JWT signing and Argon2 password hashing
//! - **google**: Google OAuth token, userinfo and tokeninfo calls
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod google;
pub mod memory;
pub mod persistence;
pub mod security;
