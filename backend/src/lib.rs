//! Backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the account model,
//! use-case services and ports; [`inbound`] adapts HTTP onto the driving
//! ports; [`outbound`] implements the driven ports with PostgreSQL,
//! in-memory stores, JWT/Argon2 and Google OAuth.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
