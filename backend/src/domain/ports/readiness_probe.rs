//! Driven port for checking that a backing dependency answers.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by readiness probes.
    pub enum ReadinessError {
        /// The dependency did not answer.
        Unavailable { message: String } => "dependency unavailable: {message}",
    }
}

/// Cheap round-trip against a dependency, used by the readiness endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn check(&self) -> Result<(), ReadinessError>;
}
