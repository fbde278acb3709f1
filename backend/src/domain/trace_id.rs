//! Request correlation identifier.
//!
//! The `Trace` middleware runs each request inside a [`TraceId`] scope. An
//! identifier supplied by an upstream proxy in the `trace-id` header is
//! reused when it is a UUID, so one request can be followed across the
//! proxy and this service. Domain errors capture the identifier when they
//! are constructed and it ends up in the error body.
//!
//! The scope is a tokio task-local and does not follow `tokio::spawn`; wrap
//! spawned work in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the trace identifier on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Identifier correlating one request's logs, response header and error body.
///
/// # Examples
/// ```
/// use backend::TraceId;
///
/// let id = TraceId::from_header(" 6f1c9a1e-8f0b-4c55-9a53-0d1f5b9f2c11 ")
///     .expect("uuid header");
/// assert_eq!(id.to_string(), "6f1c9a1e-8f0b-4c55-9a53-0d1f5b9f2c11");
/// assert!(TraceId::from_header("not-a-uuid").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// A fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Accept an identifier forwarded by an upstream hop.
    ///
    /// Only UUIDs are accepted; anything else is ignored so callers cannot
    /// inject arbitrary text into logs.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
