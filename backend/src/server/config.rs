//! Application settings loaded via OrthoConfig, and the server configuration
//! built from them.

use std::net::SocketAddr;

use backend::domain::GoogleOAuthConfig;
use backend::outbound::persistence::DbPool;
use backend::outbound::security::TokenSettings;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GOOGLE_REDIRECT_URI: &str = "http://localhost:8080/api/v1/auth/google/callback";

/// Configuration values read from `TRAVEL_*` environment variables,
/// configuration files and the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAVEL")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Google OAuth client id; Google sign-in is disabled without it.
    pub google_client_id: Option<String>,
    /// Google OAuth client secret.
    pub google_client_secret: Option<String>,
    /// Callback URL registered with Google.
    pub google_redirect_uri: Option<String>,
    /// Frontend URL the Google callback returns to by default.
    pub frontend_url: Option<String>,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Google OAuth client configuration.
    pub fn google(&self) -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: non_blank(self.google_client_id.as_deref()),
            client_secret: non_blank(self.google_client_secret.as_deref()),
            redirect_uri: self
                .google_redirect_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_GOOGLE_REDIRECT_URI.to_owned()),
            frontend_url: non_blank(self.frontend_url.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) google: GoogleOAuthConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration without a database.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings, google: GoogleOAuthConfig) -> Self {
        Self {
            bind_addr,
            tokens,
            google,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel repositories and reports
    /// the pool as a readiness dependency.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
