//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use teahouse::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) allowed_origin: Option<String>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` over `db_pool`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            allowed_origin: None,
        }
    }

    /// Restrict CORS to a single origin. Any origin is allowed otherwise.
    #[must_use]
    pub fn with_allowed_origin(mut self, origin: Option<String>) -> Self {
        self.allowed_origin = origin;
        self
    }
}
