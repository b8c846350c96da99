//! Application constants for the console store
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Overrides the remote API base URL
    pub const API_BASE_URL: &str = "CONSOLE_API_BASE_URL";

    /// Overrides the persisted session file location
    pub const SESSION_PATH: &str = "CONSOLE_SESSION_PATH";
}

/// Remote API endpoints and wire constants
pub mod api {
    /// Default remote API base URL
    pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

    /// Path segments of the login endpoint
    pub const LOGIN_PATH: &[&str] = &["auth", "login"];

    /// Path segment of the search endpoint under a collection
    pub const SEARCH_SEGMENT: &str = "search";

    /// Path segment of the category-scoped endpoint under a collection
    pub const CATEGORY_SEGMENT: &str = "category";

    /// Path segments of the category list endpoint
    pub const CATEGORY_LIST_PATH: &[&str] = &["products", "category-list"];

    /// Query parameter carrying the free-text search term
    pub const SEARCH_PARAM: &str = "q";

    /// Response field carrying the collection total
    pub const TOTAL_FIELD: &str = "total";

    /// Error body field carrying a server-provided message
    pub const MESSAGE_FIELD: &str = "message";
}

/// Authentication constants
pub mod auth {
    /// Demo account username accepted by the default API
    pub const DEMO_USERNAME: &str = "emilys";

    /// Demo account password accepted by the default API
    pub const DEMO_PASSWORD: &str = "emilyspass";

    /// Message reported when the server rejects a login without explaining why
    pub const INCORRECT_CREDENTIALS: &str = "Email or password incorrect";

    /// Message reported when a login fails before any response arrived
    pub const LOGIN_FAILED: &str = "Login failed";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "console-store/0.1.0 (Admin Console)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// Client-side throttling
pub mod limits {
    /// Default request rate (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;
}

/// Query and pagination defaults
pub mod query {
    /// Page size used when a query does not specify one
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Offset used when a query does not specify one
    pub const DEFAULT_SKIP: u32 = 0;

    /// Page sizes offered by list views
    pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 20, 30];

    /// Number of users shown in the dashboard's recent list
    pub const DASHBOARD_RECENT_USERS: usize = 5;
}

/// Collection cache defaults
pub mod cache {
    /// Default number of distinct queries kept per collection
    pub const DEFAULT_CAPACITY: usize = 64;
}

/// Session persistence constants
pub mod session {
    /// Name of the persisted session record
    pub const RECORD_NAME: &str = "console-session";

    /// Application directory under the user's config directory
    pub const APP_DIR: &str = "console-store";

    /// File name of the persisted session
    pub const FILE_NAME: &str = "session.json";

    /// File permissions for the session file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const FILE_PERMISSIONS: u32 = 0o600;
}

/// Route paths understood by the auth guard
pub mod routes {
    /// Login page
    pub const LOGIN: &str = "/login";

    /// Landing page after login
    pub const DASHBOARD: &str = "/dashboard";

    /// User list
    pub const USERS: &str = "/users";

    /// Product grid
    pub const PRODUCTS: &str = "/products";

    /// Routes reachable without a session
    pub const PUBLIC: [&str; 3] = ["/login", "/_error", "/404"];
}

// Re-export commonly used constants at module level for convenience
pub use auth::{DEMO_PASSWORD, DEMO_USERNAME};
pub use env::{API_BASE_URL as ENV_API_BASE_URL, SESSION_PATH as ENV_SESSION_PATH};
pub use http::USER_AGENT;
pub use limits::DEFAULT_RATE_LIMIT_RPS;
pub use query::DEFAULT_LIMIT;
