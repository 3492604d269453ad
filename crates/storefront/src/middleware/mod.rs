//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `SQLite` store)
//!
//! The route guard is an extractor ([`RequireAuth`]) rather than a layer, so
//! each protected handler states its requirement in its signature.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AuthRejection, LOGIN_PATH, RequireAuth};
pub use request_id::{RequestId, request_id_middleware};
pub use session::{create_session_layer, create_session_store};
