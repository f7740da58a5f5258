//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Route guards (auth, role checks) are typed extractors in [`auth`],
//! executed per route before the handler; a rejection short-circuits the
//! chain with its own response.

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAdmin, RequireAuth, RequireContentManager, clear_current_user,
    set_current_user,
};
pub use session::create_session_layer;
