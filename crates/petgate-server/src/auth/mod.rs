// Authentication module
// Decision: Three independent credential schemes, each a guard over its own route group
// Decision: All auth state is immutable after startup and shared behind Arc

pub mod basic;
pub mod config;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod session;

pub use config::AuthConfig;
pub use jwt::TokenClaims;
pub use middleware::{AuthState, Guard};
pub use routes::routes;
