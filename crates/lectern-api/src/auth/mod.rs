pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use gate::AccessGate;
pub use jwt::{JwtService, TokenVerifier};
pub use middleware::access_gate_middleware;
pub use models::{AuthError, Caller, Claims};
