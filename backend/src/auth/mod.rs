//! Authentication module
//!
//! bcrypt password hashing plus stateless HS256 bearer tokens.

pub mod jwt;
mod middleware;
pub mod password;

pub use jwt::{Claims, Identity, JwtService, TokenType};
pub use middleware::{bearer_token, AuthUser, RequireAdmin, RequireCompanyManager};
pub use password::PasswordService;
