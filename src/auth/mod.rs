//! Authentication: password hashing, per-app JWT issuance, HTTP handlers.

mod handlers;
mod jwt;
mod password;

pub use handlers::{
    is_admin, login, register, IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse,
};
pub use jwt::{Claims, TokenIssuer};
pub use password::PasswordHasher;
