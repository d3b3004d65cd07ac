pub mod claims;
pub mod config;
pub mod error;
pub mod roles;
pub mod signer;

pub use claims::{Claims, Identity};
pub use config::TokenConfig;
pub use error::{AuthError, AuthResult};
pub use roles::{ROLE_ADMIN, ROLE_USER, VALID_ROLES};
pub use signer::{TokenKind, TokenSigner};
