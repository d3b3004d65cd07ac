//! Fixed response strings. These are part of the API contract and are
//! asserted verbatim by clients and tests.

pub const ACCESS_DENIED: &str = "Access denied! ❌";
pub const SUCCESS_LOGIN: &str = "Succesful Login! 😊";
pub const SUCCESS_LOGOUT: &str = "Succesful Logout! 🛫";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const EMPTY_TOKEN: &str = "Refresh token unavailable";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EXISTING_EMAIL: &str = "User with given email already exists";
pub const ACCOUNT_CREATED: &str = "Account registered sucessfully";
