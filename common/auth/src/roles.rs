pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];
