pub mod account_handlers;
pub mod app;
pub mod config;
pub mod extractors;
pub mod guards;
pub mod messages;
pub mod response;
pub mod revocation;
pub mod session_handlers;
pub mod users;

pub use app::{router, AppState};
