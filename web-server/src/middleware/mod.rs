// web-server/src/middleware/mod.rs
pub mod error_log;
pub mod session_auth;

pub use error_log::ErrorLog;
pub use session_auth::RequireSession;
