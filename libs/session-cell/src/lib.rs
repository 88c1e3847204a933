pub mod error;
pub mod models;
pub mod services;

pub use error::SessionError;
pub use models::*;
pub use services::SessionLauncher;
