pub mod auth;
pub mod profile_image;

pub use auth::AuthService;
pub use profile_image::ProfileImageService;
