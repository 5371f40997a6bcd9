//! API endpoint modules.

pub mod attachments;
pub mod files;
pub mod health;

use actix_web::web;

pub use attachments::{AttachmentForm, configure_routes as configure_attachment_routes};
pub use files::configure_routes as configure_file_routes;
pub use health::configure_health_routes;

/// Register every route; downloads live under `download_path`.
pub fn configure(cfg: &mut web::ServiceConfig, download_path: &str) {
    configure_health_routes(cfg);
    configure_file_routes(cfg, download_path);
    configure_attachment_routes(cfg);
}
