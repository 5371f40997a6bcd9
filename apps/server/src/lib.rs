//! Attachment forms server library.
//!
//! Renders editable file attachment lists, binds their postbacks back into
//! records and stores the uploaded files.

pub mod api;
pub mod config;
pub mod error;
pub mod html;
pub mod middleware;
pub mod models;
pub mod services;
