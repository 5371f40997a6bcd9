//! Integration test suite.
//!
//! Drives the rendered markup, the postback binder and the storage service
//! together through the actix test harness. Storage roots are temporary
//! directories, so no external setup is needed.
//!
//! Run with: cargo test --test integration

mod test_helpers;

mod api_tests;
mod render_tests;
