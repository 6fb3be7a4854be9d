//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod dashboard;
