//! Dashboard routes - Inventory page and refresh action
//!
//! Features:
//! - Full page with title, trigger button and the current view
//! - Refresh action that starts an activation and returns the loading view
//! - View partial that polls itself while a request is in flight
//! - JSON state and blocking refresh for scripts
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Full page and HTMX partial rendering

pub mod api;
pub mod page;

pub use api::{api_refresh, api_state};
pub use page::{
    htmx_dashboard_refresh,
    htmx_dashboard_view,
    page_dashboard,
    render_account_card,
    render_dashboard_view,
};
