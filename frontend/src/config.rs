//! Build-time settings of the frontend.

/// Base URL of the REST API. Set `MARCHES_API_BASE` when building to point
/// the bundle at another server.
pub const API_BASE: &str = match option_env!("MARCHES_API_BASE") {
    Some(base) => base,
    None => "http://localhost:5001",
};

pub use common::pagination::DEFAULT_PAGE_SIZE as PAGE_SIZE;
pub use common::state::map::{DEFAULT_CENTER, DEFAULT_ZOOM, FLY_TO_ZOOM};

/// How long toasts and success banners stay on screen.
pub const TOAST_MS: u32 = 3000;

/// Page size used when the dashboard and the map load every marché at once.
pub const ALL_MARCHES_LIMIT: usize = 1000;

/// Delay before leaving the reset-password page after a success.
pub const RESET_REDIRECT_MS: u32 = 1200;
