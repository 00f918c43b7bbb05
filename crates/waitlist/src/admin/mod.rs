//! Admin dashboard: stats fetch, local entry cache, filtered rendering, and
//! the auto-refresh schedule.

mod dashboard;
pub mod domain;
mod polling;
pub mod render;

pub use dashboard::{
    AdminDashboard, DashboardState, FetchMode, StatsError, MALFORMED_STATS, UPDATED_ERROR_LABEL,
};
pub use domain::{StatsSnapshot, WaitlistEntry};
pub use polling::PollingSession;
