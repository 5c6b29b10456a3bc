//! Controller layer: observable state, failure classification, and the
//! send / check / load-all operation flows.

pub mod classify;
mod dashboard;
pub mod signal;
pub mod state;

pub use dashboard::DashboardController;
