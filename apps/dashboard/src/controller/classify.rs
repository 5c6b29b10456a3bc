//! Maps tracking client failures into user-facing controller state.

use client_core::TrackingError;
use shared::protocol::MailResponse;

use super::state::TrackingData;

pub const SEND_FAILURE_FALLBACK: &str = "A network or API error occurred.";
pub const LOOKUP_FAILURE_FALLBACK: &str = "Could not connect to API or server error.";
pub const LOAD_ALL_FAILURE_FALLBACK: &str = "Failed to fetch all records from the API.";

pub fn send_failure(err: &TrackingError) -> MailResponse {
    MailResponse::failed(err.server_message().unwrap_or(SEND_FAILURE_FALLBACK))
}

pub fn lookup_failure(err: &TrackingError) -> TrackingData {
    if err.is_not_found() {
        TrackingData::not_found()
    } else {
        TrackingData::error(err.server_message().unwrap_or(LOOKUP_FAILURE_FALLBACK))
    }
}

pub fn load_all_failure(err: &TrackingError) -> String {
    err.server_message()
        .unwrap_or(LOAD_ALL_FAILURE_FALLBACK)
        .to_string()
}
