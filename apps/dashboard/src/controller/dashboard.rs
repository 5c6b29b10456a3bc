use std::sync::Arc;

use client_core::TrackingApi;
use shared::protocol::{EmailTrackingEntity, MailResponse};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    classify,
    signal::{BusyGuard, Signal},
    state::{DashboardSnapshot, SendForm, StatusForm, TrackingData},
};

/// Owns the composer, status lookup, and dashboard listing state.
///
/// Each operation touches only its own cells, so the three flows can be in
/// flight at the same time. Overlapping calls of the same flow are not
/// cancelled; whichever finishes last leaves its result in place.
pub struct DashboardController {
    api: Arc<dyn TrackingApi>,

    send_form: Signal<SendForm>,
    is_sending: Signal<bool>,
    send_response: Signal<Option<MailResponse>>,

    status_form: Signal<StatusForm>,
    is_checking_status: Signal<bool>,
    tracking_data: Signal<TrackingData>,

    is_loading_all: Signal<bool>,
    all_tracking_records: Signal<Vec<EmailTrackingEntity>>,
    all_tracking_error: Signal<Option<String>>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn TrackingApi>) -> Self {
        Self {
            api,
            send_form: Signal::default(),
            is_sending: Signal::default(),
            send_response: Signal::default(),
            status_form: Signal::default(),
            is_checking_status: Signal::default(),
            tracking_data: Signal::default(),
            is_loading_all: Signal::default(),
            all_tracking_records: Signal::default(),
            all_tracking_error: Signal::default(),
        }
    }

    /// Builds the controller and performs the initial dashboard load.
    pub async fn start(api: Arc<dyn TrackingApi>) -> Self {
        let controller = Self::new(api);
        controller.load_all_tracking_data().await;
        controller
    }

    pub async fn send_email(&self) {
        let form = self.send_form.get();
        let _busy = BusyGuard::raise(&self.is_sending);
        self.send_response.set(None);

        let result = self
            .api
            .send_email(
                &form.recipient_email,
                &form.subject,
                &form.body,
                form.protocol,
            )
            .await;

        match result {
            Ok(response) => {
                info!(
                    status = %response.status,
                    message_id = response.message_id.as_deref().unwrap_or(""),
                    "dashboard: email submitted"
                );
                if let Some(message_id) = response.message_id.as_deref().filter(|id| !id.is_empty()) {
                    let message_id = message_id.to_string();
                    self.status_form.update(|form| form.tracking_id = message_id);
                }
                self.send_response.set(Some(response));
            }
            Err(err) => {
                warn!(error = %err, "dashboard: send failed");
                self.send_response.set(Some(classify::send_failure(&err)));
            }
        }
    }

    pub async fn check_status(&self) {
        let tracking_id = self.status_form.with(|form| form.tracking_id.clone());
        if tracking_id.trim().is_empty() {
            debug!("dashboard: status check skipped, no tracking id");
            return;
        }

        let _busy = BusyGuard::raise(&self.is_checking_status);
        self.tracking_data.set(TrackingData::idle());

        match self.api.get_tracking_status(&tracking_id).await {
            Ok(entity) => {
                info!(%tracking_id, open_count = entity.open_count, "dashboard: tracking record found");
                self.tracking_data.set(TrackingData::found(entity));
            }
            Err(err) => {
                if err.is_not_found() {
                    info!(%tracking_id, "dashboard: tracking record not found");
                } else {
                    warn!(%tracking_id, error = %err, "dashboard: status check failed");
                }
                self.tracking_data.set(classify::lookup_failure(&err));
            }
        }
    }

    pub async fn load_all_tracking_data(&self) {
        let _busy = BusyGuard::raise(&self.is_loading_all);
        self.all_tracking_error.set(None);
        self.all_tracking_records.set(Vec::new());

        match self.api.get_all_tracking_status().await {
            Ok(records) => {
                info!(count = records.len(), "dashboard: tracking records loaded");
                self.all_tracking_records.set(records);
            }
            Err(err) => {
                warn!(error = %err, "dashboard: loading tracking records failed");
                self.all_tracking_records.set(Vec::new());
                self.all_tracking_error
                    .set(Some(classify::load_all_failure(&err)));
            }
        }
    }

    pub fn send_form(&self) -> SendForm {
        self.send_form.get()
    }

    pub fn update_send_form(&self, modify: impl FnOnce(&mut SendForm)) {
        self.send_form.update(modify);
    }

    pub fn status_form(&self) -> StatusForm {
        self.status_form.get()
    }

    pub fn set_tracking_id(&self, tracking_id: impl Into<String>) {
        let tracking_id = tracking_id.into();
        self.status_form.update(|form| form.tracking_id = tracking_id);
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending.get()
    }

    pub fn send_response(&self) -> Option<MailResponse> {
        self.send_response.get()
    }

    pub fn is_checking_status(&self) -> bool {
        self.is_checking_status.get()
    }

    pub fn tracking_data(&self) -> TrackingData {
        self.tracking_data.get()
    }

    pub fn is_loading_all(&self) -> bool {
        self.is_loading_all.get()
    }

    pub fn all_tracking_records(&self) -> Vec<EmailTrackingEntity> {
        self.all_tracking_records.get()
    }

    pub fn all_tracking_error(&self) -> Option<String> {
        self.all_tracking_error.get()
    }

    pub fn subscribe_send_response(&self) -> watch::Receiver<Option<MailResponse>> {
        self.send_response.subscribe()
    }

    pub fn subscribe_tracking_data(&self) -> watch::Receiver<TrackingData> {
        self.tracking_data.subscribe()
    }

    pub fn subscribe_all_tracking_records(&self) -> watch::Receiver<Vec<EmailTrackingEntity>> {
        self.all_tracking_records.subscribe()
    }

    pub fn subscribe_is_sending(&self) -> watch::Receiver<bool> {
        self.is_sending.subscribe()
    }

    pub fn subscribe_is_checking_status(&self) -> watch::Receiver<bool> {
        self.is_checking_status.subscribe()
    }

    pub fn subscribe_is_loading_all(&self) -> watch::Receiver<bool> {
        self.is_loading_all.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            send_form: self.send_form(),
            is_sending: self.is_sending(),
            send_response: self.send_response(),
            status_form: self.status_form(),
            is_checking_status: self.is_checking_status(),
            tracking_data: self.tracking_data(),
            is_loading_all: self.is_loading_all(),
            all_tracking_records: self.all_tracking_records(),
            all_tracking_error: self.all_tracking_error(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
