//! Form bindings and operation outcomes owned by the dashboard controller.

use shared::{
    domain::MailProtocol,
    protocol::{EmailTrackingEntity, MailResponse},
};

pub const DEFAULT_RECIPIENT: &str = "test@example.com";
pub const DEFAULT_SUBJECT: &str = "Test Email with Tracking";
pub const DEFAULT_BODY: &str = "Email body is checking";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendForm {
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub protocol: MailProtocol,
}

impl Default for SendForm {
    fn default() -> Self {
        Self {
            recipient_email: DEFAULT_RECIPIENT.into(),
            subject: DEFAULT_SUBJECT.into(),
            body: DEFAULT_BODY.into(),
            protocol: MailProtocol::Smtp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusForm {
    pub tracking_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupStatus {
    #[default]
    Idle,
    Success,
    NotFound,
    Error,
}

impl LookupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Success => "SUCCESS",
            Self::NotFound => "NOT_FOUND",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingData {
    pub status: LookupStatus,
    pub message: String,
    pub entity: Option<EmailTrackingEntity>,
}

impl TrackingData {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn found(entity: EmailTrackingEntity) -> Self {
        Self {
            status: LookupStatus::Success,
            message: "Record found.".into(),
            entity: Some(entity),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: LookupStatus::NotFound,
            message: "Tracking record not found.".into(),
            entity: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::Error,
            message: message.into(),
            entity: None,
        }
    }
}

/// Point-in-time copy of every controller field, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub send_form: SendForm,
    pub is_sending: bool,
    pub send_response: Option<MailResponse>,
    pub status_form: StatusForm,
    pub is_checking_status: bool,
    pub tracking_data: TrackingData,
    pub is_loading_all: bool,
    pub all_tracking_records: Vec<EmailTrackingEntity>,
    pub all_tracking_error: Option<String>,
}
