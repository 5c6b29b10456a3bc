use serde::{Deserialize, Serialize};

use crate::domain::{MailProtocol, MessageModel};

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_FAILED: &str = "FAILED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRequest {
    pub message: MessageModel,
    pub preferred_protocol: MailProtocol,
    pub request_pixel_tracking: bool,
    pub save_to_sent_items: bool,
    #[serde(
        rename = "trackingID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tracking_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub message_id: Option<String>,
}

impl MailResponse {
    /// Client-side outcome for a send that never produced a server response.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED.to_string(),
            message: message.into(),
            message_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTrackingEntity {
    pub tracking_id: String,
    pub recipient_email: String,
    pub batch_id: String,
    #[serde(default)]
    pub sent_timestamp: Option<String>,
    #[serde(default)]
    pub open_count: i64,
    #[serde(default)]
    pub first_open_timestamp: Option<String>,
    #[serde(default)]
    pub last_open_timestamp: Option<String>,
    #[serde(default)]
    pub client_user_agent: Option<String>,
    #[serde(default)]
    pub client_browser: Option<String>,
    #[serde(default)]
    pub client_device: Option<String>,
    #[serde(default)]
    pub client_ip_address: Option<String>,
    #[serde(default)]
    pub client_city: Option<String>,
    #[serde(default)]
    pub client_country: Option<String>,
}

impl EmailTrackingEntity {
    pub fn was_opened(&self) -> bool {
        self.open_count > 0
    }
}
