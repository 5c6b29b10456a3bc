use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{BodyModel, ContentType, MailProtocol, MessageModel, RecipientModel},
    error::ApiError,
    protocol::{EmailTrackingEntity, MailRequest, MailResponse},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod timestamp;

pub use error::{Result, TrackingError};
pub use reqwest::StatusCode;
pub use timestamp::format_timestamp;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/mail";
pub const TRACKING_PIXEL_HTML: &str = r#"<img src="cid:pixel" />"#;

/// Appends the tracking pixel at the end of the body and wraps the result in
/// an HTML document. The backend relies on this exact layout.
pub fn wrap_with_tracking_pixel(content: &str) -> String {
    format!("<html><body>{content}{TRACKING_PIXEL_HTML}</body></html>")
}

pub fn build_mail_request(
    recipient_email: &str,
    subject: &str,
    content: &str,
    protocol: MailProtocol,
) -> MailRequest {
    MailRequest {
        message: MessageModel {
            subject: subject.to_string(),
            body: BodyModel {
                content_type: ContentType::Html,
                content: wrap_with_tracking_pixel(content),
            },
            to_recipients: vec![RecipientModel::new(recipient_email, "")],
            cc_recipients: None,
            bcc_recipients: None,
        },
        preferred_protocol: protocol,
        request_pixel_tracking: true,
        save_to_sent_items: true,
        tracking_id: None,
    }
}

/// Operations offered by the mail tracking backend.
#[async_trait]
pub trait TrackingApi: Send + Sync {
    async fn send_email(
        &self,
        recipient_email: &str,
        subject: &str,
        content: &str,
        protocol: MailProtocol,
    ) -> Result<MailResponse>;
    async fn get_tracking_status(&self, tracking_id: &str) -> Result<EmailTrackingEntity>;
    async fn get_all_tracking_status(&self) -> Result<Vec<EmailTrackingEntity>>;
}

#[derive(Debug, Clone)]
pub struct TrackingClient {
    http: Client,
    base_url: Url,
}

impl TrackingClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|source| TrackingError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(TrackingError::OpaqueBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl TrackingApi for TrackingClient {
    async fn send_email(
        &self,
        recipient_email: &str,
        subject: &str,
        content: &str,
        protocol: MailProtocol,
    ) -> Result<MailResponse> {
        let url = self.endpoint(&["send"]);
        let request = build_mail_request(recipient_email, subject, content, protocol);
        debug!(%url, %protocol, "mail: sending email");

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(TrackingError::Transport)?;
        read_json(response).await
    }

    async fn get_tracking_status(&self, tracking_id: &str) -> Result<EmailTrackingEntity> {
        if matches!(tracking_id, "." | "..") {
            return Err(TrackingError::UnroutableTrackingId(tracking_id.to_string()));
        }
        let url = self.endpoint(&["track", "status", tracking_id]);
        debug!(%url, tracking_id, "mail: fetching tracking status");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(TrackingError::Transport)?;
        read_json(response).await
    }

    async fn get_all_tracking_status(&self) -> Result<Vec<EmailTrackingEntity>> {
        let url = self.endpoint(&["track", "all"]);
        debug!(%url, "mail: fetching all tracking records");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(TrackingError::Transport)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "mail: failed to read error body");
                String::new()
            }
        };
        let message = ApiError::message_from_body(&body);
        warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "mail: backend returned error status"
        );
        return Err(TrackingError::Status { status, message });
    }

    response.json::<T>().await.map_err(TrackingError::Decode)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
