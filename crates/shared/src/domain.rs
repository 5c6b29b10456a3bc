use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MailProtocol {
    MsGraph,
    #[default]
    Smtp,
}

impl MailProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MsGraph => "MSGRAPH",
            Self::Smtp => "SMTP",
        }
    }
}

impl fmt::Display for MailProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mail protocol '{0}', expected SMTP or MSGRAPH")]
pub struct UnknownProtocol(pub String);

impl FromStr for MailProtocol {
    type Err = UnknownProtocol;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("smtp") {
            Ok(Self::Smtp)
        } else if trimmed.eq_ignore_ascii_case("msgraph") {
            Ok(Self::MsGraph)
        } else {
            Err(UnknownProtocol(raw.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Html,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientModel {
    pub email_address: EmailAddress,
}

impl RecipientModel {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email_address: EmailAddress {
                address: address.into(),
                name: Some(name.into()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyModel {
    pub content_type: ContentType,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageModel {
    pub subject: String,
    pub body: BodyModel,
    pub to_recipients: Vec<RecipientModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_recipients: Option<Vec<RecipientModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc_recipients: Option<Vec<RecipientModel>>,
}
