// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer notification emails via the Resend API.
//!
//! Sending is best effort: callers log failures and move on.

use crate::config::Config;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification failures. Never surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("email sender not configured")]
    NotConfigured,

    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Everything needed to thank one volunteer.
#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerEmail {
    pub to: String,
    pub volunteer_name: String,
    pub alert_title: String,
    pub alert_description: String,
    /// `"lat, lng"`
    pub alert_location: String,
    pub alert_phone_number: String,
    pub message: Option<String>,
}

impl VolunteerEmail {
    pub fn subject(&self) -> String {
        format!("Thank you for volunteering for {}", self.alert_title)
    }

    pub fn html_body(&self) -> String {
        let mut html = format!(
            "<h1>Thank you, {name}!</h1>\
             <p>You have volunteered for <strong>{title}</strong>.</p>\
             <h2>Alert details</h2>\
             <p><strong>Description:</strong> {description}</p>\
             <p><strong>Location:</strong> {location}</p>\
             <p><strong>Contact phone:</strong> {phone}</p>",
            name = escape_html(&self.volunteer_name),
            title = escape_html(&self.alert_title),
            description = escape_html(&self.alert_description),
            location = escape_html(&self.alert_location),
            phone = escape_html(&self.alert_phone_number),
        );

        if let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            html.push_str(&format!(
                "<p><strong>Your message:</strong> {}</p>",
                escape_html(message)
            ));
        }

        html.push_str("<p>Stay safe,<br>The ResQ-Link team</p>");
        html
    }
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

#[derive(Clone)]
enum Transport {
    Resend {
        http: reqwest::Client,
        api_key: String,
        from: String,
    },
    /// Records messages instead of sending them.
    Capture(Arc<Mutex<Vec<VolunteerEmail>>>),
    Disabled,
}

/// Transactional email sender.
#[derive(Clone)]
pub struct EmailService {
    transport: Transport,
}

impl EmailService {
    /// Build from configuration; without an API key the sender is disabled.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let Some(api_key) = config.resend_api_key.clone() else {
            tracing::warn!("RESEND_API_KEY not set; volunteer emails are disabled");
            return Ok(Self::disabled());
        };

        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            transport: Transport::Resend {
                http,
                api_key,
                from: config.email_from.clone(),
            },
        })
    }

    pub fn disabled() -> Self {
        Self {
            transport: Transport::Disabled,
        }
    }

    /// Sender that keeps every message in memory, for tests.
    pub fn capturing() -> (Self, Arc<Mutex<Vec<VolunteerEmail>>>) {
        let outbox = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                transport: Transport::Capture(outbox.clone()),
            },
            outbox,
        )
    }

    pub async fn send_volunteer_email(
        &self,
        email: &VolunteerEmail,
    ) -> Result<(), NotificationError> {
        match &self.transport {
            Transport::Disabled => Err(NotificationError::NotConfigured),
            Transport::Capture(outbox) => {
                if let Ok(mut outbox) = outbox.lock() {
                    outbox.push(email.clone());
                }
                Ok(())
            }
            Transport::Resend {
                http,
                api_key,
                from,
            } => {
                let request = ResendRequest {
                    from: from.as_str(),
                    to: [email.to.as_str()],
                    subject: email.subject(),
                    html: email.html_body(),
                };

                let response = http
                    .post(RESEND_API_URL)
                    .bearer_auth(api_key)
                    .json(&request)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(NotificationError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }

                tracing::info!(alert_title = %email.alert_title, "Volunteer email sent");
                Ok(())
            }
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
