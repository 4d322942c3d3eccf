//! Transactional email through the Resend HTTP API.

use std::sync::Arc;

use anyhow::anyhow;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::domain::repository::Mailer;
use crate::domain::types::EmailMessage;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct ResendMailer {
    http: Client,
    endpoint: Url,
    api_key: Arc<str>,
    from: Arc<str>,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl ResendMailer {
    pub fn new(
        base_url: &Url,
        api_key: impl Into<Arc<str>>,
        from: impl Into<Arc<str>>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: Client::new(),
            endpoint: base_url.join("emails")?,
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), AuthServiceError> {
        let body = SendEmailRequest {
            from: &self.from[..],
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };
        let resp = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&*self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthServiceError::Upstream(anyhow::Error::new(e).context("send email")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AuthServiceError::Upstream(anyhow!(
                "send email: HTTP {status}: {detail}"
            )));
        }
        tracing::debug!(subject = %message.subject, "email accepted by provider");
        Ok(())
    }
}
